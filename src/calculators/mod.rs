//! The four pure calculators, run in this order by the engine:
//! transfer tax, notary fees, VAT, margins.
//!
//! Each returns a breakdown carrying every intermediate value so the
//! explanation can be rendered without recomputing anything.

pub mod margins;
pub mod notary;
pub mod transfer_tax;
pub mod vat;
