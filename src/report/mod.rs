//! Advisory alerts and the human-readable audit trail.

pub mod alerts;
pub mod explanation;
