//! # estimate-engine
//!
//! Acquisition-cost and margin estimates for French property transactions.
//!
//! Given a purchase price, a target sale price, direct costs and a VAT
//! regime, the engine computes transfer tax, notary fees, VAT and margins,
//! and returns them with an audit trail that reproduces every figure.
//!
//! ## Architecture
//!
//! - **core**: Money and rate helpers, department codes, estimate input
//! - **rates**: Transfer-tax table, notary fee schedule, configuration loading
//! - **calculators**: Transfer tax, notary fees, VAT, margins
//! - **report**: Explanation text and alerts
//! - **engine**: Orchestration and the estimate result
//! - **simulation**: Sale-price sensitivity and random input generation

pub mod calculators;
pub mod core;
pub mod engine;
pub mod rates;
pub mod report;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::department::DepartmentCode;
    pub use crate::core::input::{Assumptions, EstimateInput, InputError, VatRegime};
    pub use crate::core::money::{Money, Rate};
    pub use crate::engine::{EstimateEngine, EstimateOutput};
    pub use crate::rates::repository::{RateRepository, RepositoryConfig};
    pub use crate::rates::ConfigError;
    pub use crate::report::alerts::Alert;
}
