//! Transfer-tax rates and the notary fee schedule.
//!
//! Both tables are read once from optional JSON files and are immutable
//! afterwards. Any failure to read them falls back to the built-in tables.

pub mod repository;
pub mod schedule;
pub mod table;

use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration.
///
/// These never escape [`repository::RateRepository`]; they are logged and
/// replaced by the built-in defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid notary schedule: {0}")]
    InvalidSchedule(String),
    #[error("rate {name} must be in [0, 1), got {rate}")]
    InvalidRate { name: String, rate: Decimal },
}
