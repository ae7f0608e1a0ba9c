use crate::rates::schedule::NotaryFeeSchedule;
use crate::rates::table::RateTable;
use crate::rates::ConfigError;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Environment variable naming the transfer-tax rate file.
pub const RATES_PATH_ENV: &str = "ESTIMATE_RATES_PATH";
/// Environment variable naming the notary schedule file.
pub const SCHEDULE_PATH_ENV: &str = "ESTIMATE_NOTARY_SCHEDULE_PATH";

static GLOBAL: OnceLock<Arc<RateRepository>> = OnceLock::new();

/// Where to look for the external rate tables. Both sources are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub rates_path: Option<PathBuf>,
    pub schedule_path: Option<PathBuf>,
}

impl RepositoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rates_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rates_path = Some(path.into());
        self
    }

    pub fn with_schedule_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schedule_path = Some(path.into());
        self
    }

    /// Read paths from `ESTIMATE_RATES_PATH` / `ESTIMATE_NOTARY_SCHEDULE_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var_os(var))
    }

    /// Resolve both paths through `lookup`. An empty value means no path.
    fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let path = |var: &str| lookup(var).filter(|v| !v.is_empty()).map(PathBuf::from);
        Self {
            rates_path: path(RATES_PATH_ENV),
            schedule_path: path(SCHEDULE_PATH_ENV),
        }
    }
}

/// Immutable holder of the transfer-tax table and notary schedule.
///
/// Loading never fails: a missing, unreadable, malformed or invalid source
/// is logged and replaced by the built-in table. Once built the repository
/// is read-only and can be shared across threads without locking.
///
/// # Examples
///
/// ```
/// use estimate_engine::rates::repository::{RateRepository, RepositoryConfig};
/// use rust_decimal_macros::dec;
///
/// let config = RepositoryConfig::new().with_rates_path("/nonexistent/rates.json");
/// let repo = RateRepository::load(&config);
/// assert_eq!(repo.rates().default_rate, dec!(0.045));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateRepository {
    rates: RateTable,
    schedule: NotaryFeeSchedule,
}

impl RateRepository {
    /// Build from explicit tables (tests, embedding callers).
    pub fn new(rates: RateTable, schedule: NotaryFeeSchedule) -> Self {
        Self { rates, schedule }
    }

    pub fn load(config: &RepositoryConfig) -> Self {
        Self {
            rates: load_rates(config.rates_path.as_deref()),
            schedule: load_notary_schedule(config.schedule_path.as_deref()),
        }
    }

    /// Process-wide repository, loaded from the environment on first use.
    pub fn global() -> Arc<RateRepository> {
        GLOBAL
            .get_or_init(|| Arc::new(Self::load(&RepositoryConfig::from_env())))
            .clone()
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn schedule(&self) -> &NotaryFeeSchedule {
        &self.schedule
    }
}

/// Load the transfer-tax table, or the built-in table on any failure.
pub fn load_rates(path: Option<&Path>) -> RateTable {
    load_or_default("transfer-tax rates", path, RateTable::from_json)
}

/// Load the notary schedule, or the built-in schedule on any failure.
pub fn load_notary_schedule(path: Option<&Path>) -> NotaryFeeSchedule {
    load_or_default("notary schedule", path, NotaryFeeSchedule::from_json)
}

fn load_or_default<T: Default>(
    what: &str,
    path: Option<&Path>,
    parse: impl FnOnce(&str) -> Result<T, ConfigError>,
) -> T {
    let Some(path) = path else {
        debug!("no {} source configured, using built-in defaults", what);
        return T::default();
    };

    match read_source(path).and_then(|content| parse(&content)) {
        Ok(value) => {
            info!("loaded {} from {}", what, path.display());
            value
        }
        Err(e) => {
            warn!("{} unavailable ({}); falling back to built-in defaults", what, e);
            T::default()
        }
    }
}

fn read_source(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
