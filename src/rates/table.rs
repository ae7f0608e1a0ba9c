use crate::core::department::DepartmentCode;
use crate::core::money::Rate;
use crate::rates::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Departments listed explicitly in the built-in table.
const DEFAULT_DEPARTMENTS: [&str; 10] = ["75", "92", "93", "94", "95", "69", "13", "33", "59", "31"];

/// Where the transfer-tax rate applied to a purchase came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "department", rename_all = "snake_case")]
pub enum RateSource {
    /// Reduced professional-dealer rate, regardless of department.
    Dealer,
    /// Explicit entry for this department.
    Department(DepartmentCode),
    /// Department not listed; the default rate applied.
    Default(DepartmentCode),
}

/// Department-indexed transfer-tax (DMTO) rates.
///
/// Immutable once loaded. A department missing from the table resolves to
/// `default_rate`.
///
/// # Examples
///
/// ```
/// use estimate_engine::core::department::DepartmentCode;
/// use estimate_engine::rates::table::RateTable;
/// use rust_decimal_macros::dec;
///
/// let table = RateTable::default();
/// let (rate, _) = table.department_rate(&DepartmentCode::new("2A"));
/// assert_eq!(rate, dec!(0.045));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// Standard departmental rate.
    pub default_rate: Rate,
    /// Reduced rate for professional property dealers.
    pub reduced_dealer_rate: Rate,
    /// Per-department overrides of `default_rate`.
    #[serde(default)]
    pub departments: BTreeMap<DepartmentCode, Rate>,
}

impl Default for RateTable {
    fn default() -> Self {
        let standard = dec!(0.045);
        Self {
            default_rate: standard,
            reduced_dealer_rate: dec!(0.00715),
            departments: DEFAULT_DEPARTMENTS
                .iter()
                .map(|code| (DepartmentCode::new(*code), standard))
                .collect(),
        }
    }
}

impl RateTable {
    /// Parse and validate a JSON rate table.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let table: RateTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Rate for a department, falling back to the default rate.
    pub fn department_rate(&self, department: &DepartmentCode) -> (Rate, RateSource) {
        match self.departments.get(department) {
            Some(rate) => (*rate, RateSource::Department(department.clone())),
            None => (self.default_rate, RateSource::Default(department.clone())),
        }
    }

    /// Rate applicable to a purchase given dealer eligibility.
    pub fn applicable_rate(&self, department: &DepartmentCode, dealer_eligible: bool) -> (Rate, RateSource) {
        if dealer_eligible {
            (self.reduced_dealer_rate, RateSource::Dealer)
        } else {
            self.department_rate(department)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate("default_rate", self.default_rate)?;
        check_rate("reduced_dealer_rate", self.reduced_dealer_rate)?;
        for (code, rate) in &self.departments {
            check_rate(&format!("departments.{}", code), *rate)?;
        }
        Ok(())
    }
}

pub(crate) fn check_rate(name: &str, rate: Rate) -> Result<(), ConfigError> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(ConfigError::InvalidRate {
            name: name.to_string(),
            rate,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = RateTable::default();
        assert_eq!(table.default_rate, dec!(0.045));
        assert_eq!(table.reduced_dealer_rate, dec!(0.00715));
        assert_eq!(table.departments.len(), 10);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_known_department() {
        let table = RateTable::default();
        let (rate, source) = table.department_rate(&DepartmentCode::new("75"));
        assert_eq!(rate, dec!(0.045));
        assert_eq!(source, RateSource::Department(DepartmentCode::new("75")));
    }

    #[test]
    fn test_unknown_department_uses_default() {
        let mut table = RateTable::default();
        table.default_rate = dec!(0.038);
        let (rate, source) = table.department_rate(&DepartmentCode::new("36"));
        assert_eq!(rate, dec!(0.038));
        assert_eq!(source, RateSource::Default(DepartmentCode::new("36")));
    }

    #[test]
    fn test_dealer_rate_ignores_department() {
        let table = RateTable::default();
        let (rate, source) = table.applicable_rate(&DepartmentCode::new("75"), true);
        assert_eq!(rate, dec!(0.00715));
        assert_eq!(source, RateSource::Dealer);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "default_rate": "0.045",
            "reduced_dealer_rate": "0.00715",
            "departments": { "36": "0.038" }
        }"#;
        let table = RateTable::from_json(json).unwrap();
        let (rate, _) = table.department_rate(&DepartmentCode::new("36"));
        assert_eq!(rate, dec!(0.038));
    }

    #[test]
    fn test_from_json_rejects_negative_rate() {
        let json = r#"{ "default_rate": "-0.01", "reduced_dealer_rate": "0.00715" }"#;
        assert!(matches!(
            RateTable::from_json(json),
            Err(ConfigError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            RateTable::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
