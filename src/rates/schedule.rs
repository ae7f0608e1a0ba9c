use crate::core::money::{Money, Rate};
use crate::rates::table::check_rate;
use crate::rates::ConfigError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One tranche of the progressive notary emolument scale.
///
/// `upper == None` marks the open-ended last tranche.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBracket {
    pub lower: Money,
    pub upper: Option<Money>,
    pub rate: Rate,
}

impl FeeBracket {
    pub fn bounded(lower: Money, upper: Money, rate: Rate) -> Self {
        Self {
            lower,
            upper: Some(upper),
            rate,
        }
    }

    pub fn unbounded(lower: Money, rate: Rate) -> Self {
        Self {
            lower,
            upper: None,
            rate,
        }
    }

    /// Width of the tranche, `None` when unbounded.
    pub fn width(&self) -> Option<Money> {
        self.upper.map(|upper| upper - self.lower)
    }
}

/// Notary fee schedule: emolument brackets plus the flat-rate items.
///
/// Brackets start at zero, are contiguous and ascending, and only the last
/// one is unbounded. [`NotaryFeeSchedule::validate`] enforces this; the
/// repository never hands out a schedule that fails it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotaryFeeSchedule {
    /// Date from which this scale applies.
    pub effective_from: NaiveDate,
    pub brackets: Vec<FeeBracket>,
    /// Land-registry security contribution, as a rate on the purchase price.
    pub security_contribution_rate: Rate,
    /// Fixed disbursement amount.
    pub flat_disbursement: Money,
}

impl Default for NotaryFeeSchedule {
    fn default() -> Self {
        Self {
            effective_from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            brackets: vec![
                FeeBracket::bounded(dec!(0), dec!(6500), dec!(0.0380)),
                FeeBracket::bounded(dec!(6500), dec!(17000), dec!(0.0244)),
                FeeBracket::bounded(dec!(17000), dec!(60000), dec!(0.0163)),
                FeeBracket::unbounded(dec!(60000), dec!(0.0122)),
            ],
            security_contribution_rate: dec!(0.001),
            flat_disbursement: dec!(800.00),
        }
    }
}

impl NotaryFeeSchedule {
    /// Parse and validate a JSON schedule.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let schedule: NotaryFeeSchedule = serde_json::from_str(json)?;
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| Err(ConfigError::InvalidSchedule(reason));

        let Some(last) = self.brackets.last() else {
            return invalid("schedule has no brackets".to_string());
        };
        if last.upper.is_some() {
            return invalid("last bracket must be unbounded".to_string());
        }

        let mut expected_lower = Decimal::ZERO;
        for (i, bracket) in self.brackets.iter().enumerate() {
            if bracket.lower != expected_lower {
                return invalid(format!(
                    "bracket {} starts at {}, expected {}",
                    i, bracket.lower, expected_lower
                ));
            }
            check_rate(&format!("brackets[{}].rate", i), bracket.rate)?;
            match bracket.upper {
                Some(upper) if upper <= bracket.lower => {
                    return invalid(format!(
                        "bracket {} upper bound {} is not above its lower bound {}",
                        i, upper, bracket.lower
                    ));
                }
                Some(upper) => expected_lower = upper,
                None if i + 1 != self.brackets.len() => {
                    return invalid(format!("bracket {} is unbounded but not last", i));
                }
                None => {}
            }
        }

        check_rate("security_contribution_rate", self.security_contribution_rate)?;
        if self.flat_disbursement < Decimal::ZERO {
            return invalid(format!(
                "flat_disbursement must not be negative, got {}",
                self.flat_disbursement
            ));
        }
        Ok(())
    }
}
