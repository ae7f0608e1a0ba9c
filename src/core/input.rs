use crate::core::department::DepartmentCode;
use crate::core::money::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// VAT regime applied to the resale. Exactly one applies per estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VatRegime {
    /// VAT on the full sale price.
    #[serde(alias = "NORMAL")]
    Standard,
    /// VAT on the margin only (sale price minus acquisition-related costs).
    #[serde(alias = "MARGE")]
    Margin,
    /// No VAT.
    #[serde(alias = "EXO")]
    Exempt,
}

impl fmt::Display for VatRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VatRegime::Standard => "STANDARD",
            VatRegime::Margin => "MARGIN",
            VatRegime::Exempt => "EXEMPT",
        };
        f.write_str(name)
    }
}

/// Recognized boolean assumptions attached to an estimate request.
///
/// Any other keys present in the request are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    /// Buyer qualifies for the reduced professional-dealer transfer-tax rate.
    #[serde(alias = "md_b_0715_ok")]
    pub reduced_dealer_rate_eligible: bool,
    /// The project includes structural works.
    #[serde(alias = "travaux_structurants")]
    pub structural_renovation: bool,
}

impl Assumptions {
    pub const REDUCED_DEALER_RATE_ELIGIBLE: &'static str = "reduced_dealer_rate_eligible";
    pub const STRUCTURAL_RENOVATION: &'static str = "structural_renovation";
    pub const LEGACY_REDUCED_DEALER_RATE_ELIGIBLE: &'static str = "md_b_0715_ok";
    pub const LEGACY_STRUCTURAL_RENOVATION: &'static str = "travaux_structurants";

    /// Build from a loose flag map, accepting the same legacy keys as
    /// deserialization. Missing keys are `false`; unknown keys are ignored.
    pub fn from_flags(flags: &HashMap<String, bool>) -> Self {
        let flag = |key: &str| flags.get(key).copied().unwrap_or(false);
        Self {
            reduced_dealer_rate_eligible: flag(Self::REDUCED_DEALER_RATE_ELIGIBLE)
                || flag(Self::LEGACY_REDUCED_DEALER_RATE_ELIGIBLE),
            structural_renovation: flag(Self::STRUCTURAL_RENOVATION)
                || flag(Self::LEGACY_STRUCTURAL_RENOVATION),
        }
    }
}

/// Errors a calling layer may raise before handing an input to the engine.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// One estimate request: a purchase, an intended resale and the costs in between.
///
/// All amounts are tax-inclusive euros. The engine consumes the input as-is;
/// [`EstimateInput::validate`] is provided for callers that want to reject
/// negative amounts up front.
///
/// # Examples
///
/// ```
/// use estimate_engine::core::input::{EstimateInput, VatRegime};
/// use rust_decimal_macros::dec;
///
/// let input = EstimateInput::new("75", VatRegime::Margin, dec!(300000), dec!(520000))
///     .with_renovation(dec!(80000))
///     .with_agency_fee(dec!(15000));
///
/// assert_eq!(input.total_direct_costs(), dec!(395000));
/// assert!(input.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateInput {
    #[serde(alias = "dept")]
    pub department: DepartmentCode,
    #[serde(alias = "regime_tva")]
    pub vat_regime: VatRegime,
    #[serde(alias = "prix_achat_ttc")]
    pub purchase_price_gross: Money,
    #[serde(alias = "prix_vente_ttc")]
    pub target_sale_price_gross: Money,
    #[serde(default, alias = "travaux_ttc")]
    pub renovation_cost_gross: Money,
    #[serde(default, alias = "frais_agence_ttc")]
    pub agency_fee_gross: Money,
    #[serde(default, alias = "hypotheses")]
    pub assumptions: Assumptions,
}

impl EstimateInput {
    pub fn new(
        department: impl Into<DepartmentCode>,
        vat_regime: VatRegime,
        purchase_price_gross: Money,
        target_sale_price_gross: Money,
    ) -> Self {
        Self {
            department: department.into(),
            vat_regime,
            purchase_price_gross,
            target_sale_price_gross,
            renovation_cost_gross: Decimal::ZERO,
            agency_fee_gross: Decimal::ZERO,
            assumptions: Assumptions::default(),
        }
    }

    pub fn with_renovation(mut self, amount: Money) -> Self {
        self.renovation_cost_gross = amount;
        self
    }

    pub fn with_agency_fee(mut self, amount: Money) -> Self {
        self.agency_fee_gross = amount;
        self
    }

    pub fn with_assumptions(mut self, assumptions: Assumptions) -> Self {
        self.assumptions = assumptions;
        self
    }

    pub fn dealer_eligible(&self) -> bool {
        self.assumptions.reduced_dealer_rate_eligible
    }

    /// Purchase + renovation + agency fee, before any tax or notary fee.
    pub fn total_direct_costs(&self) -> Money {
        self.purchase_price_gross + self.renovation_cost_gross + self.agency_fee_gross
    }

    /// Reject negative monetary fields.
    pub fn validate(&self) -> Result<(), InputError> {
        let fields = [
            ("purchase_price_gross", self.purchase_price_gross),
            ("target_sale_price_gross", self.target_sale_price_gross),
            ("renovation_cost_gross", self.renovation_cost_gross),
            ("agency_fee_gross", self.agency_fee_gross),
        ];
        for (field, value) in fields {
            if value < Decimal::ZERO {
                return Err(InputError::NegativeAmount { field, value });
            }
        }
        Ok(())
    }
}
