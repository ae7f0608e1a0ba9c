use crate::core::input::{EstimateInput, VatRegime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Advisory warning attached to an estimate. Never blocks the computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alert {
    /// Structural works are planned.
    StructuralWorks,
    /// Margin VAT is used by a buyer not flagged as a professional dealer.
    MarginRegimeWithoutDealerStatus,
}

impl Alert {
    /// Stable identifier, identical to the serialized form.
    pub fn code(&self) -> &'static str {
        match self {
            Alert::StructuralWorks => "STRUCTURAL_WORKS",
            Alert::MarginRegimeWithoutDealerStatus => "MARGIN_REGIME_WITHOUT_DEALER_STATUS",
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::StructuralWorks => write!(
                f,
                "Structural works planned: verify decennial warranty (garantie décennale) coverage"
            ),
            Alert::MarginRegimeWithoutDealerStatus => write!(
                f,
                "Margin VAT regime without professional dealer status: verify eligibility conditions (art. 268 CGI)"
            ),
        }
    }
}

/// Advisories for an input, structural check first.
pub fn generate_alerts(input: &EstimateInput, dealer_eligible: bool) -> Vec<Alert> {
    let mut alerts = Vec::new();
    if input.assumptions.structural_renovation {
        alerts.push(Alert::StructuralWorks);
    }
    if input.vat_regime == VatRegime::Margin && !dealer_eligible {
        alerts.push(Alert::MarginRegimeWithoutDealerStatus);
    }
    alerts
}
