use crate::calculators::margins::compute_margins;
use crate::calculators::notary::compute_notary_fees;
use crate::calculators::transfer_tax::compute_transfer_tax;
use crate::calculators::vat::compute_vat;
use crate::core::input::{EstimateInput, VatRegime};
use crate::core::money::{format_eur, format_percent, Money};
use crate::rates::repository::RateRepository;
use crate::report::alerts::{generate_alerts, Alert};
use crate::report::explanation::ExplanationBuilder;
use log::{debug, trace};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Orchestration stages, in execution order. No stage is skipped or repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    TransferTax,
    NotaryFees,
    Vat,
    Margins,
    Explain,
    Alerts,
    Done,
}

impl Stage {
    pub const ORDER: [Stage; 8] = [
        Stage::Start,
        Stage::TransferTax,
        Stage::NotaryFees,
        Stage::Vat,
        Stage::Margins,
        Stage::Explain,
        Stage::Alerts,
        Stage::Done,
    ];
}

/// Result of one estimate. Immutable.
///
/// Currency fields are rounded to cents; `simplified_return` to four
/// decimals. At most one of `vat_collected` / `vat_on_margin` is non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateOutput {
    vat_regime: VatRegime,
    transfer_tax: Money,
    notary_emoluments: Money,
    security_contribution: Money,
    disbursement: Money,
    vat_collected: Money,
    vat_on_margin: Money,
    gross_margin: Money,
    net_margin: Money,
    simplified_return: Decimal,
    alerts: Vec<Alert>,
    explanation: String,
}

impl EstimateOutput {
    pub fn vat_regime(&self) -> VatRegime {
        self.vat_regime
    }

    pub fn transfer_tax(&self) -> Money {
        self.transfer_tax
    }

    pub fn notary_emoluments(&self) -> Money {
        self.notary_emoluments
    }

    pub fn security_contribution(&self) -> Money {
        self.security_contribution
    }

    pub fn disbursement(&self) -> Money {
        self.disbursement
    }

    pub fn vat_collected(&self) -> Money {
        self.vat_collected
    }

    pub fn vat_on_margin(&self) -> Money {
        self.vat_on_margin
    }

    pub fn gross_margin(&self) -> Money {
        self.gross_margin
    }

    pub fn net_margin(&self) -> Money {
        self.net_margin
    }

    /// Net margin over total cost, labelled as a 12-month return.
    ///
    /// This is NOT an internal rate of return: no holding period or
    /// discounting is applied. Do not compare it with a true IRR.
    pub fn simplified_return(&self) -> Decimal {
        self.simplified_return
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Ordered audit trail. Always contains the four calculation sections.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Total notary cost (emoluments + security contribution + disbursement).
    pub fn notary_total(&self) -> Money {
        self.notary_emoluments + self.security_contribution + self.disbursement
    }
}

impl fmt::Display for EstimateOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Estimate ({}) ===", self.vat_regime)?;
        writeln!(f, "Transfer tax:          {}", format_eur(self.transfer_tax))?;
        writeln!(f, "Notary emoluments:     {}", format_eur(self.notary_emoluments))?;
        writeln!(f, "Security contribution: {}", format_eur(self.security_contribution))?;
        writeln!(f, "Disbursement:          {}", format_eur(self.disbursement))?;
        writeln!(f, "VAT collected:         {}", format_eur(self.vat_collected))?;
        writeln!(f, "VAT on margin:         {}", format_eur(self.vat_on_margin))?;
        writeln!(f, "Gross margin:          {}", format_eur(self.gross_margin))?;
        writeln!(f, "Net margin:            {}", format_eur(self.net_margin))?;
        writeln!(
            f,
            "Simplified return:     {}",
            format_percent(self.simplified_return)
        )?;
        writeln!(f, "\n--- Details ---")?;
        writeln!(f, "{}", self.explanation)
    }
}

/// Orchestrates the calculators over an injected, read-only rate repository.
///
/// The engine holds no mutable state: one instance can serve any number of
/// concurrent callers.
///
/// # Examples
///
/// ```
/// use estimate_engine::core::input::{EstimateInput, VatRegime};
/// use estimate_engine::engine::EstimateEngine;
/// use rust_decimal_macros::dec;
///
/// let engine = EstimateEngine::with_defaults();
/// let input = EstimateInput::new("69", VatRegime::Exempt, dec!(250000), dec!(310000));
/// let output = engine.estimate(&input);
///
/// assert_eq!(output.transfer_tax(), dec!(11250.00));
/// assert_eq!(output.vat_collected(), dec!(0));
/// assert!(output.explanation().contains("1. TRANSFER TAX:"));
/// ```
#[derive(Debug, Clone)]
pub struct EstimateEngine {
    repository: Arc<RateRepository>,
}

impl EstimateEngine {
    pub fn new(repository: Arc<RateRepository>) -> Self {
        Self { repository }
    }

    /// Engine over the built-in rate tables.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(RateRepository::default()))
    }

    /// Engine over the process-wide repository (see [`RateRepository::global`]).
    pub fn global() -> Self {
        Self::new(RateRepository::global())
    }

    pub fn repository(&self) -> &RateRepository {
        &self.repository
    }

    /// Run the full estimate. Never fails.
    ///
    /// Stages run strictly in [`Stage::ORDER`]; each one only reads the
    /// input and the results of earlier stages.
    pub fn estimate(&self, input: &EstimateInput) -> EstimateOutput {
        let dealer_eligible = input.dealer_eligible();
        enter(Stage::Start);

        enter(Stage::TransferTax);
        let tax = compute_transfer_tax(
            self.repository.rates(),
            input.purchase_price_gross,
            &input.department,
            dealer_eligible,
        );

        enter(Stage::NotaryFees);
        let notary = compute_notary_fees(self.repository.schedule(), input.purchase_price_gross);

        enter(Stage::Vat);
        let vat = compute_vat(input);

        enter(Stage::Margins);
        let margins = compute_margins(input, &tax, &notary, &vat);

        enter(Stage::Explain);
        let explanation = ExplanationBuilder::new()
            .transfer_tax(&tax)
            .notary_fees(&notary)
            .vat(&vat)
            .margins(&margins);

        enter(Stage::Alerts);
        let alerts = generate_alerts(input, dealer_eligible);
        let explanation = explanation.alerts(&alerts).build();

        enter(Stage::Done);
        debug!(
            "estimate dept={} regime={} transfer_tax={} emoluments={} net_margin={} return={}",
            input.department,
            input.vat_regime,
            tax.amount,
            notary.emoluments,
            margins.net_margin,
            margins.simplified_return
        );

        EstimateOutput {
            vat_regime: vat.regime(),
            transfer_tax: tax.amount,
            notary_emoluments: notary.emoluments,
            security_contribution: notary.security_contribution,
            disbursement: notary.disbursement,
            vat_collected: vat.vat_collected(),
            vat_on_margin: vat.vat_on_margin(),
            gross_margin: margins.gross_margin,
            net_margin: margins.net_margin,
            simplified_return: margins.simplified_return,
            alerts,
            explanation,
        }
    }
}

fn enter(stage: Stage) {
    trace!("estimate stage {:?}", stage);
}
