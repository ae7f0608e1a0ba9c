//! Audit-trail rendering.
//!
//! The builder only formats values already held by the calculator
//! breakdowns. It performs no arithmetic of its own, so the text always
//! matches the numbers returned alongside it.

use crate::calculators::margins::MarginSummary;
use crate::calculators::notary::{NotaryFees, TrancheAllocation};
use crate::calculators::transfer_tax::TransferTax;
use crate::calculators::vat::{vat_divisor, VatLiability, VAT_RATE};
use crate::core::money::{format_eur, format_percent, format_rate};
use crate::rates::table::RateSource;
use crate::report::alerts::Alert;

pub const TRANSFER_TAX_TITLE: &str = "TRANSFER TAX";
pub const NOTARY_FEES_TITLE: &str = "NOTARY FEES";
pub const VAT_TITLE: &str = "VAT";
pub const MARGINS_TITLE: &str = "MARGINS";
pub const ALERTS_TITLE: &str = "ALERTS";

/// Note emitted when the margin regime finds nothing to tax.
pub const NO_TAXABLE_MARGIN: &str = "no taxable margin";

#[derive(Debug, Clone, PartialEq)]
struct Section {
    title: &'static str,
    lines: Vec<String>,
}

/// Accumulates numbered sections in the order they are added.
///
/// # Examples
///
/// ```
/// use estimate_engine::calculators::vat::VatLiability;
/// use estimate_engine::report::explanation::ExplanationBuilder;
///
/// let text = ExplanationBuilder::new().vat(&VatLiability::Exempt).build();
/// assert!(text.starts_with("1. VAT:"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplanationBuilder {
    sections: Vec<Section>,
}

impl ExplanationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, title: &'static str, lines: Vec<String>) -> Self {
        self.sections.push(Section { title, lines });
        self
    }

    pub fn transfer_tax(self, tax: &TransferTax) -> Self {
        let label = match &tax.source {
            RateSource::Dealer => "Reduced professional-dealer rate".to_string(),
            RateSource::Department(code) => format!("Department {} rate", code),
            RateSource::Default(code) => format!("Department {} not listed, default rate", code),
        };
        let line = format!(
            "{}: {} × {} = {}",
            label,
            format_eur(tax.base),
            format_rate(tax.rate),
            format_eur(tax.amount)
        );
        self.push(TRANSFER_TAX_TITLE, vec![line])
    }

    pub fn notary_fees(self, fees: &NotaryFees) -> Self {
        let mut lines = vec!["Emoluments:".to_string()];
        if fees.is_empty() {
            lines.push("  No tranche applicable (purchase price is zero)".to_string());
        }
        lines.extend(fees.tranches.iter().map(tranche_line));
        lines.push(format!("  Total emoluments: {}", format_eur(fees.emoluments)));
        lines.push(format!(
            "Security contribution: {} × {} = {}",
            format_eur(fees.base),
            format_rate(fees.security_contribution_rate),
            format_eur(fees.security_contribution)
        ));
        lines.push(format!("Flat disbursement: {}", format_eur(fees.disbursement)));
        lines.push(format!(
            "Total notary fees: {} + {} + {} = {}",
            format_eur(fees.emoluments),
            format_eur(fees.security_contribution),
            format_eur(fees.disbursement),
            format_eur(fees.total)
        ));
        self.push(NOTARY_FEES_TITLE, lines)
    }

    pub fn vat(self, vat: &VatLiability) -> Self {
        let divisor = vat_divisor().to_string();
        let lines = match vat {
            VatLiability::Standard {
                sale_price_gross,
                vat_collected,
                sale_price_net,
            } => vec![
                format!("Standard regime at {}", format_rate(VAT_RATE)),
                format!(
                    "VAT collected: {} - {} / {} = {}",
                    format_eur(*sale_price_gross),
                    format_eur(*sale_price_gross),
                    divisor,
                    format_eur(*vat_collected)
                ),
                format!(
                    "Sale price excl. VAT: {} - {} = {}",
                    format_eur(*sale_price_gross),
                    format_eur(*vat_collected),
                    format_eur(*sale_price_net)
                ),
            ],
            VatLiability::Margin {
                purchase_price,
                renovation_cost,
                agency_fee,
                total_cost,
                sale_price_gross,
                taxable,
            } => {
                let mut lines = vec![
                    format!("Margin regime at {}", format_rate(VAT_RATE)),
                    format!(
                        "Total costs: {} + {} + {} = {}",
                        format_eur(*purchase_price),
                        format_eur(*renovation_cost),
                        format_eur(*agency_fee),
                        format_eur(*total_cost)
                    ),
                ];
                match taxable {
                    Some(margin) => {
                        lines.push(format!(
                            "Margin incl. VAT: {} - {} = {}",
                            format_eur(*sale_price_gross),
                            format_eur(*total_cost),
                            format_eur(margin.margin_gross)
                        ));
                        lines.push(format!(
                            "VAT on margin: {} - {} / {} = {}",
                            format_eur(margin.margin_gross),
                            format_eur(margin.margin_gross),
                            divisor,
                            format_eur(margin.vat)
                        ));
                        lines.push(format!(
                            "Margin excl. VAT: {} - {} = {}",
                            format_eur(margin.margin_gross),
                            format_eur(margin.vat),
                            format_eur(margin.margin_net)
                        ));
                    }
                    None => lines.push(format!(
                        "Sale price {} does not exceed total costs {}: {}, VAT on margin = {}",
                        format_eur(*sale_price_gross),
                        format_eur(*total_cost),
                        NO_TAXABLE_MARGIN,
                        format_eur(vat.vat_on_margin())
                    )),
                }
                lines
            }
            VatLiability::Exempt => vec![
                "Exempt regime: VAT exemption applies, no VAT collected and no VAT on margin"
                    .to_string(),
            ],
        };
        self.push(VAT_TITLE, lines)
    }

    pub fn margins(self, summary: &MarginSummary) -> Self {
        let mut lines = vec![
            format!(
                "Acquisition cost: {} + {} + {} + {} + {} = {}",
                format_eur(summary.purchase_price),
                format_eur(summary.transfer_tax),
                format_eur(summary.notary_emoluments),
                format_eur(summary.security_contribution),
                format_eur(summary.disbursement),
                format_eur(summary.acquisition_cost)
            ),
            format!(
                "Total cost: {} + {} + {} = {}",
                format_eur(summary.acquisition_cost),
                format_eur(summary.renovation_cost),
                format_eur(summary.agency_fee),
                format_eur(summary.total_cost)
            ),
            format!(
                "Gross margin: {} - {} = {}",
                format_eur(summary.sale_price),
                format_eur(summary.total_cost),
                format_eur(summary.gross_margin)
            ),
            format!(
                "Net margin: {} - {} VAT = {}",
                format_eur(summary.gross_margin),
                format_eur(summary.vat_total),
                format_eur(summary.net_margin)
            ),
        ];
        if summary.has_return() {
            lines.push(format!(
                "Simplified return (12-month holding assumed, not an IRR): {} / {} = {}",
                format_eur(summary.net_margin),
                format_eur(summary.total_cost),
                format_percent(summary.simplified_return)
            ));
        } else {
            lines.push(format!(
                "Simplified return: total cost is zero, return = {}",
                format_percent(summary.simplified_return)
            ));
        }
        self.push(MARGINS_TITLE, lines)
    }

    /// Adds the alerts section only when there is at least one alert.
    pub fn alerts(self, alerts: &[Alert]) -> Self {
        if alerts.is_empty() {
            return self;
        }
        let lines = alerts.iter().map(|a| format!("- {}", a)).collect();
        self.push(ALERTS_TITLE, lines)
    }

    pub fn build(&self) -> String {
        self.sections
            .iter()
            .enumerate()
            .map(|(i, section)| {
                format!("{}. {}:\n{}", i + 1, section.title, section.lines.join("\n"))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn tranche_line(tranche: &TrancheAllocation) -> String {
    let range = match tranche.upper {
        Some(upper) => format!(
            "{} to {}",
            format_eur(tranche.lower),
            format_eur(upper)
        ),
        None => format!("Above {}", format_eur(tranche.lower)),
    };
    format!(
        "  {}: {} × {} = {}",
        range,
        format_eur(tranche.portion),
        format_rate(tranche.rate),
        format_eur(tranche.fee)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::notary::compute_notary_fees;
    use crate::calculators::transfer_tax::compute_transfer_tax;
    use crate::calculators::vat::compute_vat;
    use crate::core::department::DepartmentCode;
    use crate::core::input::{EstimateInput, VatRegime};
    use crate::rates::schedule::NotaryFeeSchedule;
    use crate::rates::table::RateTable;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transfer_tax_line() {
        let tax = compute_transfer_tax(
            &RateTable::default(),
            dec!(300000),
            &DepartmentCode::new("75"),
            true,
        );
        let text = ExplanationBuilder::new().transfer_tax(&tax).build();
        assert_eq!(
            text,
            "1. TRANSFER TAX:\nReduced professional-dealer rate: 300,000.00 € × 0.715% = 2,145.00 €"
        );
    }

    #[test]
    fn test_notary_lines() {
        let fees = compute_notary_fees(&NotaryFeeSchedule::default(), dec!(100000));
        let text = ExplanationBuilder::new().notary_fees(&fees).build();
        assert!(text.contains("  0.00 € to 6,500.00 €: 6,500.00 € × 3.800% = 247.00 €"));
        assert!(text.contains("  Above 60,000.00 €: 40,000.00 € × 1.220% = 488.00 €"));
        assert!(text.contains("Total emoluments: 1,692.10 €"));
        assert!(text.contains("Security contribution: 100,000.00 € × 0.100% = 100.00 €"));
        assert!(text.contains("Flat disbursement: 800.00 €"));
    }

    #[test]
    fn test_notary_zero_price() {
        let fees = compute_notary_fees(&NotaryFeeSchedule::default(), Decimal::ZERO);
        let text = ExplanationBuilder::new().notary_fees(&fees).build();
        assert!(text.contains("No tranche applicable"));
    }

    #[test]
    fn test_margin_vat_no_taxable_margin() {
        let input = EstimateInput::new("75", VatRegime::Margin, dec!(300000), dec!(300000));
        let text = ExplanationBuilder::new().vat(&compute_vat(&input)).build();
        assert!(text.contains(NO_TAXABLE_MARGIN));
        assert!(text.contains("VAT on margin = 0.00 €"));
    }

    #[test]
    fn test_standard_vat_lines() {
        let input = EstimateInput::new("92", VatRegime::Standard, dec!(240000), dec!(360000));
        let text = ExplanationBuilder::new().vat(&compute_vat(&input)).build();
        assert!(text.contains("VAT collected: 360,000.00 € - 360,000.00 € / 1.20 = 60,000.00 €"));
        assert!(text.contains("Sale price excl. VAT: 360,000.00 € - 60,000.00 € = 300,000.00 €"));
    }

    #[test]
    fn test_vat_lines_exact_at_half_cent() {
        let input = EstimateInput::new("92", VatRegime::Standard, dec!(240000), dec!(360000.03));
        let text = ExplanationBuilder::new().vat(&compute_vat(&input)).build();
        assert!(text.contains("VAT collected: 360,000.03 € - 360,000.03 € / 1.20 = 60,000.01 €"));
        assert!(text.contains("Sale price excl. VAT: 360,000.03 € - 60,000.01 € = 300,000.02 €"));

        let input = EstimateInput::new("75", VatRegime::Margin, dec!(100000), dec!(100000.03));
        let text = ExplanationBuilder::new().vat(&compute_vat(&input)).build();
        assert!(text.contains("Margin incl. VAT: 100,000.03 € - 100,000.00 € = 0.03 €"));
        assert!(text.contains("VAT on margin: 0.03 € - 0.03 € / 1.20 = 0.01 €"));
        assert!(text.contains("Margin excl. VAT: 0.03 € - 0.01 € = 0.02 €"));
    }

    #[test]
    fn test_alerts_section_skipped_when_empty() {
        let builder = ExplanationBuilder::new().vat(&VatLiability::Exempt).alerts(&[]);
        assert_eq!(builder.sections.len(), 1);
    }

    #[test]
    fn test_sections_are_numbered_in_order() {
        let text = ExplanationBuilder::new()
            .vat(&VatLiability::Exempt)
            .alerts(&[Alert::StructuralWorks])
            .build();
        let vat_at = text.find("1. VAT:").unwrap();
        let alerts_at = text.find("2. ALERTS:").unwrap();
        assert!(vat_at < alerts_at);
        assert!(text.ends_with(&format!("- {}", Alert::StructuralWorks)));
    }
}
