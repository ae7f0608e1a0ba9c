use crate::calculators::notary::NotaryFees;
use crate::calculators::transfer_tax::TransferTax;
use crate::calculators::vat::VatLiability;
use crate::core::input::EstimateInput;
use crate::core::money::{round2, round4, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Profitability of the operation once every fee and tax is counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginSummary {
    pub purchase_price: Money,
    pub transfer_tax: Money,
    pub notary_emoluments: Money,
    pub security_contribution: Money,
    pub disbursement: Money,
    /// Purchase price plus transfer tax and every notary item.
    pub acquisition_cost: Money,
    pub renovation_cost: Money,
    pub agency_fee: Money,
    /// `acquisition_cost + renovation_cost + agency_fee`.
    pub total_cost: Money,
    pub sale_price: Money,
    /// `round2(sale_price - total_cost)`.
    pub gross_margin: Money,
    /// VAT collected plus VAT on margin.
    pub vat_total: Money,
    /// `gross_margin - vat_total`.
    pub net_margin: Money,
    /// `round4(net_margin / total_cost)`, zero when `total_cost` is not positive.
    ///
    /// This is a plain ratio labelled as a 12-month return. No holding period
    /// or discounting enters it; it is NOT an internal rate of return.
    pub simplified_return: Decimal,
}

impl MarginSummary {
    /// Whether a return could be computed (total cost above zero).
    pub fn has_return(&self) -> bool {
        self.total_cost > Decimal::ZERO
    }
}

/// Combine the calculator outputs into gross margin, net margin and return.
pub fn compute_margins(
    input: &EstimateInput,
    transfer_tax: &TransferTax,
    notary: &NotaryFees,
    vat: &VatLiability,
) -> MarginSummary {
    let acquisition_cost = input.purchase_price_gross
        + transfer_tax.amount
        + notary.emoluments
        + notary.security_contribution
        + notary.disbursement;
    let total_cost = acquisition_cost + input.renovation_cost_gross + input.agency_fee_gross;
    let gross_margin = round2(input.target_sale_price_gross - total_cost);
    let vat_total = vat.total();
    let net_margin = gross_margin - vat_total;

    let simplified_return = if total_cost > Decimal::ZERO {
        net_margin
            .checked_div(total_cost)
            .map(round4)
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    MarginSummary {
        purchase_price: input.purchase_price_gross,
        transfer_tax: transfer_tax.amount,
        notary_emoluments: notary.emoluments,
        security_contribution: notary.security_contribution,
        disbursement: notary.disbursement,
        acquisition_cost,
        renovation_cost: input.renovation_cost_gross,
        agency_fee: input.agency_fee_gross,
        total_cost,
        sale_price: input.target_sale_price_gross,
        gross_margin,
        vat_total,
        net_margin,
        simplified_return,
    }
}
