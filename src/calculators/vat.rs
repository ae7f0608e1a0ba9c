use crate::core::input::{EstimateInput, VatRegime};
use crate::core::money::{round2, Money, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Fixed VAT rate. Not configurable per call.
pub const VAT_RATE: Rate = dec!(0.20);

/// Divisor turning a VAT-inclusive amount into a VAT-exclusive one.
pub fn vat_divisor() -> Decimal {
    Decimal::ONE + VAT_RATE
}

/// Taxable margin under the margin regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxableMargin {
    /// `sale_price - total_cost`, VAT-inclusive.
    pub margin_gross: Money,
    /// `round2(margin_gross - margin_gross / 1.20)`.
    pub vat: Money,
    /// `margin_gross - vat`, exact to the cent.
    pub margin_net: Money,
}

/// VAT owed on the resale under exactly one regime.
///
/// The variant carries the values used to derive the liability, so the
/// regime and its amounts can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "regime", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VatLiability {
    Standard {
        sale_price_gross: Money,
        /// `round2(sale_price_gross - sale_price_gross / 1.20)`.
        vat_collected: Money,
        /// `sale_price_gross - vat_collected`, exact to the cent.
        sale_price_net: Money,
    },
    Margin {
        purchase_price: Money,
        renovation_cost: Money,
        agency_fee: Money,
        /// `purchase_price + renovation_cost + agency_fee`.
        total_cost: Money,
        sale_price_gross: Money,
        /// `None` when the sale price does not exceed `total_cost`.
        taxable: Option<TaxableMargin>,
    },
    Exempt,
}

impl VatLiability {
    pub fn regime(&self) -> VatRegime {
        match self {
            VatLiability::Standard { .. } => VatRegime::Standard,
            VatLiability::Margin { .. } => VatRegime::Margin,
            VatLiability::Exempt => VatRegime::Exempt,
        }
    }

    /// VAT collected on the full sale price (standard regime only).
    pub fn vat_collected(&self) -> Money {
        match self {
            VatLiability::Standard { vat_collected, .. } => *vat_collected,
            _ => Decimal::ZERO,
        }
    }

    /// VAT on the margin (margin regime only).
    pub fn vat_on_margin(&self) -> Money {
        match self {
            VatLiability::Margin {
                taxable: Some(taxable),
                ..
            } => taxable.vat,
            _ => Decimal::ZERO,
        }
    }

    pub fn total(&self) -> Money {
        self.vat_collected() + self.vat_on_margin()
    }
}

/// Compute the VAT liability for the input's regime.
///
/// - `Standard`: the target sale price is VAT-inclusive at 20%.
/// - `Margin`: VAT applies to `sale - (purchase + renovation + agency)` when
///   positive; a zero or negative margin owes nothing.
/// - `Exempt`: nothing is owed.
pub fn compute_vat(input: &EstimateInput) -> VatLiability {
    match input.vat_regime {
        VatRegime::Standard => {
            let gross = input.target_sale_price_gross;
            let vat_collected = included_vat(gross);
            VatLiability::Standard {
                sale_price_gross: gross,
                vat_collected,
                sale_price_net: gross - vat_collected,
            }
        }
        VatRegime::Margin => {
            let total_cost = input.total_direct_costs();
            let sale = input.target_sale_price_gross;
            let taxable = (sale > total_cost).then(|| {
                let margin_gross = sale - total_cost;
                let vat = included_vat(margin_gross);
                TaxableMargin {
                    margin_gross,
                    vat,
                    margin_net: margin_gross - vat,
                }
            });
            VatLiability::Margin {
                purchase_price: input.purchase_price_gross,
                renovation_cost: input.renovation_cost_gross,
                agency_fee: input.agency_fee_gross,
                total_cost,
                sale_price_gross: sale,
                taxable,
            }
        }
        VatRegime::Exempt => VatLiability::Exempt,
    }
}

/// VAT contained in a VAT-inclusive amount, rounded to cents.
fn included_vat(gross: Money) -> Money {
    round2(gross - gross / vat_divisor())
}
