use crate::core::department::DepartmentCode;
use crate::core::money::{round2, Money, Rate};
use crate::rates::table::{RateSource, RateTable};
use serde::{Deserialize, Serialize};

/// Transfer tax (DMTO) on a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferTax {
    /// Purchase price the rate applies to.
    pub base: Money,
    pub rate: Rate,
    pub source: RateSource,
    /// `round2(base * rate)`.
    pub amount: Money,
}

/// Compute the transfer tax on `purchase_price`.
///
/// Dealer-eligible purchases use the reduced rate whatever the department.
/// Otherwise the department's rate applies, or the default rate for an
/// unlisted department. There is no failure case.
///
/// # Examples
///
/// ```
/// use estimate_engine::calculators::transfer_tax::compute_transfer_tax;
/// use estimate_engine::core::department::DepartmentCode;
/// use estimate_engine::rates::table::RateTable;
/// use rust_decimal_macros::dec;
///
/// let tax = compute_transfer_tax(&RateTable::default(), dec!(300000), &DepartmentCode::new("75"), true);
/// assert_eq!(tax.amount, dec!(2145.00));
/// ```
pub fn compute_transfer_tax(
    table: &RateTable,
    purchase_price: Money,
    department: &DepartmentCode,
    dealer_eligible: bool,
) -> TransferTax {
    let (rate, source) = table.applicable_rate(department, dealer_eligible);
    TransferTax {
        base: purchase_price,
        rate,
        source,
        amount: round2(purchase_price * rate),
    }
}
