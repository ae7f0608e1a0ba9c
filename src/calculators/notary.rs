use crate::core::money::{round2, Money, Rate};
use crate::rates::schedule::NotaryFeeSchedule;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Share of the purchase price falling in one emolument tranche.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrancheAllocation {
    pub lower: Money,
    pub upper: Option<Money>,
    pub rate: Rate,
    /// Part of the price allocated to this tranche.
    pub portion: Money,
    /// `portion * rate`, unrounded.
    pub fee: Decimal,
}

/// Notary fees on a purchase: progressive emoluments plus flat-rate items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotaryFees {
    pub base: Money,
    /// Tranches actually consumed, in ascending order. Empty for a zero price.
    pub tranches: Vec<TrancheAllocation>,
    /// Sum of tranche fees, rounded once after summation.
    pub emoluments: Money,
    pub security_contribution_rate: Rate,
    pub security_contribution: Money,
    pub disbursement: Money,
    /// `emoluments + security_contribution + disbursement`.
    pub total: Money,
}

impl NotaryFees {
    /// Sum of the portions allocated across tranches.
    pub fn allocated(&self) -> Money {
        self.tranches.iter().map(|t| t.portion).sum()
    }

    /// True when no notary act applies (non-positive price).
    pub fn is_empty(&self) -> bool {
        self.tranches.is_empty()
    }
}

/// Allocate `purchase_price` across the progressive brackets.
///
/// # Algorithm
///
/// 1. Walk brackets in ascending order while some price remains.
/// 2. A bounded bracket takes `min(remaining, upper - lower)`; the
///    unbounded last bracket takes everything left.
/// 3. Each portion is charged at the bracket rate; the sum is rounded to
///    cents only once, after the loop.
///
/// A zero (or negative) price applies no tranche and yields zero
/// emoluments, zero security contribution and zero disbursement.
///
/// # Examples
///
/// ```
/// use estimate_engine::calculators::notary::compute_notary_fees;
/// use estimate_engine::rates::schedule::NotaryFeeSchedule;
/// use rust_decimal_macros::dec;
///
/// let fees = compute_notary_fees(&NotaryFeeSchedule::default(), dec!(100000));
/// assert_eq!(fees.allocated(), dec!(100000));
/// assert_eq!(fees.emoluments, dec!(1692.10));
/// ```
pub fn compute_notary_fees(schedule: &NotaryFeeSchedule, purchase_price: Money) -> NotaryFees {
    if purchase_price <= Decimal::ZERO {
        return NotaryFees {
            base: purchase_price,
            tranches: Vec::new(),
            emoluments: Decimal::ZERO,
            security_contribution_rate: schedule.security_contribution_rate,
            security_contribution: Decimal::ZERO,
            disbursement: Decimal::ZERO,
            total: Decimal::ZERO,
        };
    }

    let mut remaining = purchase_price;
    let mut raw_emoluments = Decimal::ZERO;
    let mut tranches = Vec::with_capacity(schedule.brackets.len());

    for bracket in &schedule.brackets {
        if remaining <= Decimal::ZERO {
            break;
        }
        let portion = match bracket.width() {
            Some(width) => remaining.min(width),
            None => remaining,
        };
        let fee = portion * bracket.rate;
        raw_emoluments += fee;
        remaining -= portion;
        tranches.push(TrancheAllocation {
            lower: bracket.lower,
            upper: bracket.upper,
            rate: bracket.rate,
            portion,
            fee,
        });
    }

    let emoluments = round2(raw_emoluments);
    let security_contribution = round2(purchase_price * schedule.security_contribution_rate);
    let disbursement = schedule.flat_disbursement;

    NotaryFees {
        base: purchase_price,
        tranches,
        emoluments,
        security_contribution_rate: schedule.security_contribution_rate,
        security_contribution,
        disbursement,
        total: emoluments + security_contribution + disbursement,
    }
}
