//! Random estimate inputs for benchmarks and smoke tests.

use crate::core::department::DepartmentCode;
use crate::core::input::{Assumptions, EstimateInput, VatRegime};
use crate::core::money::round2;
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a batch of random inputs.
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Number of inputs to generate.
    pub count: usize,
    /// Departments to draw from.
    pub departments: Vec<DepartmentCode>,
    /// Minimum purchase price, in whole euros.
    pub min_price: u64,
    /// Maximum purchase price, in whole euros.
    pub max_price: u64,
    /// Maximum renovation budget as a fraction of the purchase price (percent).
    pub max_renovation_percent: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            count: 100,
            departments: ["75", "92", "69", "13", "33", "36"]
                .iter()
                .map(|code| DepartmentCode::new(*code))
                .collect(),
            min_price: 50_000,
            max_price: 2_000_000,
            max_renovation_percent: 40,
        }
    }
}

/// Generate random estimate inputs spread over every VAT regime.
pub fn generate_random_inputs(config: &InputConfig) -> Vec<EstimateInput> {
    let mut rng = rand::thread_rng();
    let regimes = [VatRegime::Standard, VatRegime::Margin, VatRegime::Exempt];
    let max_price = config.max_price.max(config.min_price + 1);

    (0..config.count)
        .map(|_| {
            let department = if config.departments.is_empty() {
                DepartmentCode::new("75")
            } else {
                config.departments[rng.gen_range(0..config.departments.len())].clone()
            };
            let purchase_cents = rng.gen_range(config.min_price * 100..max_price * 100);
            let purchase = Decimal::new(purchase_cents as i64, 2);
            let renovation_pct = rng.gen_range(0..=config.max_renovation_percent);
            let renovation = round2(purchase * Decimal::from(renovation_pct) / Decimal::ONE_HUNDRED);
            let agency = round2(purchase * Decimal::new(rng.gen_range(0..=6), 2));
            // Sale between 80% and 160% of the direct costs.
            let markup = Decimal::new(rng.gen_range(80..=160), 2);
            let sale = round2((purchase + renovation + agency) * markup);

            EstimateInput::new(
                department,
                regimes[rng.gen_range(0..regimes.len())],
                purchase,
                sale,
            )
            .with_renovation(renovation)
            .with_agency_fee(agency)
            .with_assumptions(Assumptions {
                reduced_dealer_rate_eligible: rng.gen_bool(0.5),
                structural_renovation: rng.gen_bool(0.2),
            })
        })
        .collect()
}
