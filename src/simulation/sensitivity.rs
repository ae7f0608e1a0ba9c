//! Sale-price sensitivity.
//!
//! Re-runs the full estimate with the target sale price shocked up and
//! down, and reports how the net margin moves against the baseline.

use crate::core::input::EstimateInput;
use crate::core::money::{format_eur, format_percent, round2, Money, Rate};
use crate::engine::EstimateEngine;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shocks applied to the target sale price (e.g. `-0.05` = 5% lower).
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityConfig {
    pub shocks: Vec<Rate>,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            shocks: vec![dec!(-0.10), dec!(-0.05), dec!(0.05), dec!(0.10)],
        }
    }
}

/// Outcome of one shocked estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub shock: Rate,
    pub sale_price: Money,
    pub net_margin: Money,
    pub simplified_return: Decimal,
    /// Net margin change against the unshocked estimate.
    pub impact: Money,
}

/// Shocked sale price, rounded to cents and floored at zero.
pub fn shocked_sale_price(sale_price: Money, shock: Rate) -> Money {
    round2(sale_price * (Decimal::ONE + shock)).max(Decimal::ZERO)
}

/// One point per configured shock, in configuration order.
pub fn sale_price_sensitivity(
    engine: &EstimateEngine,
    input: &EstimateInput,
    config: &SensitivityConfig,
) -> Vec<SensitivityPoint> {
    let baseline = engine.estimate(input).net_margin();

    config
        .shocks
        .iter()
        .map(|&shock| {
            let mut shocked = input.clone();
            shocked.target_sale_price_gross = shocked_sale_price(input.target_sale_price_gross, shock);
            let output = engine.estimate(&shocked);
            SensitivityPoint {
                shock,
                sale_price: shocked.target_sale_price_gross,
                net_margin: output.net_margin(),
                simplified_return: output.simplified_return(),
                impact: output.net_margin() - baseline,
            }
        })
        .collect()
}

/// Sensitivity table with its baseline, printable as a text report.
#[derive(Debug, Clone, Serialize)]
pub struct SensitivityReport {
    pub baseline_sale_price: Money,
    pub baseline_net_margin: Money,
    pub points: Vec<SensitivityPoint>,
}

impl SensitivityReport {
    pub fn run(engine: &EstimateEngine, input: &EstimateInput, config: &SensitivityConfig) -> Self {
        Self {
            baseline_sale_price: input.target_sale_price_gross,
            baseline_net_margin: engine.estimate(input).net_margin(),
            points: sale_price_sensitivity(engine, input, config),
        }
    }

    /// The point with the lowest net margin, if any shock was configured.
    pub fn worst_case(&self) -> Option<&SensitivityPoint> {
        self.points.iter().min_by_key(|p| p.net_margin)
    }
}

impl fmt::Display for SensitivityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Sale Price Sensitivity ===")?;
        writeln!(f, "Baseline sale price: {}", format_eur(self.baseline_sale_price))?;
        writeln!(f, "Baseline net margin: {}", format_eur(self.baseline_net_margin))?;
        writeln!(f)?;
        for point in &self.points {
            writeln!(
                f,
                "  {:>8}  sale {:>18}  net {:>18}  return {:>8}  impact {}",
                format_percent(point.shock),
                format_eur(point.sale_price),
                format_eur(point.net_margin),
                format_percent(point.simplified_return),
                format_eur(point.impact)
            )?;
        }
        Ok(())
    }
}
