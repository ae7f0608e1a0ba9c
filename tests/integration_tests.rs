use estimate_engine::core::input::{Assumptions, EstimateInput, VatRegime};
use estimate_engine::engine::EstimateEngine;
use estimate_engine::rates::repository::{RateRepository, RepositoryConfig};
use estimate_engine::report::alerts::Alert;
use estimate_engine::report::explanation::NO_TAXABLE_MARGIN;
use estimate_engine::simulation::sensitivity::{sale_price_sensitivity, SensitivityConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Write;
use std::sync::Arc;

fn dealer() -> Assumptions {
    Assumptions {
        reduced_dealer_rate_eligible: true,
        structural_renovation: false,
    }
}

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// Margin regime, dealer-eligible buyer in Paris.
#[test]
fn margin_regime_dealer_scenario() {
    let engine = EstimateEngine::with_defaults();
    let input = EstimateInput::new("75", VatRegime::Margin, dec!(300000), dec!(520000))
        .with_renovation(dec!(80000))
        .with_agency_fee(dec!(15000))
        .with_assumptions(dealer());

    let output = engine.estimate(&input);

    // 300000 × 0.715%
    assert_eq!(output.transfer_tax(), dec!(2145.00));
    assert_eq!(output.security_contribution(), dec!(300.00));
    assert_eq!(output.disbursement(), dec!(800.00));
    assert!(output.vat_on_margin() > Decimal::ZERO);
    assert_eq!(output.vat_collected(), Decimal::ZERO);
    assert!(output.alerts().is_empty());

    let text = output.explanation();
    assert!(text.contains("Reduced professional-dealer rate"));
    assert!(text.contains("3. VAT:\nMargin regime"));
}

/// Standard regime, no renovation or agency fee.
#[test]
fn standard_regime_scenario() {
    let engine = EstimateEngine::with_defaults();
    let input = EstimateInput::new("92", VatRegime::Standard, dec!(240000), dec!(360000));

    let output = engine.estimate(&input);

    // 240000 × 4.5%
    assert_eq!(output.transfer_tax(), dec!(10800.00));
    assert_eq!(output.vat_collected(), dec!(60000.00));
    assert_eq!(output.vat_on_margin(), Decimal::ZERO);
    assert_eq!(output.notary_emoluments(), dec!(3400.10));
    assert_eq!(output.gross_margin(), dec!(104759.90));
    assert_eq!(output.net_margin(), dec!(44759.90));
    assert_eq!(output.simplified_return(), dec!(0.1754));
}

/// Exempt regime: no VAT at all.
#[test]
fn exempt_regime_scenario() {
    let engine = EstimateEngine::with_defaults();
    let input = EstimateInput::new("69", VatRegime::Exempt, dec!(250000), dec!(310000));

    let output = engine.estimate(&input);

    assert_eq!(output.transfer_tax(), dec!(11250.00));
    assert_eq!(output.vat_collected(), Decimal::ZERO);
    assert_eq!(output.vat_on_margin(), Decimal::ZERO);
    assert_eq!(output.gross_margin(), output.net_margin());
    assert_eq!(output.net_margin(), dec!(44177.90));
}

/// Margin regime where the sale does not cover the costs.
#[test]
fn degenerate_margin_scenario() {
    let engine = EstimateEngine::with_defaults();
    let input = EstimateInput::new("33", VatRegime::Margin, dec!(200000), dec!(230000))
        .with_renovation(dec!(30000))
        .with_assumptions(dealer());

    let output = engine.estimate(&input);

    assert_eq!(output.vat_on_margin(), Decimal::ZERO);
    assert_eq!(output.vat_collected(), Decimal::ZERO);
    assert!(output.explanation().contains(NO_TAXABLE_MARGIN));
    assert!(output.net_margin() < Decimal::ZERO);
}

/// Every monetary input is zero.
#[test]
fn zero_cost_scenario() {
    let engine = EstimateEngine::with_defaults();
    let input = EstimateInput::new("75", VatRegime::Standard, Decimal::ZERO, Decimal::ZERO);

    let output = engine.estimate(&input);

    assert_eq!(output.simplified_return(), Decimal::ZERO);
    assert_eq!(output.transfer_tax(), Decimal::ZERO);
    assert_eq!(output.notary_total(), Decimal::ZERO);
    assert_eq!(output.net_margin(), Decimal::ZERO);
    assert!(output.explanation().contains("4. MARGINS:"));
}

/// Unlisted department falls back to the default rate.
#[test]
fn unlisted_department_uses_default_rate() {
    let engine = EstimateEngine::with_defaults();
    let input = EstimateInput::new("2A", VatRegime::Exempt, dec!(100000), dec!(130000));

    let output = engine.estimate(&input);

    assert_eq!(output.transfer_tax(), dec!(4500.00));
    assert!(output.explanation().contains("Department 2A not listed, default rate"));
}

/// Both alerts, in their fixed order, and the fifth section.
#[test]
fn alerts_scenario() {
    let engine = EstimateEngine::with_defaults();
    let input = EstimateInput::new("13", VatRegime::Margin, dec!(150000), dec!(240000))
        .with_renovation(dec!(40000))
        .with_assumptions(Assumptions {
            reduced_dealer_rate_eligible: false,
            structural_renovation: true,
        });

    let output = engine.estimate(&input);

    assert_eq!(
        output.alerts(),
        &[Alert::StructuralWorks, Alert::MarginRegimeWithoutDealerStatus]
    );
    // Not a dealer, so the departmental rate applies.
    assert_eq!(output.transfer_tax(), dec!(6750.00));
    assert!(output.explanation().contains("5. ALERTS:"));
}

/// Legacy payload keys and regime names are still accepted.
#[test]
fn legacy_payload_is_accepted() {
    let json = r#"{
        "dept": "75",
        "regime_tva": "MARGE",
        "prix_achat_ttc": "300000",
        "prix_vente_ttc": "520000",
        "travaux_ttc": "80000",
        "frais_agence_ttc": "15000",
        "hypotheses": { "md_b_0715_ok": true, "unknown_flag": true }
    }"#;
    let legacy: EstimateInput = serde_json::from_str(json).unwrap();
    let current = EstimateInput::new("75", VatRegime::Margin, dec!(300000), dec!(520000))
        .with_renovation(dec!(80000))
        .with_agency_fee(dec!(15000))
        .with_assumptions(dealer());

    let engine = EstimateEngine::with_defaults();
    assert_eq!(engine.estimate(&legacy), engine.estimate(&current));
}

/// External rate file overrides a department; a broken schedule file falls back.
#[test]
fn configuration_files_and_fallback() {
    let rates = write_temp(
        r#"{
            "default_rate": "0.045",
            "reduced_dealer_rate": "0.00715",
            "departments": { "36": "0.038" }
        }"#,
    );
    let schedule = write_temp("not json at all");
    let config = RepositoryConfig::new()
        .with_rates_path(rates.path())
        .with_schedule_path(schedule.path());
    let engine = EstimateEngine::new(Arc::new(RateRepository::load(&config)));

    let input = EstimateInput::new("36", VatRegime::Exempt, dec!(100000), dec!(130000));
    let output = engine.estimate(&input);

    assert_eq!(output.transfer_tax(), dec!(3800.00));
    // Default schedule: 247 + 256.2 + 700.9 + 488
    assert_eq!(output.notary_emoluments(), dec!(1692.10));
}

/// Custom notary schedule is used end to end.
#[test]
fn custom_schedule_is_applied() {
    let schedule = write_temp(
        r#"{
            "effective_from": "2026-03-01",
            "brackets": [
                { "lower": "0", "upper": "10000", "rate": "0.04" },
                { "lower": "10000", "upper": null, "rate": "0.01" }
            ],
            "security_contribution_rate": "0.001",
            "flat_disbursement": "500"
        }"#,
    );
    let config = RepositoryConfig::new().with_schedule_path(schedule.path());
    let engine = EstimateEngine::new(Arc::new(RateRepository::load(&config)));

    let input = EstimateInput::new("75", VatRegime::Exempt, dec!(50000), dec!(70000));
    let output = engine.estimate(&input);

    // 400 + 400
    assert_eq!(output.notary_emoluments(), dec!(800.00));
    assert_eq!(output.disbursement(), dec!(500.00));
}

/// One engine shared across threads gives the same answer as a serial run.
#[test]
fn concurrent_estimates_match_serial() {
    let engine = EstimateEngine::with_defaults();
    let inputs: Vec<EstimateInput> = (1..=16)
        .map(|i| {
            EstimateInput::new(
                "92",
                VatRegime::Standard,
                Decimal::from(100_000 * i),
                Decimal::from(140_000 * i),
            )
        })
        .collect();
    let serial: Vec<_> = inputs.iter().map(|input| engine.estimate(input)).collect();

    let parallel: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let engine = &engine;
                s.spawn(move || engine.estimate(input))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(serial, parallel);
}

/// Sensitivity over the standard regime: VAT absorbs a sixth of each shock.
#[test]
fn sensitivity_standard_regime() {
    let engine = EstimateEngine::with_defaults();
    let input = EstimateInput::new("92", VatRegime::Standard, dec!(240000), dec!(360000));

    let points = sale_price_sensitivity(&engine, &input, &SensitivityConfig::default());

    assert_eq!(points.len(), 4);
    assert_eq!(points[0].sale_price, dec!(324000.00));
    // 36000 lower sale, 6000 less VAT
    assert_eq!(points[0].impact, dec!(-30000.00));
    assert!(points.windows(2).all(|w| w[0].net_margin < w[1].net_margin));
}

/// Half-cent VAT midpoint: the printed subtractions still add up.
#[test]
fn half_cent_vat_explanation_is_exact() {
    let engine = EstimateEngine::with_defaults();
    let input = EstimateInput::new("92", VatRegime::Standard, dec!(240000), dec!(360000.03));

    let output = engine.estimate(&input);

    assert_eq!(output.vat_collected(), dec!(60000.01));
    let text = output.explanation();
    assert!(text.contains("VAT collected: 360,000.03 € - 360,000.03 € / 1.20 = 60,000.01 €"));
    assert!(text.contains("Sale price excl. VAT: 360,000.03 € - 60,000.01 € = 300,000.02 €"));
}

/// A plain flag map with legacy keys gets the dealer rate and the structural alert.
#[test]
fn legacy_flag_map_is_accepted() {
    let flags: std::collections::HashMap<String, bool> = [
        ("md_b_0715_ok".to_string(), true),
        ("travaux_structurants".to_string(), true),
    ]
    .into_iter()
    .collect();
    let input = EstimateInput::new("75", VatRegime::Margin, dec!(300000), dec!(520000))
        .with_assumptions(Assumptions::from_flags(&flags));

    let output = EstimateEngine::with_defaults().estimate(&input);

    assert_eq!(output.transfer_tax(), dec!(2145.00));
    assert_eq!(output.alerts(), &[Alert::StructuralWorks]);
}
