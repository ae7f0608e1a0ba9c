use rust_decimal::{Decimal, RoundingStrategy};

/// Currency amounts (euros). Never `f64`.
pub type Money = Decimal;

/// Rates expressed as decimals (0.045 = 4.5%).
pub type Rate = Decimal;

/// Round a currency amount to cents, half away from zero.
///
/// For the non-negative amounts the engine produces this is round-half-up.
/// Rounding an already-rounded value returns it unchanged.
///
/// # Examples
///
/// ```
/// use estimate_engine::core::money::round2;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round2(dec!(2.345)), dec!(2.35));
/// assert_eq!(round2(dec!(2.35)), dec!(2.35));
/// ```
pub fn round2(value: Decimal) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a ratio to four decimal places, half away from zero.
pub fn round4(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount as `1,234,567.89 €`.
pub fn format_eur(amount: Money) -> String {
    let rounded = round2(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = fixed(rounded.abs(), 2);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!(
        "{}{}.{} €",
        if negative { "-" } else { "" },
        grouped,
        frac_part
    )
}

/// Render a rate as a percentage with three decimals (`0.00715` -> `0.715%`).
pub fn format_rate(rate: Rate) -> String {
    format!("{}%", fixed(rate * Decimal::ONE_HUNDRED, 3))
}

/// Render a ratio as a percentage with two decimals (`0.2217` -> `22.17%`).
pub fn format_percent(ratio: Decimal) -> String {
    format!("{}%", fixed(ratio * Decimal::ONE_HUNDRED, 2))
}

/// Round to `dp` places and print exactly that many decimals.
fn fixed(value: Decimal, dp: u32) -> String {
    let mut scaled = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    scaled.rescale(dp);
    scaled.to_string()
}
