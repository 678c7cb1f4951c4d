//! Half-away-from-zero rounding in decimal arithmetic.

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for `change` and summed capital.
pub const PRICE_DP: u32 = 3;
/// Decimal places kept for `changePercent`.
pub const PERCENT_DP: u32 = 2;

/// Round `value` to `dp` decimal places, ties away from zero.
///
/// The float is taken at its shortest decimal rendering, so `1.0005` rounds
/// to `1.001` rather than following the binary approximation below it.
/// Non-finite input is returned unchanged.
pub fn round_half_away(value: f64, dp: u32) -> f64 {
    match to_decimal(value) {
        Some(decimal) => from_decimal(round_decimal(decimal, dp)).unwrap_or(value),
        None => value,
    }
}

/// `minuend - subtrahend`, rounded to `dp` places.
pub fn rounded_difference(minuend: f64, subtrahend: f64, dp: u32) -> f64 {
    let difference = to_decimal(minuend)
        .zip(to_decimal(subtrahend))
        .and_then(|(minuend, subtrahend)| minuend.checked_sub(subtrahend));

    match difference {
        Some(difference) => from_decimal(round_decimal(difference, dp))
            .unwrap_or_else(|| round_half_away(minuend - subtrahend, dp)),
        None => round_half_away(minuend - subtrahend, dp),
    }
}

/// `part / whole * 100`, rounded to `dp` places. Zero when `whole` is zero.
pub fn rounded_percent(part: f64, whole: f64, dp: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }

    let percent = to_decimal(part)
        .zip(to_decimal(whole))
        .and_then(|(part, whole)| part.checked_div(whole))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

    match percent {
        Some(percent) => from_decimal(round_decimal(percent, dp))
            .unwrap_or_else(|| round_half_away(part / whole * 100.0, dp)),
        None => round_half_away(part / whole * 100.0, dp),
    }
}

fn round_decimal(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn from_decimal(value: Decimal) -> Option<f64> {
    f64::from_str(&value.to_string())
        .ok()
        .or_else(|| value.to_f64())
}

fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
}
