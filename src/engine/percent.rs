//! Fixed-point percentage arithmetic.
//!
//! Every percentage the engine reports goes through [`round_percent`] so that
//! results are bit-exact across runs and platforms.

use rust_decimal::{Decimal, RoundingStrategy};

/// One hundred, as a decimal.
pub const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Rounds to one decimal place, half away from zero, with scale fixed at 1.
///
/// # Examples
///
/// ```
/// use workforce_compliance::engine::round_percent;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_percent(Decimal::new(44444, 3)).to_string(), "44.4");
/// assert_eq!(round_percent(Decimal::new(125, 2)).to_string(), "1.3");
/// assert_eq!(round_percent(Decimal::from(40)).to_string(), "40.0");
/// ```
pub fn round_percent(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    // -0.03 rounds to zero; report it as 0.0, not -0.0
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Share of `part` in `total` as a percentage rounded to 1 dp.
///
/// A zero total yields `0.0` rather than an error.
pub fn share_percent(part: u32, total: u32) -> Decimal {
    if total == 0 {
        return round_percent(Decimal::ZERO);
    }
    round_percent(Decimal::from(part) * ONE_HUNDRED / Decimal::from(total))
}

/// Headcount-weighted average of `(value, weight)` pairs, rounded to 1 dp.
///
/// Pairs with zero weight do not count towards the denominator. Returns
/// `None` when no pair carries weight.
pub fn weighted_average<I>(pairs: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (Decimal, u32)>,
{
    let (sum, base) = pairs
        .into_iter()
        .filter(|(_, weight)| *weight > 0)
        .fold((Decimal::ZERO, 0u64), |(sum, base), (value, weight)| {
            (sum + value * Decimal::from(weight), base + u64::from(weight))
        });

    if base == 0 {
        None
    } else {
        Some(round_percent(sum / Decimal::from(base)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_share_percent_rounds_half_away_from_zero() {
        // 1/8 = 12.5%, 1/16 = 6.25% -> 6.3
        assert_eq!(share_percent(1, 8), dec("12.5"));
        assert_eq!(share_percent(1, 16), dec("6.3"));
        assert_eq!(share_percent(2, 3), dec("66.7"));
    }

    #[test]
    fn test_share_percent_zero_total_is_zero() {
        assert_eq!(share_percent(0, 0), Decimal::ZERO);
        assert_eq!(share_percent(0, 0).to_string(), "0.0");
    }

    #[test]
    fn test_round_percent_negative_midpoint() {
        assert_eq!(round_percent(dec("-2.25")), dec("-2.3"));
        assert_eq!(round_percent(dec("-2.24")), dec("-2.2"));
    }

    #[test]
    fn test_round_percent_has_no_negative_zero() {
        assert_eq!(round_percent(dec("-0.03")).to_string(), "0.0");
    }

    #[test]
    fn test_weighted_average_ignores_zero_weight() {
        let avg = weighted_average(vec![(dec("30"), 8), (dec("20"), 5), (dec("90"), 0)]);
        // (240 + 100) / 13 = 26.153...
        assert_eq!(avg, Some(dec("26.2")));
    }

    #[test]
    fn test_weighted_average_empty_is_none() {
        assert_eq!(weighted_average(Vec::new()), None);
        assert_eq!(weighted_average(vec![(dec("30"), 0)]), None);
    }
}
