use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Moneyline;

/// Implied win probability of a moneyline, rounded to 4 decimals.
///
/// Underdogs (`m > 0`) pay `m` per 100 staked: `100 / (m + 100)`.
/// Favorites (`m <= 0`) need `|m|` staked to win 100: `|m| / (|m| + 100)`.
pub fn moneyline_to_probability(moneyline: Option<Moneyline>) -> Option<f64> {
    let m = f64::from(moneyline?.value());

    let probability = if m > 0.0 {
        100.0 / (m + 100.0)
    } else {
        m.abs() / (m.abs() + 100.0)
    };

    Some(round_to(probability, 4))
}

/// Parse and convert in one step. Text that is not an integer has no probability.
pub fn moneyline_str_to_probability(moneyline: &str) -> Option<f64> {
    moneyline_to_probability(moneyline.parse().ok())
}

/// Decimal price `1 / p`, rounded to 2 decimals. Zero probability has no price.
pub fn probability_to_price(probability: Option<f64>) -> Option<f64> {
    match probability {
        Some(p) if p != 0.0 => Some(round_to(1.0 / p, 2)),
        _ => None,
    }
}

/// Round to `decimals` places, ties to even.
///
/// The float is taken at its exact binary value, so `0.15625` is a tie and
/// rounds to `0.1562`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    match Decimal::from_f64_retain(value) {
        Some(d) => {
            let rounded = d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven);
            rounded.mantissa() as f64 / 10f64.powi(rounded.scale() as i32)
        }
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prob(m: i32) -> f64 {
        moneyline_to_probability(Some(Moneyline(m))).unwrap()
    }

    #[test]
    fn test_even_money() {
        let p = moneyline_to_probability(Some(Moneyline(100)));
        assert_eq!(p, Some(0.5));
        assert_eq!(probability_to_price(p), Some(2.0));
    }

    #[test]
    fn test_favorite() {
        let p = moneyline_to_probability(Some(Moneyline(-200)));
        assert_eq!(p, Some(0.6667));
        assert_eq!(probability_to_price(p), Some(1.5));
    }

    #[test]
    fn test_underdog() {
        assert_eq!(prob(150), 0.4);
        assert_eq!(prob(300), 0.25);
        assert_eq!(prob(-110), 0.5238);
    }

    #[test]
    fn test_positive_lines_decrease() {
        let mut last = 1.0;
        for m in (100..=1000).step_by(25) {
            let p = prob(m);
            assert!(p > 0.0 && p < 1.0, "{} -> {}", m, p);
            assert!(p < last, "{} -> {} not below {}", m, p, last);
            assert_eq!(p, round_to(100.0 / (f64::from(m) + 100.0), 4));
            last = p;
        }
    }

    #[test]
    fn test_negative_lines_increase_with_magnitude() {
        let mut last = 0.0;
        for m in (100..=1000).step_by(25) {
            let p = prob(-m);
            assert!(p > 0.0 && p < 1.0);
            assert!(p > last, "-{} -> {} not above {}", m, p, last);
            last = p;
        }
    }

    #[test]
    fn test_invalid_input_has_no_price() {
        for input in ["", "N/A", "abc", "EVEN", "-1.5"] {
            let p = moneyline_str_to_probability(input);
            assert_eq!(p, None, "{:?}", input);
            assert_eq!(probability_to_price(p), None);
        }
        assert_eq!(moneyline_str_to_probability("+150"), Some(0.4));
        assert_eq!(moneyline_to_probability(None), None);
    }

    #[test]
    fn test_zero_probability_has_no_price() {
        assert_eq!(probability_to_price(Some(0.0)), None);

        // A zero moneyline lands in the favorite branch with probability 0
        let p = moneyline_to_probability(Some(Moneyline(0)));
        assert_eq!(p, Some(0.0));
        assert_eq!(probability_to_price(p), None);
    }

    #[test]
    fn test_exact_ties_round_to_even() {
        // 100 / 640 = 0.15625 and 100 / 3200 = 0.03125
        assert_eq!(prob(540), 0.1562);
        assert_eq!(prob(3100), 0.0312);

        // 1 / 0.064 = 15.625 and 1 / 0.0128 = 78.125
        assert_eq!(probability_to_price(Some(prob(1462))), Some(15.62));
        assert_eq!(probability_to_price(Some(prob(7712))), Some(78.12));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.66666, 4), 0.6667);
        assert_eq!(round_to(1.49993, 2), 1.5);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
    }
}
