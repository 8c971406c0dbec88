//! Zone Logic (Pure Functions)
//!
//! Splitting a price interval into evenly spaced boundaries and finding the
//! pair of adjacent boundaries that brackets a price.
//! All functions are deterministic and have no side effects.
//!
//! # Zone Boundaries
//!
//! For an interval `[low, high]` split into `n` steps:
//!
//! ```text
//! step       = (high - low) / n          (0 when n == 0)
//! boundaries = low, low + step, ..., low + (n-1)·step, high
//! ```
//!
//! Boundaries are not rounded here; rounding to a price precision happens
//! where the values leave the engine.

use crate::value_objects::{Interval, TradeZone};
use rust_decimal::Decimal;

/// Divide an interval into `subdivisions` equal steps
///
/// Returns `subdivisions + 1` points: the `subdivisions` step starts followed
/// by `high`. With zero subdivisions the result is the single point `[high]`.
///
/// # Examples
///
/// ```
/// # use zonewise_domain::zones::divide;
/// # use zonewise_domain::value_objects::Interval;
/// # use rust_decimal_macros::dec;
/// let interval = Interval::new(dec!(100), dec!(200)).unwrap();
/// assert_eq!(
///     divide(interval, 4),
///     vec![dec!(100), dec!(125), dec!(150), dec!(175), dec!(200)]
/// );
///
/// // Zero subdivisions collapse to the upper bound
/// assert_eq!(divide(interval, 0), vec![dec!(200)]);
/// ```
pub fn divide(interval: Interval, subdivisions: u32) -> Vec<Decimal> {
    let step = if subdivisions == 0 {
        Decimal::ZERO
    } else {
        interval.width() / Decimal::from(subdivisions)
    };

    let mut boundaries: Vec<Decimal> = (0..subdivisions)
        .map(|i| interval.low() + step * Decimal::from(i))
        .collect();
    boundaries.push(interval.high());
    boundaries
}

/// Locate the zone bracketing `current_price`
///
/// Finds the first boundary strictly above the price and pairs it with the
/// boundary before it.
///
/// # Returns
///
/// * `Some(TradeZone)` - `lower <= current_price < upper`
/// * `None` - price is at or below `low`, at or above `high`, or there are
///   no interior boundaries
///
/// # Examples
///
/// ```
/// # use zonewise_domain::zones::locate;
/// # use zonewise_domain::value_objects::Interval;
/// # use rust_decimal_macros::dec;
/// let interval = Interval::new(dec!(100), dec!(200)).unwrap();
///
/// let zone = locate(dec!(130), interval, 4).unwrap();
/// assert_eq!((zone.lower(), zone.upper()), (dec!(125), dec!(150)));
///
/// assert!(locate(dec!(100), interval, 4).is_none());
/// assert!(locate(dec!(200), interval, 4).is_none());
/// ```
pub fn locate(current_price: Decimal, interval: Interval, subdivisions: u32) -> Option<TradeZone> {
    if current_price <= interval.low() {
        return None;
    }

    let boundaries = divide(interval, subdivisions);
    match boundaries.iter().position(|b| *b > current_price) {
        Some(first) if first > 0 => Some(TradeZone::new(boundaries[first - 1], boundaries[first])),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn interval(low: Decimal, high: Decimal) -> Interval {
        Interval::new(low, high).unwrap()
    }

    // divide tests
    #[test]
    fn test_divide_returns_n_plus_one_points() {
        let points = divide(interval(dec!(100), dec!(110)), 5);

        assert_eq!(points.len(), 6);
        assert_eq!(points, vec![dec!(100), dec!(102), dec!(104), dec!(106), dec!(108), dec!(110)]);
    }

    #[test]
    fn test_divide_steps_are_equal() {
        let range = interval(dec!(62269.3), dec!(64007.0));
        let points = divide(range, 55);

        assert_eq!(points.len(), 56);
        assert_eq!(points[0], dec!(62269.3));
        assert_eq!(points[55], dec!(64007.0));

        let step = range.width() / dec!(55);
        let tolerance = dec!(0.000000001);
        for pair in points.windows(2) {
            assert!(((pair[1] - pair[0]) - step).abs() < tolerance);
        }
    }

    #[test]
    fn test_divide_zero_subdivisions_is_upper_bound_only() {
        assert_eq!(divide(interval(dec!(100), dec!(110)), 0), vec![dec!(110)]);
    }

    #[test]
    fn test_divide_point_interval_repeats_low() {
        let points = divide(interval(dec!(50), dec!(50)), 3);
        assert_eq!(points, vec![dec!(50), dec!(50), dec!(50), dec!(50)]);
    }

    // locate tests
    #[test]
    fn test_locate_brackets_interior_price() {
        let zone = locate(dec!(130), interval(dec!(100), dec!(200)), 4).unwrap();
        assert_eq!(zone.lower(), dec!(125));
        assert_eq!(zone.upper(), dec!(150));
    }

    #[test]
    fn test_locate_on_boundary_uses_zone_above() {
        let zone = locate(dec!(125), interval(dec!(100), dec!(200)), 4).unwrap();
        assert_eq!(zone.lower(), dec!(125));
        assert_eq!(zone.upper(), dec!(150));
    }

    #[test]
    fn test_locate_endpoints_and_outside_not_found() {
        let range = interval(dec!(100), dec!(200));

        assert!(locate(dec!(100), range, 4).is_none());
        assert!(locate(dec!(200), range, 4).is_none());
        assert!(locate(dec!(95), range, 4).is_none());
        assert!(locate(dec!(250), range, 4).is_none());
    }

    #[test]
    fn test_locate_just_inside_endpoints() {
        let range = interval(dec!(100), dec!(200));

        let bottom = locate(dec!(100.00001), range, 4).unwrap();
        assert_eq!(bottom.as_interval(), interval(dec!(100), dec!(125)));

        let top = locate(dec!(199.99999), range, 4).unwrap();
        assert_eq!(top.as_interval(), interval(dec!(175), dec!(200)));
    }

    #[test]
    fn test_locate_zero_subdivisions_not_found() {
        assert!(locate(dec!(150), interval(dec!(100), dec!(200)), 0).is_none());
    }

    #[test]
    fn test_locate_single_subdivision_is_whole_interval() {
        let zone = locate(dec!(150), interval(dec!(100), dec!(200)), 1).unwrap();
        assert_eq!(zone.as_interval(), interval(dec!(100), dec!(200)));
    }
}
