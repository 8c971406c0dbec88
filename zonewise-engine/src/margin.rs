//! Margin range port and the focus-ladder adapter.
//!
//! A margin range is the interval around a price inside which future zones
//! are searched. The planner asks a [`MarginSource`] for it, so strategies can
//! swap the default [`FocusLadder`] for their own banding.

use rust_decimal::Decimal;
use tracing::{trace, warn};
use zonewise_domain::{Interval, SignalContext};

/// Upper bound on ladder steps before a lookup is abandoned.
pub const MAX_LADDER_STEPS: usize = 10_000;

/// Port for computing the margin range around a price.
///
/// Closures with the same signature implement it, which keeps test stubs
/// short.
pub trait MarginSource {
    /// Margin interval for `price`, or `None` when no band applies.
    fn margin_range(&self, context: &SignalContext, price: Decimal) -> Option<Interval>;
}

impl<F> MarginSource for F
where
    F: Fn(&SignalContext, Decimal) -> Option<Interval>,
{
    fn margin_range(&self, context: &SignalContext, price: Decimal) -> Option<Interval> {
        self(context, price)
    }
}

/// Geometric price ladder anchored at the context's focus price.
///
/// Levels sit at `focus × (1 + percent_change)^k` for every integer `k`.
/// The margin range for a price is the band from the highest level at or
/// below `price - min_price` up to the next level:
///
/// ```text
/// level  = max { focus × g^k  |  focus × g^k <= price - min_price }
/// margin = [round(level), round(level × g)]        g = 1 + percent_change
/// ```
///
/// Walking down from the focus stops at levels below 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusLadder;

impl FocusLadder {
    /// Highest ladder level at or below `price`.
    fn floor_level(context: &SignalContext, price: Decimal) -> Option<Decimal> {
        let growth = Decimal::ONE + context.percent_change();
        let focus = context.focus();

        if focus * growth > price {
            // Walk down from the focus.
            let mut upper = focus * growth;
            let mut level = focus;
            let mut floor = None;
            let mut steps = 0;

            while upper > price {
                if level < Decimal::ONE {
                    break;
                }
                steps += 1;
                if steps > MAX_LADDER_STEPS {
                    warn!(%price, focus = %focus, "Margin ladder walk exceeded step limit");
                    return None;
                }
                floor = Some(level);
                upper = level;
                level = upper / growth;
            }

            // Stopped on the sub-1 guard before reaching the price.
            floor.filter(|f| *f <= price)
        } else {
            // Walk up from the first level above the focus.
            let mut level = focus * growth;
            let mut floor = None;
            let mut steps = 0;

            while level <= price {
                steps += 1;
                if steps > MAX_LADDER_STEPS {
                    warn!(%price, focus = %focus, "Margin ladder walk exceeded step limit");
                    return None;
                }
                floor = Some(level);
                level *= growth;
            }

            floor
        }
    }
}

impl MarginSource for FocusLadder {
    fn margin_range(&self, context: &SignalContext, price: Decimal) -> Option<Interval> {
        let target = price - context.min_price();
        let Some(level) = Self::floor_level(context, target) else {
            trace!(%price, "No ladder level below price");
            return None;
        };

        let growth = Decimal::ONE + context.percent_change();
        let low = context.round_price(level);
        let high = context.round_price(level * growth);
        Interval::new(low, high).ok()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ladder_context(focus: Decimal, percent_change: Decimal) -> SignalContext {
        SignalContext::new(focus, dec!(1000))
            .unwrap()
            .with_percent_change(percent_change)
            .unwrap()
    }

    fn range(low: Decimal, high: Decimal) -> Interval {
        Interval::new(low, high).unwrap()
    }

    #[test]
    fn test_margin_at_focus_band() {
        let ctx = ladder_context(dec!(100), dec!(0.1));
        assert_eq!(FocusLadder.margin_range(&ctx, dec!(105)), Some(range(dec!(100), dec!(110))));
    }

    #[test]
    fn test_margin_walks_up() {
        let ctx = ladder_context(dec!(100), dec!(0.1));

        // 110, 121 <= 124.99999 < 133.1
        assert_eq!(FocusLadder.margin_range(&ctx, dec!(125)), Some(range(dec!(121), dec!(133.1))));

        // every level is visited, so the band always reaches the price
        assert_eq!(
            FocusLadder.margin_range(&ctx, dec!(150)),
            Some(range(dec!(146.41), dec!(161.051)))
        );
    }

    #[test]
    fn test_margin_walks_down() {
        let ctx = ladder_context(dec!(100), dec!(0.1));

        // 100 / 1.1 = 90.9090..., upper bound rounds back to 100
        assert_eq!(FocusLadder.margin_range(&ctx, dec!(95)), Some(range(dec!(90.90909), dec!(100))));
    }

    #[test]
    fn test_margin_excludes_level_equal_to_price() {
        let ctx = ladder_context(dec!(100), dec!(0.1));

        // price - min_price = 109.99999 sits below the 110 level
        assert_eq!(FocusLadder.margin_range(&ctx, dec!(110)), Some(range(dec!(100), dec!(110))));
        assert_eq!(
            FocusLadder.margin_range(&ctx, dec!(110.00001)),
            Some(range(dec!(110), dec!(121)))
        );
    }

    #[test]
    fn test_margin_contains_price() {
        let ctx = ladder_context(dec!(67629.3), dec!(0.0279));

        for price in [dec!(500), dec!(63629.2), dec!(67800), dec!(70000), dec!(250000)] {
            let margin = FocusLadder.margin_range(&ctx, price).unwrap();
            assert!(margin.low() < price, "{price} above {margin}");
            assert!(price < margin.high() + dec!(0.0001), "{price} below {margin}");
        }
    }

    #[test]
    fn test_margin_none_below_one() {
        let ctx = ladder_context(dec!(2), dec!(0.5));

        // levels: 2, 1.333.., 0.888.. (< 1, walk stops)
        assert_eq!(FocusLadder.margin_range(&ctx, dec!(1.5)), Some(range(dec!(1.33333), dec!(2))));
        assert_eq!(FocusLadder.margin_range(&ctx, dec!(1)), None);
    }

    #[test]
    fn test_closure_source() {
        let ctx = ladder_context(dec!(100), dec!(0.1));
        let fixed = |_: &SignalContext, _: Decimal| Interval::new(dec!(1), dec!(2)).ok();

        assert_eq!(fixed.margin_range(&ctx, dec!(999)), Some(range(dec!(1), dec!(2))));
    }
}
