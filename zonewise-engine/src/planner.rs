//! Zone planning for one trading decision.
//!
//! The planner borrows a [`SignalContext`] and turns it into zone lists:
//!
//! ```text
//! price → margin range → future range (zone bracketing price)
//!       → divide(future range, min_trades)
//!       → short: + range below (+ range above, only if below resolved)
//!       → merge: sort, drop shared endpoints
//! ```
//!
//! Every "not found" collapses to `None` or an empty list.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use zonewise_domain::{divide, locate, Interval, Side, SignalContext};

use crate::margin::{FocusLadder, MarginSource};

/// Maximum number of margin bands collected by a support/resistance walk.
pub const MAX_MARGIN_WALK: usize = 21;

/// Entry ceiling and zone list derived for one decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradePlan {
    /// Upper bound of the future range around the price
    pub entry_ceiling: Decimal,
    /// Lowest zone boundary
    pub first_zone: Decimal,
    /// Zone boundaries, ascending
    pub zones: Vec<Decimal>,
}

/// Computes future ranges and zones from a signal context.
#[derive(Debug, Clone)]
pub struct ZonePlanner<'a, M = FocusLadder> {
    context: &'a SignalContext,
    margin: M,
}

impl<'a> ZonePlanner<'a, FocusLadder> {
    /// Create a planner using the focus ladder for margin ranges.
    pub fn new(context: &'a SignalContext) -> Self {
        Self {
            context,
            margin: FocusLadder,
        }
    }
}

impl<'a, M: MarginSource> ZonePlanner<'a, M> {
    /// Create a planner with a custom margin source.
    pub fn with_margin_source(context: &'a SignalContext, margin: M) -> Self {
        Self { context, margin }
    }

    /// The context this planner reads.
    pub fn context(&self) -> &SignalContext {
        self.context
    }

    /// Margin range around `price`.
    pub fn margin_range(&self, price: Decimal) -> Option<Interval> {
        self.margin.margin_range(self.context, price)
    }

    /// Zone of the margin range that brackets `price`, rounded to the price
    /// precision.
    pub fn future_range(&self, price: Decimal) -> Option<Interval> {
        let Some(margin) = self.margin_range(price) else {
            debug!(%price, "No margin range");
            return None;
        };

        let Some(zone) = locate(price, margin, self.context.min_trades()) else {
            debug!(%price, %margin, "Price not bracketed by margin range");
            return None;
        };

        let future = zone.as_interval().map_bounds(|bound| self.context.round_price(bound));
        debug!(%price, %future, "Future range resolved");
        Some(future)
    }

    /// Zone boundaries for `price` in the given direction.
    ///
    /// Long: the future range divided into `min_trades` steps.
    /// Short: additionally the range just below it and, only when that one
    /// resolved, the range just above it; segments are merged into one
    /// strictly ascending list.
    ///
    /// Returns an empty list when no future range resolves.
    pub fn zones(&self, price: Decimal, side: Side) -> Vec<Decimal> {
        let risk = self.context.min_trades();
        let Some(future) = self.future_range(price) else {
            return Vec::new();
        };

        let mut segments = vec![divide(future, risk)];

        if side.is_short() {
            let min_price = self.context.min_price();
            if let Some(below) = self.future_range(future.low() - min_price) {
                segments.push(divide(below, risk));

                if let Some(above) = self.future_range(future.high() + min_price) {
                    segments.push(divide(above, risk));
                }
            }
        }

        debug!(%price, %side, segments = segments.len(), "Zones built");
        merge_segments(segments)
    }

    /// Entry band for `price`.
    ///
    /// Needs the future range and the range below it. Shorts with a range
    /// above span from the fourth merged zone to the last; otherwise the band
    /// runs from the lower range's floor to the second zone of the future
    /// range itself.
    pub fn trade_range(&self, price: Decimal, side: Side) -> Option<Interval> {
        let min_price = self.context.min_price();
        let future = self.future_range(price)?;
        let below = self.future_range(future.low() - min_price)?;
        let above = self.future_range(future.high() + min_price);

        let zones = self.zones(price, side);

        if side.is_short() && above.is_some() {
            if let (Some(&low), Some(&high)) = (zones.get(3), zones.last()) {
                return Interval::new(low, high).ok();
            }
        }

        if zones.len() > 2 {
            let primary = divide(future, self.context.min_trades());
            let high = *primary.get(1)?;
            return Interval::new(below.low(), high).ok();
        }

        None
    }

    /// Zone boundaries capped by `upper_bound`, topped up to `minimum`.
    ///
    /// Without both an upper bound and a minimum this is [`Self::zones`].
    /// Longs drop zones above the bound. When fewer than `minimum` zones
    /// remain, the zones just below the lowest one are merged in.
    pub fn trade_zones(
        &self,
        price: Decimal,
        upper_bound: Option<Decimal>,
        minimum: Option<usize>,
        side: Side,
    ) -> Vec<Decimal> {
        let mut zones = self.zones(price, side);

        let (Some(upper_bound), Some(minimum)) = (upper_bound, minimum) else {
            return zones;
        };
        if zones.is_empty() {
            return zones;
        }

        if !side.is_short() {
            zones.retain(|zone| *zone <= upper_bound);
        }

        if !zones.is_empty() && zones.len() < minimum {
            let lower = self.zones(zones[0] - self.context.min_price(), side);
            if !lower.is_empty() {
                debug!(have = zones.len(), minimum, "Topping up zones from range below");
                zones = merge_segments(vec![zones, lower]);
            }
        }

        zones
    }

    /// Margin bands between `price` and the support or resistance annotation.
    ///
    /// Longs with a support walk down; otherwise a resistance walks up.
    /// Without either, the single band at `price`.
    pub fn margin_zones(&self, price: Decimal, side: Side) -> Vec<Interval> {
        let min_price = self.context.min_price();
        let annotations = &self.context.annotations;

        if let (Side::Long, Some(support)) = (side, annotations.support) {
            return self.walk_margins(price, |start| start > support, |band| band.low() - min_price);
        }

        if let Some(resistance) = annotations.resistance {
            return self.walk_margins(
                price,
                |start| start < resistance,
                |band| band.high() + min_price,
            );
        }

        self.margin_range(price).into_iter().collect()
    }

    /// Entry ceiling and zones for `price`, or `None` when nothing resolves.
    pub fn trade_plan(&self, price: Decimal, side: Side) -> Option<TradePlan> {
        let band = self.trade_range(price, side)?;
        let future = self.future_range(price)?;

        let start = if side.is_short() && price < band.low() {
            band.low()
        } else {
            price
        };

        let minimum = self.context.min_trades() as usize;
        let zones = self.trade_zones(start, Some(band.high()), Some(minimum), side);
        let first_zone = *zones.first()?;

        let precision = self.context.price_precision();
        debug!(
            %side,
            entry_ceiling = %precision.format(future.high()),
            first_zone = %precision.format(first_zone),
            zones = zones.len(),
            "Trade plan built"
        );

        Some(TradePlan {
            entry_ceiling: future.high(),
            first_zone,
            zones,
        })
    }

    fn walk_margins(
        &self,
        price: Decimal,
        keep_walking: impl Fn(Decimal) -> bool,
        next_start: impl Fn(&Interval) -> Decimal,
    ) -> Vec<Interval> {
        let mut bands = Vec::new();
        let mut start = price;

        while keep_walking(start) && bands.len() < MAX_MARGIN_WALK {
            let Some(band) = self.margin_range(start) else {
                debug!(%start, "Margin walk stopped: no range");
                break;
            };
            start = next_start(&band);
            bands.push(band);
        }

        bands
    }
}

/// Concatenate zone segments; with more than one, sort and drop duplicates.
fn merge_segments(mut segments: Vec<Vec<Decimal>>) -> Vec<Decimal> {
    if segments.len() == 1 {
        return segments.pop().unwrap_or_default();
    }

    let mut merged: Vec<Decimal> = segments.into_iter().flatten().collect();
    merged.sort();
    merged.dedup();
    merged
}

// =============================================================================
// Tests
// =============================================================================
