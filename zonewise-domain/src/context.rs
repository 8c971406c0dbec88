//! Signal Context for Zone Generation
//!
//! Holds the trade parameters of one trading decision:
//! - focus: reference price the margin ladder is anchored to
//! - budget / percent_change: drive the risk and thus the zone count
//! - price / size precision: rounding of prices and quantities
//!
//! Strategy code attaches optional trade-lifecycle values through
//! [`StrategyAnnotations`]; the zone logic only reads a few of them.

use crate::value_objects::{DomainError, Precision};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default percent risk per trade (2%).
pub const DEFAULT_PERCENT_CHANGE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// Default price precision (5 fractional digits).
pub const DEFAULT_PRICE_PRECISION: Precision = Precision(5);

/// Default size precision (whole units).
pub const DEFAULT_SIZE_PRECISION: Precision = Precision(0);

/// Default zone risk.
pub const DEFAULT_ZONE_RISK: Decimal = Decimal::ONE;

/// Default fee rate (0.08%).
pub const DEFAULT_FEE: Decimal = Decimal::from_parts(8, 0, 0, false, 4);

/// Default risk-to-reward ratio.
pub const DEFAULT_RISK_REWARD: u32 = 4;

/// Largest zone count a context accepts: `trunc(budget × percent_change)`
/// must not exceed it.
pub const MAX_SUBDIVISIONS: u32 = 1_000_000;

/// Optional trade-lifecycle values owned by strategy code.
///
/// Every field starts absent. Absence means "not computed yet" or "not
/// applicable", never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyAnnotations {
    /// Support level; bounds the downward margin-zone walk for longs.
    pub support: Option<Decimal>,
    /// Resistance level; bounds the upward margin-zone walk.
    pub resistance: Option<Decimal>,
    /// Take-profit price.
    pub take_profit: Option<Decimal>,
    /// Fixed risk amount per trade, overriding the zone-risk split.
    pub risk_per_trade: Option<Decimal>,
    /// Whether to increase size on subsequent entries.
    pub increase_size: Option<bool>,
    /// Whether to add to an existing position.
    pub increase_position: Option<bool>,
    /// Minimum acceptable PNL.
    pub minimum_pnl: Option<Decimal>,
    /// Minimum order size.
    pub minimum_size: Option<Decimal>,
    /// Number of parts an entry is split into.
    pub split: Option<u32>,
    /// Maximum position size.
    pub max_size: Option<Decimal>,
    /// Size per trade.
    pub trade_size: Option<Decimal>,
    /// Whether the strategy runs with its default settings.
    pub is_default: Option<bool>,
}

/// Trade parameters and derived quantities for zone generation.
///
/// # Invariants
/// - focus > 0
/// - budget >= 0
/// - percent_change > 0
/// - trunc(budget × percent_change) <= [`MAX_SUBDIVISIONS`]
///
/// `risk()` is derived on every call, so `set_budget` and
/// `set_percent_change` are reflected immediately.
///
/// # Example
///
/// ```
/// # use zonewise_domain::context::SignalContext;
/// # use rust_decimal_macros::dec;
/// let context = SignalContext::new(dec!(100), dec!(10000)).unwrap();
/// assert_eq!(context.risk(), dec!(200));
/// assert_eq!(context.min_trades(), 200);
/// assert_eq!(context.min_price(), dec!(0.00001));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SignalContextFields")]
pub struct SignalContext {
    focus: Decimal,
    budget: Decimal,
    percent_change: Decimal,
    price_precision: Precision,
    size_precision: Precision,
    zone_risk: Decimal,
    fee: Decimal,
    risk_reward: u32,
    additional_increase: Decimal,
    /// Optional values populated by strategy code
    pub annotations: StrategyAnnotations,
}

impl SignalContext {
    /// Create a context with the default trade parameters
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPrice` if focus <= 0,
    /// `DomainError::InvalidConfiguration` if budget < 0 or the risk exceeds
    /// [`MAX_SUBDIVISIONS`]
    pub fn new(focus: Decimal, budget: Decimal) -> Result<Self, DomainError> {
        if focus <= Decimal::ZERO {
            return Err(DomainError::InvalidPrice(format!("Focus price must be positive, got {}", focus)));
        }
        validate_budget(budget)?;
        validate_risk(budget, DEFAULT_PERCENT_CHANGE)?;

        Ok(Self {
            focus,
            budget,
            percent_change: DEFAULT_PERCENT_CHANGE,
            price_precision: DEFAULT_PRICE_PRECISION,
            size_precision: DEFAULT_SIZE_PRECISION,
            zone_risk: DEFAULT_ZONE_RISK,
            fee: DEFAULT_FEE,
            risk_reward: DEFAULT_RISK_REWARD,
            additional_increase: Decimal::ZERO,
            annotations: StrategyAnnotations::default(),
        })
    }

    /// Replace the percent risk per trade
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfiguration` if percent_change <= 0 or
    /// the risk exceeds [`MAX_SUBDIVISIONS`]
    pub fn with_percent_change(mut self, percent_change: Decimal) -> Result<Self, DomainError> {
        self.set_percent_change(percent_change)?;
        Ok(self)
    }

    /// Replace the price precision
    pub fn with_price_precision(mut self, precision: Precision) -> Self {
        self.price_precision = precision;
        self
    }

    /// Replace the size precision
    pub fn with_size_precision(mut self, precision: Precision) -> Self {
        self.size_precision = precision;
        self
    }

    /// Replace the zone risk
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfiguration` if zone_risk < 0
    pub fn with_zone_risk(mut self, zone_risk: Decimal) -> Result<Self, DomainError> {
        if zone_risk < Decimal::ZERO {
            return Err(DomainError::InvalidConfiguration(
                "Zone risk cannot be negative".to_string(),
            ));
        }
        self.zone_risk = zone_risk;
        Ok(self)
    }

    /// Replace the fee rate
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfiguration` if fee is outside [0, 1)
    pub fn with_fee(mut self, fee: Decimal) -> Result<Self, DomainError> {
        if fee < Decimal::ZERO || fee >= Decimal::ONE {
            return Err(DomainError::InvalidConfiguration(format!(
                "Fee rate must be in [0, 1), got {}",
                fee
            )));
        }
        self.fee = fee;
        Ok(self)
    }

    /// Replace the risk-to-reward ratio
    pub fn with_risk_reward(mut self, risk_reward: u32) -> Self {
        self.risk_reward = risk_reward;
        self
    }

    /// Replace the additional size increase
    pub fn with_additional_increase(mut self, additional_increase: Decimal) -> Self {
        self.additional_increase = additional_increase;
        self
    }

    /// Update the budget
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfiguration` if budget < 0 or the risk
    /// exceeds [`MAX_SUBDIVISIONS`]
    pub fn set_budget(&mut self, budget: Decimal) -> Result<(), DomainError> {
        validate_budget(budget)?;
        validate_risk(budget, self.percent_change)?;
        self.budget = budget;
        Ok(())
    }

    /// Update the percent risk per trade
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfiguration` if percent_change <= 0 or
    /// the risk exceeds [`MAX_SUBDIVISIONS`]
    pub fn set_percent_change(&mut self, percent_change: Decimal) -> Result<(), DomainError> {
        if percent_change <= Decimal::ZERO {
            return Err(DomainError::InvalidConfiguration(
                "Percent change must be positive".to_string(),
            ));
        }
        validate_risk(self.budget, percent_change)?;
        self.percent_change = percent_change;
        Ok(())
    }

    /// Reference price the margin ladder is anchored to
    pub fn focus(&self) -> Decimal {
        self.focus
    }

    /// Budget in quote currency
    pub fn budget(&self) -> Decimal {
        self.budget
    }

    /// Percent risk per trade (0.02 = 2%)
    pub fn percent_change(&self) -> Decimal {
        self.percent_change
    }

    /// Precision of prices
    pub fn price_precision(&self) -> Precision {
        self.price_precision
    }

    /// Precision of sizes
    pub fn size_precision(&self) -> Precision {
        self.size_precision
    }

    /// Zone risk
    pub fn zone_risk(&self) -> Decimal {
        self.zone_risk
    }

    /// Fee rate (0.0008 = 0.08%)
    pub fn fee(&self) -> Decimal {
        self.fee
    }

    /// Risk-to-reward ratio
    pub fn risk_reward(&self) -> u32 {
        self.risk_reward
    }

    /// Additional size increase
    pub fn additional_increase(&self) -> Decimal {
        self.additional_increase
    }

    /// Budget × percent change
    pub fn risk(&self) -> Decimal {
        self.budget * self.percent_change
    }

    /// Number of equal trades the risk supports (truncated, not rounded)
    pub fn min_trades(&self) -> u32 {
        // bounded by MAX_SUBDIVISIONS at construction
        self.risk().trunc().to_u32().unwrap_or(MAX_SUBDIVISIONS)
    }

    /// Smallest price step at the configured price precision
    pub fn min_price(&self) -> Decimal {
        self.price_precision.min_increment()
    }

    /// Round a price to the price precision
    pub fn round_price(&self, price: Decimal) -> Decimal {
        self.price_precision.round(price)
    }

    /// Round a size to the size precision
    pub fn round_size(&self, size: Decimal) -> Decimal {
        self.size_precision.round(size)
    }

    /// Risk allotted to each of `orders` trades
    ///
    /// Uses the `risk_per_trade` annotation when present, otherwise splits
    /// the zone risk evenly. Returns `None` for zero orders.
    pub fn risk_per_trade(&self, orders: u32) -> Option<Decimal> {
        if let Some(fixed) = self.annotations.risk_per_trade {
            return Some(fixed);
        }
        self.zone_risk.checked_div(Decimal::from(orders))
    }
}

fn validate_budget(budget: Decimal) -> Result<(), DomainError> {
    if budget < Decimal::ZERO {
        return Err(DomainError::InvalidConfiguration("Budget cannot be negative".to_string()));
    }
    Ok(())
}

fn validate_risk(budget: Decimal, percent_change: Decimal) -> Result<(), DomainError> {
    let within = budget
        .checked_mul(percent_change)
        .is_some_and(|risk| risk.trunc() <= Decimal::from(MAX_SUBDIVISIONS));

    if !within {
        return Err(DomainError::InvalidConfiguration(format!(
            "Risk of {} × {} exceeds {} subdivisions",
            budget, percent_change, MAX_SUBDIVISIONS
        )));
    }
    Ok(())
}

/// Wire shape of [`SignalContext`], validated on the way in.
#[derive(Deserialize)]
struct SignalContextFields {
    focus: Decimal,
    budget: Decimal,
    percent_change: Decimal,
    price_precision: Precision,
    size_precision: Precision,
    zone_risk: Decimal,
    fee: Decimal,
    risk_reward: u32,
    additional_increase: Decimal,
    annotations: StrategyAnnotations,
}

impl TryFrom<SignalContextFields> for SignalContext {
    type Error = DomainError;

    fn try_from(fields: SignalContextFields) -> Result<Self, Self::Error> {
        let mut context = Self::new(fields.focus, Decimal::ZERO)?
            .with_percent_change(fields.percent_change)?
            .with_price_precision(fields.price_precision)
            .with_size_precision(fields.size_precision)
            .with_zone_risk(fields.zone_risk)?
            .with_fee(fields.fee)?
            .with_risk_reward(fields.risk_reward)
            .with_additional_increase(fields.additional_increase);
        context.set_budget(fields.budget)?;
        context.annotations = fields.annotations;
        Ok(context)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn context() -> SignalContext {
        SignalContext::new(dec!(100), dec!(10000)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let ctx = context();

        assert_eq!(ctx.focus(), dec!(100));
        assert_eq!(ctx.budget(), dec!(10000));
        assert_eq!(ctx.percent_change(), dec!(0.02));
        assert_eq!(ctx.price_precision().digits(), 5);
        assert_eq!(ctx.size_precision().digits(), 0);
        assert_eq!(ctx.zone_risk(), dec!(1));
        assert_eq!(ctx.fee(), dec!(0.0008));
        assert_eq!(ctx.risk_reward(), 4);
        assert_eq!(ctx.additional_increase(), dec!(0));
        assert_eq!(ctx.annotations, StrategyAnnotations::default());
    }

    #[test]
    fn test_rejects_invalid_construction() {
        assert!(matches!(
            SignalContext::new(dec!(0), dec!(100)),
            Err(DomainError::InvalidPrice(_))
        ));
        assert!(SignalContext::new(dec!(-5), dec!(100)).is_err());
        assert!(SignalContext::new(dec!(100), dec!(-1)).is_err());
        assert!(SignalContext::new(dec!(100), dec!(0)).is_ok());
    }

    #[test]
    fn test_risk_and_min_trades() {
        let ctx = context();
        assert_eq!(ctx.risk(), dec!(200));
        assert_eq!(ctx.min_trades(), 200);
    }

    #[test]
    fn test_min_trades_truncates() {
        let ctx = SignalContext::new(dec!(100), dec!(2000))
            .unwrap()
            .with_percent_change(dec!(0.0279))
            .unwrap();

        assert_eq!(ctx.risk(), dec!(55.8));
        assert_eq!(ctx.min_trades(), 55);
    }

    #[test]
    fn test_risk_tracks_mutation() {
        let mut ctx = context();
        ctx.set_budget(dec!(500)).unwrap();
        assert_eq!(ctx.risk(), dec!(10));

        ctx.set_percent_change(dec!(0.1)).unwrap();
        assert_eq!(ctx.risk(), dec!(50));
        assert_eq!(ctx.min_trades(), 50);
    }

    #[test]
    fn test_setters_reject_invalid_values() {
        let mut ctx = context();
        assert!(ctx.set_budget(dec!(-1)).is_err());
        assert!(ctx.set_percent_change(dec!(0)).is_err());
        assert!(ctx.set_percent_change(dec!(-0.02)).is_err());

        // rejected updates leave the context untouched
        assert_eq!(ctx.risk(), dec!(200));
    }

    #[test]
    fn test_builders_validate() {
        assert!(context().with_zone_risk(dec!(-1)).is_err());
        assert!(context().with_fee(dec!(1)).is_err());
        assert!(context().with_fee(dec!(-0.1)).is_err());
        assert_eq!(context().with_fee(dec!(0.0006)).unwrap().fee(), dec!(0.0006));
    }

    #[test]
    fn test_min_price_follows_precision() {
        assert_eq!(context().min_price(), dec!(0.00001));

        let one_digit = context().with_price_precision(Precision::new(1).unwrap());
        assert_eq!(one_digit.min_price(), dec!(0.1));
    }

    #[test]
    fn test_rounding() {
        let ctx = context()
            .with_price_precision(Precision::new(1).unwrap())
            .with_size_precision(Precision::new(3).unwrap());

        assert_eq!(ctx.round_price(dec!(63627.87)), dec!(63627.9));
        assert_eq!(ctx.round_size(dec!(0.066666)), dec!(0.067));
    }

    #[test]
    fn test_risk_per_trade_splits_zone_risk() {
        let ctx = context().with_zone_risk(dec!(10)).unwrap();
        assert_eq!(ctx.risk_per_trade(4), Some(dec!(2.5)));
        assert_eq!(ctx.risk_per_trade(0), None);
    }

    #[test]
    fn test_risk_per_trade_prefers_annotation() {
        let mut ctx = context();
        ctx.annotations.risk_per_trade = Some(dec!(7));
        assert_eq!(ctx.risk_per_trade(4), Some(dec!(7)));
        assert_eq!(ctx.risk_per_trade(0), Some(dec!(7)));
    }

    #[test]
    fn test_risk_bounded_by_max_subdivisions() {
        let at_limit = SignalContext::new(dec!(100), dec!(50000000)).unwrap();
        assert_eq!(at_limit.min_trades(), MAX_SUBDIVISIONS);
        assert_eq!(Decimal::from(at_limit.min_trades()), at_limit.risk().trunc());

        assert!(matches!(
            SignalContext::new(dec!(100), dec!(1000000000000)),
            Err(DomainError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_mutation_cannot_exceed_max_subdivisions() {
        let mut ctx = context();

        assert!(ctx.set_budget(dec!(1000000000000)).is_err());
        assert!(ctx.set_percent_change(dec!(1000)).is_err());
        assert!(context().with_percent_change(dec!(1000)).is_err());
        assert_eq!(ctx.min_trades(), 200);

        // budget × percent_change overflowing Decimal is rejected too
        let mut huge = SignalContext::new(dec!(100), dec!(0)).unwrap();
        huge.set_percent_change(Decimal::MAX).unwrap();
        assert!(huge.set_budget(dec!(2)).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let mut json = serde_json::to_value(context()).unwrap();
        let restored: SignalContext = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(restored, context());

        json["budget"] = serde_json::json!("1000000000000");
        assert!(serde_json::from_value::<SignalContext>(json.clone()).is_err());

        json["budget"] = serde_json::json!("10000");
        json["focus"] = serde_json::json!("0");
        assert!(serde_json::from_value::<SignalContext>(json).is_err());
    }

    #[test]
    fn test_serializes_precision_as_digits() {
        let json = serde_json::to_value(context()).unwrap();

        assert_eq!(json["price_precision"], 5);
        assert_eq!(json["size_precision"], 0);
        assert!(json["annotations"]["support"].is_null());
    }
}
