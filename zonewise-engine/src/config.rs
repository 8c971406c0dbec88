//! Signal construction defaults.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{EngineError, EngineResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use zonewise_domain::context::{
    DEFAULT_FEE, DEFAULT_PERCENT_CHANGE, DEFAULT_PRICE_PRECISION, DEFAULT_RISK_REWARD,
    DEFAULT_SIZE_PRECISION, DEFAULT_ZONE_RISK,
};
use zonewise_domain::{Precision, SignalContext};

// =============================================================================
// Configuration
// =============================================================================

/// Trade parameters applied to every new [`SignalContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalDefaults {
    /// Percent risk per trade (0.02 = 2%)
    pub percent_change: Decimal,
    /// Price precision
    pub price_precision: Precision,
    /// Size precision
    pub size_precision: Precision,
    /// Zone risk
    pub zone_risk: Decimal,
    /// Fee rate (0.0008 = 0.08%)
    pub fee: Decimal,
    /// Risk-to-reward ratio
    pub risk_reward: u32,
}

impl SignalDefaults {
    /// Load defaults from environment variables.
    ///
    /// - `ZONEWISE_PERCENT_CHANGE` (default: 0.02)
    /// - `ZONEWISE_PRICE_PLACES` (default: 5; `"%.5f"` also accepted)
    /// - `ZONEWISE_DECIMAL_PLACES` (default: 0)
    /// - `ZONEWISE_ZONE_RISK` (default: 1)
    /// - `ZONEWISE_FEE` (default: 0.0008)
    /// - `ZONEWISE_RISK_REWARD` (default: 4)
    pub fn from_env() -> EngineResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load defaults from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EngineResult<Self> {
        let base = Self::default();

        Ok(Self {
            percent_change: parse_or(&lookup, "ZONEWISE_PERCENT_CHANGE", base.percent_change)?,
            price_precision: parse_or(&lookup, "ZONEWISE_PRICE_PLACES", base.price_precision)?,
            size_precision: parse_or(&lookup, "ZONEWISE_DECIMAL_PLACES", base.size_precision)?,
            zone_risk: parse_or(&lookup, "ZONEWISE_ZONE_RISK", base.zone_risk)?,
            fee: parse_or(&lookup, "ZONEWISE_FEE", base.fee)?,
            risk_reward: parse_or(&lookup, "ZONEWISE_RISK_REWARD", base.risk_reward)?,
        })
    }

    /// Build a validated context for `focus` and `budget`.
    pub fn context(&self, focus: Decimal, budget: Decimal) -> EngineResult<SignalContext> {
        let context = SignalContext::new(focus, budget)?
            .with_percent_change(self.percent_change)?
            .with_price_precision(self.price_precision)
            .with_size_precision(self.size_precision)
            .with_zone_risk(self.zone_risk)?
            .with_fee(self.fee)?
            .with_risk_reward(self.risk_reward);
        Ok(context)
    }
}

impl Default for SignalDefaults {
    fn default() -> Self {
        Self {
            percent_change: DEFAULT_PERCENT_CHANGE,
            price_precision: DEFAULT_PRICE_PRECISION,
            size_precision: DEFAULT_SIZE_PRECISION,
            zone_risk: DEFAULT_ZONE_RISK,
            fee: DEFAULT_FEE,
            risk_reward: DEFAULT_RISK_REWARD,
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> EngineResult<T> {
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse::<T>()
            .map_err(|_| EngineError::Config(format!("Invalid {} value: {}", key, val))),
        None => Ok(default),
    }
}

// =============================================================================
// Tests
// =============================================================================
