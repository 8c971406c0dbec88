//! Value Objects for the Zonewise Domain
//!
//! Immutable, validated domain primitives.
//! All value objects enforce invariants at construction time.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Price must be positive
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Configuration value rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Interval bounds are out of order
    #[error("Degenerate interval: {0}")]
    DegenerateInterval(String),

    /// Trade direction could not be parsed
    #[error("Invalid direction: {0}")]
    InvalidDirection(String),
}

// =============================================================================
// Precision
// =============================================================================

/// Number of fractional decimal digits used to round and display a value
///
/// Replaces printf-style specifiers such as `"%.5f"`: the digit count is
/// stored directly, so the minimum price increment never has to be parsed
/// back out of a pattern string.
///
/// # Invariants
/// - Digits must be <= 28 (the maximum `Decimal` scale)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Precision(pub(crate) u32);

impl Precision {
    /// Largest supported digit count
    pub const MAX_DIGITS: u32 = 28;

    /// Create a new Precision with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfiguration` if digits > 28
    pub fn new(digits: u32) -> Result<Self, DomainError> {
        if digits > Self::MAX_DIGITS {
            return Err(DomainError::InvalidConfiguration(format!(
                "Precision cannot exceed {} digits, got {}",
                Self::MAX_DIGITS,
                digits
            )));
        }
        Ok(Self(digits))
    }

    /// Get the digit count
    pub fn digits(&self) -> u32 {
        self.0
    }

    /// Smallest representable step: 10^-digits
    ///
    /// # Examples
    /// ```
    /// # use zonewise_domain::value_objects::Precision;
    /// # use rust_decimal_macros::dec;
    /// let precision = Precision::new(5).unwrap();
    /// assert_eq!(precision.min_increment(), dec!(0.00001));
    /// ```
    pub fn min_increment(&self) -> Decimal {
        Decimal::new(1, self.0)
    }

    /// Round a value to this precision (midpoint away from zero)
    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Render a value with exactly `digits` fractional digits
    pub fn format(&self, value: Decimal) -> String {
        format!("{:.*}", self.0 as usize, self.round(value))
    }
}

impl TryFrom<u32> for Precision {
    type Error = DomainError;

    fn try_from(digits: u32) -> Result<Self, Self::Error> {
        Self::new(digits)
    }
}

impl From<Precision> for u32 {
    fn from(precision: Precision) -> Self {
        precision.0
    }
}

impl FromStr for Precision {
    type Err = DomainError;

    /// Accepts a bare digit count (`"5"`) or a legacy specifier (`"%.5f"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("%.")
            .and_then(|rest| rest.strip_suffix('f'))
            .unwrap_or(trimmed);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidConfiguration(format!(
                "Invalid precision specifier: {:?}",
                s
            )));
        }

        let digits = digits.parse::<u32>().map_err(|_| {
            DomainError::InvalidConfiguration(format!("Invalid precision specifier: {:?}", s))
        })?;

        Self::new(digits)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}dp", self.0)
    }
}

// =============================================================================
// Interval
// =============================================================================

/// Interval represents an ordered price range `[low, high]`
///
/// # Invariants
/// - low <= high
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(Decimal, Decimal)", into = "(Decimal, Decimal)")]
pub struct Interval {
    low: Decimal,
    high: Decimal,
}

impl Interval {
    /// Create a new Interval with validation
    ///
    /// # Errors
    /// Returns `DomainError::DegenerateInterval` if low > high
    pub fn new(low: Decimal, high: Decimal) -> Result<Self, DomainError> {
        if low > high {
            return Err(DomainError::DegenerateInterval(format!(
                "low {} is above high {}",
                low, high
            )));
        }
        Ok(Self { low, high })
    }

    /// Lower bound
    pub fn low(&self) -> Decimal {
        self.low
    }

    /// Upper bound
    pub fn high(&self) -> Decimal {
        self.high
    }

    /// Distance between the bounds
    pub fn width(&self) -> Decimal {
        self.high - self.low
    }

    /// Apply `f` to both bounds, keeping the result ordered
    pub fn map_bounds(&self, f: impl Fn(Decimal) -> Decimal) -> Self {
        let (a, b) = (f(self.low), f(self.high));
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }
}

impl TryFrom<(Decimal, Decimal)> for Interval {
    type Error = DomainError;

    fn try_from((low, high): (Decimal, Decimal)) -> Result<Self, Self::Error> {
        Self::new(low, high)
    }
}

impl From<Interval> for (Decimal, Decimal) {
    fn from(interval: Interval) -> Self {
        (interval.low, interval.high)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

// =============================================================================
// TradeZone
// =============================================================================

/// Two adjacent zone boundaries bracketing a price
///
/// Only produced by [`crate::zones::locate`], so `lower <= price < upper`
/// holds for the price it was located for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeZone {
    lower: Decimal,
    upper: Decimal,
}

impl TradeZone {
    pub(crate) fn new(lower: Decimal, upper: Decimal) -> Self {
        Self { lower, upper }
    }

    /// Lower boundary
    pub fn lower(&self) -> Decimal {
        self.lower
    }

    /// Upper boundary
    pub fn upper(&self) -> Decimal {
        self.upper
    }

    /// The zone as an interval
    pub fn as_interval(&self) -> Interval {
        Interval {
            low: self.lower,
            high: self.upper,
        }
    }
}

impl fmt::Display for TradeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone({}, {})", self.lower, self.upper)
    }
}

// =============================================================================
// Side
// =============================================================================

/// Side represents the trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Long trade (buy low, sell high)
    Long,
    /// Short trade (sell high, buy low)
    Short,
}

impl Side {
    /// Only shorts extend their zones into the adjacent ranges
    pub fn is_short(&self) -> bool {
        matches!(self, Side::Short)
    }
}

impl FromStr for Side {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(Side::Long),
            "short" => Ok(Side::Short),
            other => Err(DomainError::InvalidDirection(format!(
                "Expected long or short, got {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "LONG"),
            Side::Short => write!(f, "SHORT"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
