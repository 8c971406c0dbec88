//! Zonewise Domain Layer
//!
//! Pure domain logic with zero I/O dependencies.
//! Contains value objects, the signal context, and the zone rules.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod context;
pub mod value_objects;
pub mod zones;

// Re-export commonly used types
pub use context::{SignalContext, StrategyAnnotations};
pub use value_objects::{DomainError, Interval, Precision, Side, TradeZone};
pub use zones::{divide, locate};
