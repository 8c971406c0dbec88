//! Zonewise Engine Layer
//!
//! Pure decision logic, deterministic, no I/O beyond loading defaults.
//! Takes a signal context and a price → returns zone boundaries.
//!
//! # Architecture
//!
//! ```text
//! SignalContext → ZonePlanner → MarginSource → divide / locate → zones
//! ```
//!
//! # Example
//!
//! ```
//! use zonewise_domain::{Side, SignalContext};
//! use zonewise_engine::ZonePlanner;
//! use rust_decimal_macros::dec;
//!
//! let context = SignalContext::new(dec!(100), dec!(250)).unwrap();
//! let planner = ZonePlanner::new(&context);
//!
//! let zones = planner.zones(dec!(101), Side::Long);
//! assert_eq!(zones.first(), Some(&dec!(100.8)));
//! assert_eq!(zones.last(), Some(&dec!(101.2)));
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod margin;
pub mod planner;

// Re-exports for convenience
pub use config::SignalDefaults;
pub use error::{EngineError, EngineResult};
pub use margin::{FocusLadder, MarginSource};
pub use planner::{TradePlan, ZonePlanner};
