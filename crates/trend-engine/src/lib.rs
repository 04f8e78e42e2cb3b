//! Trend Engine
//!
//! Projects per-scan measurements into an ascending volume-over-time series
//! and selects the trailing window used for growth classification.

mod trend;
mod window;

pub use trend::{build_trend, TrendCalculator, TrendPoint};
pub use window::within_window;
