//! Classifier configuration

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Longest trailing window accepted (ten years)
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Growth classification thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Trailing window considered for growth (days)
    pub window_days: u32,
    /// Days per month when converting a span into months
    pub days_per_month: f64,
    /// Monthly growth above this fraction of the baseline volume is rapid
    pub rapid_growth_ratio: f64,
    /// Monthly growth above this fraction of the baseline volume is moderate
    pub moderate_growth_ratio: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            window_days: 90,
            days_per_month: 30.0,
            rapid_growth_ratio: 0.10,
            moderate_growth_ratio: 0.05,
        }
    }
}

impl ClassifierConfig {
    /// Reject settings that would make the growth rate meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_WINDOW_DAYS).contains(&self.window_days) {
            return Err(ConfigError::InvalidParameter {
                field: "window_days",
                value: f64::from(self.window_days),
                requirement: "between 1 and 3650",
            });
        }
        if !(self.days_per_month.is_finite() && self.days_per_month > 0.0) {
            return Err(ConfigError::InvalidParameter {
                field: "days_per_month",
                value: self.days_per_month,
                requirement: "finite and greater than zero",
            });
        }
        for (field, value) in [
            ("rapid_growth_ratio", self.rapid_growth_ratio),
            ("moderate_growth_ratio", self.moderate_growth_ratio),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidParameter {
                    field,
                    value,
                    requirement: "finite and non-negative",
                });
            }
        }
        Ok(())
    }
}
