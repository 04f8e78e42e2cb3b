//! Alert types and severities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of clinical alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    RapidGrowth,
    ModerateGrowth,
    /// Reserved; no classifier rule produces it yet
    Shrinkage,
    /// Reserved; no classifier rule produces it yet
    NewTumor,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::RapidGrowth => "rapid_growth",
            AlertType::ModerateGrowth => "moderate_growth",
            AlertType::Shrinkage => "shrinkage",
            AlertType::NewTumor => "new_tumor",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert severity, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert proposed by the classifier, not yet recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertCandidate {
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
    /// Volume change in cc per month
    pub growth_rate: f64,
}
