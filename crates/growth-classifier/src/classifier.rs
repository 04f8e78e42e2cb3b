//! Growth Rate Classifier

use crate::{AlertCandidate, AlertType, ClassifierConfig, Severity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use trend_engine::{within_window, TrendPoint};
use tracing::debug;

/// Outcome of evaluating a trend against the growth thresholds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthAssessment {
    /// Scans inside the trailing window
    pub points_in_window: usize,
    /// Months between the first and last scan in the window
    pub month_span: f64,
    /// Volume change in cc per month, zero when undefined
    pub growth_rate: f64,
    pub candidate: Option<AlertCandidate>,
}

impl GrowthAssessment {
    fn empty(points_in_window: usize) -> Self {
        Self {
            points_in_window,
            month_span: 0.0,
            growth_rate: 0.0,
            candidate: None,
        }
    }
}

/// Stateless classifier; `now` is always supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct GrowthClassifier {
    config: ClassifierConfig,
}

impl GrowthClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Evaluate an ascending trend over the window ending at `now`
    pub fn assess(&self, trend: &[TrendPoint], now: DateTime<Utc>) -> GrowthAssessment {
        let window = within_window(trend, now, self.config.window_days);
        let (first, last) = match window {
            [first, .., last] => (first, last),
            _ => return GrowthAssessment::empty(window.len()),
        };

        // Partial days are dropped before converting to months
        let days = (last.scan_date - first.scan_date).num_days();
        let month_span = days as f64 / self.config.days_per_month;
        if month_span <= 0.0 {
            debug!("Scans span no whole days, growth rate undefined");
            return GrowthAssessment::empty(window.len());
        }

        let growth_rate = (last.tumor_volume_cc - first.tumor_volume_cc) / month_span;
        let candidate = self.classify_rate(growth_rate, first.tumor_volume_cc);
        debug!(
            "Growth {:.4} cc/month over {:.2} months from baseline {} cc -> {:?}",
            growth_rate,
            month_span,
            first.tumor_volume_cc,
            candidate.as_ref().map(|c| c.alert_type)
        );

        GrowthAssessment {
            points_in_window: window.len(),
            month_span,
            growth_rate,
            candidate,
        }
    }

    /// At most one alert candidate for the trend
    pub fn classify(&self, trend: &[TrendPoint], now: DateTime<Utc>) -> Option<AlertCandidate> {
        self.assess(trend, now).candidate
    }

    /// Map a monthly growth rate to a candidate; the first matching tier wins.
    ///
    /// A zero baseline makes every positive rate rapid growth.
    fn classify_rate(&self, growth_rate: f64, baseline_cc: f64) -> Option<AlertCandidate> {
        let (alert_type, severity, label) =
            if growth_rate > self.config.rapid_growth_ratio * baseline_cc {
                (AlertType::RapidGrowth, Severity::High, "Rapid")
            } else if growth_rate > self.config.moderate_growth_ratio * baseline_cc {
                (AlertType::ModerateGrowth, Severity::Medium, "Moderate")
            } else {
                return None;
            };

        Some(AlertCandidate {
            alert_type,
            severity,
            message: format!("{} tumor growth detected: {:.2} cc/month", label, growth_rate),
            growth_rate,
        })
    }
}
