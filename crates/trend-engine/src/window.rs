//! Trailing Window Selection

use crate::TrendPoint;
use chrono::{DateTime, Duration, Utc};

/// Points dated on or after `now - window_days`.
///
/// `points` must already be in ascending order. Scans dated after `now` are
/// kept; only the lower bound is applied. A window reaching past the earliest
/// representable date keeps every point.
pub fn within_window(points: &[TrendPoint], now: DateTime<Utc>, window_days: u32) -> &[TrendPoint] {
    let cutoff = Duration::try_days(i64::from(window_days)).and_then(|d| now.checked_sub_signed(d));
    match cutoff {
        Some(cutoff) => {
            let start = points.partition_point(|p| p.scan_date < cutoff);
            &points[start..]
        }
        None => points,
    }
}
