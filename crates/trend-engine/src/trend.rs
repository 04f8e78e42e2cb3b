//! Volume Trend Computation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::{Measurement, MeasurementStore, StorageError};
use tracing::debug;

/// A measurement placed in a patient's chronological series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub scan_id: String,
    pub scan_date: DateTime<Utc>,
    pub tumor_volume_cc: f64,
    pub tumor_volume_mm3: f64,
    pub confidence_score: f64,
    pub scan_type: String,
}

impl From<Measurement> for TrendPoint {
    fn from(m: Measurement) -> Self {
        Self {
            scan_id: m.scan_id,
            scan_date: m.scan_date,
            tumor_volume_cc: m.tumor_volume_cc,
            tumor_volume_mm3: m.tumor_volume_mm3,
            confidence_score: m.confidence_score,
            scan_type: m.scan_type,
        }
    }
}

/// Order measurements by scan date.
///
/// The sort is stable: scans sharing a date keep the order they were stored in.
pub fn build_trend(measurements: Vec<Measurement>) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = measurements.into_iter().map(TrendPoint::from).collect();
    points.sort_by_key(|p| p.scan_date);
    points
}

/// Reads measurements for a patient and returns them as a trend
pub struct TrendCalculator {
    store: Arc<dyn MeasurementStore>,
}

impl TrendCalculator {
    pub fn new(store: Arc<dyn MeasurementStore>) -> Self {
        Self { store }
    }

    /// Ascending trend for a patient; empty when nothing has been measured yet
    pub fn trend(&self, patient_id: &str) -> Result<Vec<TrendPoint>, StorageError> {
        let measurements = self.store.measurements_for_patient(patient_id)?;
        let points = build_trend(measurements);
        debug!("Trend for patient {} has {} points", patient_id, points.len());
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use storage::Repository;

    fn measurement(scan_id: &str, day: u32, volume_cc: f64) -> Measurement {
        Measurement {
            scan_id: scan_id.to_string(),
            scan_date: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            tumor_volume_cc: volume_cc,
            tumor_volume_mm3: volume_cc * 1000.0,
            confidence_score: 0.8,
            scan_type: "FLAIR".to_string(),
        }
    }

    #[test]
    fn test_sorted_by_scan_date() {
        let trend = build_trend(vec![
            measurement("c", 20, 3.0),
            measurement("a", 1, 1.0),
            measurement("b", 10, 2.0),
        ]);
        let ids: Vec<_> = trend.iter().map(|p| p.scan_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_same_date_keeps_insertion_order() {
        let trend = build_trend(vec![
            measurement("late", 15, 3.0),
            measurement("first", 5, 1.0),
            measurement("second", 5, 2.0),
        ]);
        let ids: Vec<_> = trend.iter().map(|p| p.scan_id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "late"]);
    }

    #[test]
    fn test_calculator_reads_store() {
        let repo = Arc::new(Repository::new());
        repo.register_patient("P001").unwrap();
        repo.register_patient("P002").unwrap();
        repo.insert_measurement("P001", measurement("s2", 9, 4.5)).unwrap();
        repo.insert_measurement("P001", measurement("s1", 2, 4.0)).unwrap();

        let calculator = TrendCalculator::new(repo);
        let trend = calculator.trend("P001").unwrap();
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].scan_id, "s1");
        assert_eq!(trend[1].tumor_volume_cc, 4.5);

        // No completed segmentations is an empty series, not an error
        assert!(calculator.trend("P002").unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn prop_trend_is_ascending(days in proptest::collection::vec(1u32..=28, 0..20)) {
            let measurements = days
                .iter()
                .enumerate()
                .map(|(i, &d)| measurement(&format!("s{i}"), d, 1.0))
                .collect();
            let trend = build_trend(measurements);
            prop_assert_eq!(trend.len(), days.len());
            prop_assert!(trend.windows(2).all(|w| w[0].scan_date <= w[1].scan_date));
        }
    }
}
