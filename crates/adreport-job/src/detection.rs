//! Statistical anomaly detection over click counts

use adreport_core::PerformanceRecord;
use tracing::info;

// standard deviation multiplier for the spike threshold
const SIGMA: f64 = 2.0;

/// Flag click spikes across the whole batch.
///
/// The threshold is mean + 2x population standard deviation of clicks,
/// computed once over the entire collection (not per campaign, not per
/// day). A record is anomalous iff its clicks strictly exceed the
/// threshold. Returns the threshold.
pub fn flag_anomalies(records: &mut [PerformanceRecord]) -> f64 {
    let (mean, stddev) = click_stats(records);
    let threshold = mean + SIGMA * stddev;

    // empty input yields NaN from 0/0, guard it to 0 so nothing downstream chokes
    let threshold = if threshold.is_finite() { threshold } else { 0.0 };

    let mut flagged = 0;
    for record in records.iter_mut() {
        record.anomaly = f64::from(record.clicks) > threshold;
        if record.anomaly {
            flagged += 1;
        }
    }

    info!(threshold, anomalies = flagged, "anomaly detection complete");
    threshold
}

// mean and population standard deviation of clicks
fn click_stats(records: &[PerformanceRecord]) -> (f64, f64) {
    if records.is_empty() {
        return (0.0, 0.0);
    }
    let n = records.len() as f64;
    let mean = records.iter().map(|r| f64::from(r.clicks)).sum::<f64>() / n;
    let variance = records
        .iter()
        .map(|r| {
            let d = f64::from(r.clicks) - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(clicks: u32) -> PerformanceRecord {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        PerformanceRecord::new(date, "Spring Sale", clicks, 10)
    }

    #[test]
    fn test_empty_batch_does_not_panic() {
        let mut records: Vec<PerformanceRecord> = vec![];
        let threshold = flag_anomalies(&mut records);
        assert_eq!(threshold, 0.0);
    }

    #[test]
    fn test_single_record_is_not_anomalous() {
        // stddev of one value is zero, threshold degenerates to the value itself
        let mut records = vec![record(500)];
        let threshold = flag_anomalies(&mut records);
        assert_eq!(threshold, 500.0);
        assert!(!records[0].anomaly);
    }

    #[test]
    fn test_uniform_batch_has_no_anomalies() {
        // identical values: threshold == mean, nothing strictly exceeds it
        let mut records = vec![record(300), record(300), record(300)];
        let threshold = flag_anomalies(&mut records);
        assert_eq!(threshold, 300.0);
        assert!(records.iter().all(|r| !r.anomaly));
    }

    #[test]
    fn test_threshold_matches_formula() {
        let mut records = vec![record(100), record(200), record(300), record(400)];
        let threshold = flag_anomalies(&mut records);

        let mean = 250.0;
        let variance = (150.0_f64.powi(2) + 50.0_f64.powi(2) + 50.0_f64.powi(2) + 150.0_f64.powi(2)) / 4.0;
        assert!((threshold - (mean + 2.0 * variance.sqrt())).abs() < 1e-9);

        for r in &records {
            assert_eq!(r.anomaly, f64::from(r.clicks) > threshold);
        }
    }
}
