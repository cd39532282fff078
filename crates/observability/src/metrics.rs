//! Conversion metrics
//!
//! Counters are emitted through the `metrics` facade, `RunningStats`
//! aggregates converted values in memory for summaries.

use contracts::{CalibrationTable, CrossSensor};
use metrics::{counter, gauge};

/// Record a successful calibration load
pub fn record_calibration_loaded(table: &CalibrationTable) {
    counter!("timeconv_calibration_loads_total").increment(1);
    for kind in CrossSensor::ALL {
        gauge!("timeconv_calibration_rules", "table" => kind.key())
            .set(table.rules(kind).len() as f64);
    }
}

/// Record `count` timestamps mapped through one rule table
pub fn record_conversion(table: CrossSensor, count: usize) {
    counter!("timeconv_conversions_total", "table" => table.key()).increment(count as u64);
}

/// Record a scalar timestamp that matched no rule
pub fn record_no_match(table: CrossSensor) {
    counter!("timeconv_no_match_total", "table" => table.key()).increment(1);
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn extend(&mut self, values: &[f64]) {
        for &value in values {
            self.push(value);
        }
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Statistics snapshot
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.6}, max={:.6}, mean={:.6}, std={:.6} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        stats.extend(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);

        assert!((stats.mean() - 5.0).abs() < 1e-12);
        assert!((stats.variance() - 32.0 / 7.0).abs() < 1e-12);

        let summary = StatsSummary::from(&stats);
        assert_eq!(summary.count, 8);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
    }

    #[test]
    fn test_empty_stats_summary() {
        let stats = RunningStats::default();
        let summary = StatsSummary::from(&stats);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.to_string(), "N/A");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_conversion(CrossSensor::DvsToRs, 3);
        record_no_match(CrossSensor::LidarToDvs);
    }
}
