//! Small-sample summary statistics for metric arrays.
//!
//! The JSON report keeps raw per-sample arrays (downstream analysis wants
//! the full bag); these summaries exist for progress logging and quick
//! inspection from the command line.

use std::fmt;

/// Summary of one metric array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Number of samples.
    pub count: usize,
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation.
    pub stddev: f64,
}

impl Summary {
    /// Summarize a sample array; returns `None` for an empty array.
    #[must_use]
    pub fn from_samples(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &value in values {
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }
        #[allow(clippy::cast_precision_loss)]
        let denominator = count as f64;
        let mean = sum / denominator;
        let variance = values
            .iter()
            .map(|value| {
                let deviation = value - mean;
                deviation * deviation
            })
            .sum::<f64>()
            / denominator;
        Some(Self {
            count,
            min,
            max,
            mean,
            stddev: variance.sqrt(),
        })
    }

    /// Summarize a DL-score-difference array.
    #[must_use]
    pub fn of_scores(samples: &[i64]) -> Option<Self> {
        #[allow(clippy::cast_precision_loss)]
        let values: Vec<f64> = samples.iter().map(|&sample| sample as f64).collect();
        Self::from_samples(&values)
    }

    /// Summarize a microsecond-duration array.
    #[must_use]
    pub fn of_durations(samples: &[u64]) -> Option<Self> {
        #[allow(clippy::cast_precision_loss)]
        let values: Vec<f64> = samples.iter().map(|&sample| sample as f64).collect();
        Self::from_samples(&values)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} min={} max={} mean={:.2} stddev={:.2}",
            self.count, self.min, self.max, self.mean, self.stddev
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarizes_score_samples() {
        let summary = Summary::of_scores(&[2, 4, 4, 4, 5, 5, 7, 9]).expect("summary");
        assert_eq!(summary.count, 8);
        assert!((summary.min - 2.0).abs() < f64::EPSILON);
        assert!((summary.max - 9.0).abs() < f64::EPSILON);
        assert!((summary.mean - 5.0).abs() < f64::EPSILON);
        // The textbook population stddev of this sample is exactly 2.
        assert!((summary.stddev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn summarizes_duration_samples() {
        let summary = Summary::of_durations(&[100, 200]).expect("summary");
        assert!((summary.mean - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn a_single_sample_has_zero_spread() {
        let summary = Summary::of_scores(&[3]).expect("summary");
        assert!(summary.stddev.abs() < f64::EPSILON);
        assert!((summary.min - summary.max).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_arrays_have_no_summary() {
        assert_eq!(Summary::from_samples(&[]), None);
        assert_eq!(Summary::of_scores(&[]), None);
    }

    #[test]
    fn renders_readably() {
        let summary = Summary::of_scores(&[1, 3]).expect("summary");
        assert_eq!(summary.to_string(), "n=2 min=1 max=3 mean=2.00 stddev=1.00");
    }
}
