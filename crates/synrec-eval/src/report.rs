//! JSON report emission.

use serde::Serialize;

use synrec_sim::SimulationParams;

/// Metrics gathered for one grid point.
///
/// Each requested metric is an array with one entry per sample; the order
/// within an array is scheduling-dependent and must be treated as an
/// unordered bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointReport {
    /// The grid point.
    pub params: SimulationParams,
    /// Per-sample DL-score differences (reference minus reconciled).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dlscore: Vec<i64>,
    /// Per-sample reconciliation wall-clock durations, in microseconds on
    /// a steady clock.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub duration: Vec<u64>,
}

/// Serialize the full report as a JSON array, one object per grid point.
///
/// # Errors
///
/// Propagates `serde_json` serialization failures.
pub fn to_json(reports: &[PointReport]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(reports)
}
