#![forbid(unsafe_code)]
//! Parameter-grid evaluation harness.
//!
//! Expands per-parameter axis specifications into a deduplicated
//! Cartesian grid, runs simulate → erase → reconcile for every
//! `(grid point, sample)` work unit on a sized worker pool, and emits one
//! JSON object per grid point with the requested metric arrays. A sample
//! whose reconciliation scores worse than its reference fails the whole
//! run with both trees attached for diagnosis.

pub mod grid;
pub mod report;
pub mod run;
pub mod stats;

use std::str::FromStr;

pub use grid::{GridError, GridSpec};
pub use report::PointReport;
pub use run::{EvalConfig, evaluate};
pub use stats::Summary;

use synrec_rec::ReconcileError;
use synrec_sim::{SimulationError, SimulationParams};

/// Which reconciliation engine the harness drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// The ordered DP engine.
    Ordered,
    /// The unordered three-pass engine.
    Unordered,
}

/// A measurable quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// DL-score difference, reference minus reconciled.
    DlScore,
    /// Reconciliation wall-clock time in microseconds.
    Duration,
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "dlscore" => Ok(Self::DlScore),
            "duration" => Ok(Self::Duration),
            other => Err(format!(
                "unknown metric '{other}'; expected 'dlscore' or 'duration'"
            )),
        }
    }
}

/// Evaluation failures. Any sample failure is fatal for the whole run.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// A grid point failed simulation-parameter validation.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// Reconciliation failed on an erased reference.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// The worker pool could not be constructed.
    #[error("worker pool construction failed: {reason}")]
    Pool {
        /// Underlying reason.
        reason: String,
    },

    /// Regression guard: a reconciled tree scored worse than the
    /// reference it was erased from. Carries both trees for diagnosis.
    #[error(
        "reconciled tree scores {reconciled_score}, worse than its reference ({reference_score})\nreference:  {reference}\nreconciled: {reconciled}"
    )]
    Divergence {
        /// The grid point that diverged.
        params: Box<SimulationParams>,
        /// DL-score of the simulated reference.
        reference_score: usize,
        /// DL-score of the reconciled tree.
        reconciled_score: usize,
        /// The reference tree, as NHX.
        reference: String,
        /// The reconciled tree, as NHX.
        reconciled: String,
    },
}

impl EvalError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> synrec_core::ErrorCode {
        match self {
            Self::Simulation(err) => err.error_code(),
            Self::Reconcile(err) => err.error_code(),
            Self::Pool { .. } => synrec_core::ErrorCode::WorkerPool,
            Self::Divergence { .. } => synrec_core::ErrorCode::EvaluationDivergence,
        }
    }
}

impl GridError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> synrec_core::ErrorCode {
        synrec_core::ErrorCode::GridSpec
    }
}
