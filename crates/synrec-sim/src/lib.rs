#![forbid(unsafe_code)]
//! Stochastic generation of reference synteny event trees.
//!
//! The simulator grows a fully-labeled binary event tree from an
//! ancestral synteny under a birth/loss/rearrangement model. Every random
//! draw comes from a caller-supplied RNG, so a fixed seed reproduces a
//! run exactly; the evaluation harness relies on this for replayable
//! campaigns.

mod generate;

pub use generate::simulate;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use synrec_core::synteny::Synteny;

/// Invalid simulation configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// A probability parameter is outside its admissible range.
    #[error("parameter {name} = {value} is out of range; expected {expected}")]
    InvalidParameter {
        /// Parameter name as exposed on the command line.
        name: &'static str,
        /// The offending value.
        value: f64,
        /// Human-readable admissible range.
        expected: &'static str,
    },
}

impl SimulationError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> synrec_core::ErrorCode {
        match self {
            Self::InvalidParameter { .. } => synrec_core::ErrorCode::InvalidParameter,
        }
    }
}

/// Deterministic replay descriptor: parameters plus the seed that drove
/// them. Two replays of the same descriptor produce identical trees.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedReplay {
    /// The simulation parameters.
    pub params: SimulationParams,
    /// The RNG seed.
    pub seed: u64,
}

impl SeedReplay {
    /// Pair parameters with a seed.
    #[must_use]
    pub const fn new(params: SimulationParams, seed: u64) -> Self {
        Self { params, seed }
    }

    /// Execute the replay.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidParameter`] when the parameters fail
    /// validation.
    pub fn replay(&self) -> Result<synrec_core::EventTree, SimulationError> {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(self.seed);
        simulate(&self.params, &mut rng)
    }
}

/// Parameters of one simulation.
///
/// Probabilities are wrapped in [`OrderedFloat`] so parameter records are
/// `Eq + Hash` and can key the evaluator's deduplicated results map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Ancestral synteny at the root.
    pub base: Synteny,
    /// Number of branching levels below the root.
    pub depth: u32,
    /// Probability that an internal node is a duplication (else a
    /// speciation).
    pub p_dup: OrderedFloat<f64>,
    /// Success probability of the geometric draw for segmental-duplication
    /// lengths.
    pub p_dup_length: OrderedFloat<f64>,
    /// Probability of a segmental loss on each child branch.
    pub p_loss: OrderedFloat<f64>,
    /// Success probability of the geometric draw for loss lengths.
    pub p_loss_length: OrderedFloat<f64>,
    /// Success probability of the geometric draw for the number of
    /// rearrangement swaps; `1` disables rearrangement.
    pub p_rearr: OrderedFloat<f64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            base: "a b c d e".parse().unwrap_or_default(),
            depth: 5,
            p_dup: OrderedFloat(0.5),
            p_dup_length: OrderedFloat(0.3),
            p_loss: OrderedFloat(0.2),
            p_loss_length: OrderedFloat(0.7),
            p_rearr: OrderedFloat(1.0),
        }
    }
}

impl SimulationParams {
    /// Check every probability against its admissible range.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidParameter`] naming the first offending
    /// parameter.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let closed_unit = [("p-dup", self.p_dup.0), ("p-loss", self.p_loss.0)];
        for (name, value) in closed_unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimulationError::InvalidParameter {
                    name,
                    value,
                    expected: "a probability in [0, 1]",
                });
            }
        }

        // Geometric success probabilities must be strictly positive.
        let half_open_unit = [
            ("p-dup-length", self.p_dup_length.0),
            ("p-loss-length", self.p_loss_length.0),
            ("p-rearr", self.p_rearr.0),
        ];
        for (name, value) in half_open_unit {
            if !(value > 0.0 && value <= 1.0) {
                return Err(SimulationError::InvalidParameter {
                    name,
                    value,
                    expected: "a probability in (0, 1]",
                });
            }
        }
        Ok(())
    }
}
