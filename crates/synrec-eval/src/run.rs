//! The worker pool: simulate → erase → reconcile → measure, per
//! `(grid point, sample)` work unit.
//!
//! Work units are distributed dynamically over a sized rayon pool. Each
//! worker draws from the thread-local RNG (seeded from system entropy at
//! thread startup, never shared). Shared state is one mutex-protected
//! results map keyed by [`SimulationParams`], one atomic performed-tasks
//! counter for progress reporting, and one atomic failure flag: once any
//! sample fails, remaining work units observe the flag and no-op, the
//! outstanding ones drain, and the whole evaluation returns the first
//! error without producing a report.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use synrec_core::erase::erase_tree;
use synrec_core::write_tree;
use synrec_rec::{dl_score, reconcile_ordered, reconcile_unordered};
use synrec_sim::{SimulationParams, simulate};

use crate::report::PointReport;
use crate::{Engine, EvalError, Metric};

/// Evaluation configuration.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Deduplicated grid points, in report order.
    pub grid: Vec<SimulationParams>,
    /// Metrics to record.
    pub metrics: Vec<Metric>,
    /// Samples per grid point.
    pub sample_size: usize,
    /// Worker count; `0` means one worker per logical CPU. `1` disables
    /// parallelism.
    pub jobs: usize,
    /// Which engine to evaluate.
    pub engine: Engine,
}

/// Measurements of one sample.
struct Sample {
    score_difference: i64,
    duration_us: u64,
}

#[derive(Default)]
struct PointSamples {
    score_differences: Vec<i64>,
    durations_us: Vec<u64>,
}

/// Run the full evaluation and return one report per grid point, in grid
/// order.
///
/// # Errors
///
/// The first failing sample aborts the evaluation: simulation or
/// reconciliation errors surface as-is, and a reconciliation scoring
/// worse than its reference is [`EvalError::Divergence`] with both trees
/// attached.
pub fn evaluate(config: &EvalConfig) -> Result<Vec<PointReport>, EvalError> {
    let jobs = if config.jobs == 0 {
        num_cpus::get()
    } else {
        config.jobs
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|err| EvalError::Pool {
            reason: err.to_string(),
        })?;

    let units: Vec<(usize, usize)> = (0..config.grid.len())
        .flat_map(|point| (0..config.sample_size).map(move |sample| (point, sample)))
        .collect();
    let total = units.len();
    info!(points = config.grid.len(), samples = config.sample_size, jobs, "starting evaluation");

    let results: Mutex<HashMap<SimulationParams, PointSamples>> = Mutex::new(HashMap::new());
    let performed = AtomicUsize::new(0);
    let has_failed = AtomicBool::new(false);
    let failure: Mutex<Option<EvalError>> = Mutex::new(None);

    pool.install(|| {
        units.par_iter().for_each(|&(point, _sample)| {
            if has_failed.load(Ordering::Relaxed) {
                return;
            }
            let params = &config.grid[point];
            match run_sample(params, config.engine) {
                Ok(sample) => {
                    let Ok(mut map) = results.lock() else { return };
                    let entry = map.entry(params.clone()).or_default();
                    entry.score_differences.push(sample.score_difference);
                    entry.durations_us.push(sample.duration_us);
                    drop(map);
                    let done = performed.fetch_add(1, Ordering::Relaxed) + 1;
                    debug!(done, total, "work unit finished");
                }
                Err(err) => {
                    has_failed.store(true, Ordering::Relaxed);
                    if let Ok(mut slot) = failure.lock() {
                        slot.get_or_insert(err);
                    }
                }
            }
        });
    });

    if let Ok(mut slot) = failure.lock() {
        if let Some(err) = slot.take() {
            return Err(err);
        }
    }

    let mut map = match results.into_inner() {
        Ok(map) => map,
        Err(poisoned) => poisoned.into_inner(),
    };
    let reports = config
        .grid
        .iter()
        .map(|params| {
            let samples = map.remove(params).unwrap_or_default();
            PointReport {
                params: params.clone(),
                dlscore: if config.metrics.contains(&Metric::DlScore) {
                    samples.score_differences
                } else {
                    Vec::new()
                },
                duration: if config.metrics.contains(&Metric::Duration) {
                    samples.durations_us
                } else {
                    Vec::new()
                },
            }
        })
        .collect();
    info!(performed = performed.load(Ordering::Relaxed), "evaluation finished");
    Ok(reports)
}

/// One simulate → erase → reconcile → measure round.
fn run_sample(params: &SimulationParams, engine: Engine) -> Result<Sample, EvalError> {
    let mut rng = rand::thread_rng();
    let reference = simulate(params, &mut rng)?;

    let mut reconciled = reference.clone();
    erase_tree(&mut reconciled);

    let start = Instant::now();
    match engine {
        Engine::Ordered => {
            reconcile_ordered(&mut reconciled)?;
        }
        Engine::Unordered => {
            reconcile_unordered(&mut reconciled)?;
        }
    }
    let duration_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

    let reference_score = dl_score(&reference);
    let reconciled_score = dl_score(&reconciled);
    if reconciled_score > reference_score {
        return Err(EvalError::Divergence {
            params: Box::new(params.clone()),
            reference_score,
            reconciled_score,
            reference: write_tree(&reference),
            reconciled: write_tree(&reconciled),
        });
    }

    let score_difference = i64::try_from(reference_score - reconciled_score).unwrap_or(i64::MAX);
    Ok(Sample {
        score_difference,
        duration_us,
    })
}
