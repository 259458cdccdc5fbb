//! `synrec evaluate` — parameter-sweep harness.
//!
//! Every simulation parameter accepts a single value, a set literal
//! `{a,b,c}`, or (numeric parameters) a range `[min:max[:step]]`; the
//! harness runs the Cartesian product.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::info;

use synrec_eval::grid::{parse_axis, parse_f64_axis, parse_u32_axis};
use synrec_eval::{Engine, EvalConfig, GridSpec, Metric, Summary, evaluate, report};

use crate::sink;

/// Arguments for `synrec evaluate`.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Output path for the JSON report; '-' writes to standard output.
    #[arg(long, short)]
    pub output: PathBuf,

    /// Metric to record (repeatable): dlscore or duration. Defaults to
    /// dlscore.
    #[arg(long = "metrics", value_name = "METRIC")]
    pub metrics: Vec<String>,

    /// Samples per grid point.
    #[arg(long = "sample-size", default_value_t = 10)]
    pub sample_size: usize,

    /// Worker count; 0 means one worker per logical CPU, 1 disables
    /// parallelism.
    #[arg(long, default_value_t = 0)]
    pub jobs: usize,

    /// Evaluate the unordered engine instead of the ordered DP.
    #[arg(long)]
    pub unordered: bool,

    /// Ancestral synteny axis (value or set).
    #[arg(long, default_value = "a b c d e")]
    pub base: String,

    /// Depth axis (value, set, or range).
    #[arg(long, default_value = "5")]
    pub depth: String,

    /// Duplication-probability axis (value, set, or range).
    #[arg(long = "p-dup", default_value = "0.5")]
    pub p_dup: String,

    /// Duplication-length axis (value, set, or range).
    #[arg(long = "p-dup-length", default_value = "0.3")]
    pub p_dup_length: String,

    /// Loss-probability axis (value, set, or range).
    #[arg(long = "p-loss", default_value = "0.2")]
    pub p_loss: String,

    /// Loss-length axis (value, set, or range).
    #[arg(long = "p-loss-length", default_value = "0.7")]
    pub p_loss_length: String,

    /// Rearrangement axis (value, set, or range); 1 disables
    /// rearrangement.
    #[arg(long = "p-rearr", default_value = "1.0")]
    pub p_rearr: String,
}

impl EvaluateArgs {
    fn grid_spec(&self) -> Result<GridSpec> {
        Ok(GridSpec {
            base: parse_axis(&self.base, "synteny").context("parsing --base")?,
            depth: parse_u32_axis(&self.depth).context("parsing --depth")?,
            p_dup: parse_f64_axis(&self.p_dup).context("parsing --p-dup")?,
            p_dup_length: parse_f64_axis(&self.p_dup_length)
                .context("parsing --p-dup-length")?,
            p_loss: parse_f64_axis(&self.p_loss).context("parsing --p-loss")?,
            p_loss_length: parse_f64_axis(&self.p_loss_length)
                .context("parsing --p-loss-length")?,
            p_rearr: parse_f64_axis(&self.p_rearr).context("parsing --p-rearr")?,
        })
    }

    fn metrics(&self) -> Result<Vec<Metric>> {
        if self.metrics.is_empty() {
            return Ok(vec![Metric::DlScore]);
        }
        let mut metrics = Vec::with_capacity(self.metrics.len());
        for text in &self.metrics {
            match text.parse::<Metric>() {
                Ok(metric) => {
                    if !metrics.contains(&metric) {
                        metrics.push(metric);
                    }
                }
                Err(message) => bail!("{message}"),
            }
        }
        Ok(metrics)
    }
}

/// Run the subcommand.
pub fn run(args: &EvaluateArgs) -> Result<()> {
    if args.sample_size == 0 {
        bail!("--sample-size must be at least 1");
    }

    let grid = args.grid_spec()?.expand();
    if grid.is_empty() {
        bail!("the parameter grid is empty");
    }
    info!(points = grid.len(), "expanded parameter grid");

    let config = EvalConfig {
        grid,
        metrics: args.metrics()?,
        sample_size: args.sample_size,
        jobs: args.jobs,
        engine: if args.unordered {
            Engine::Unordered
        } else {
            Engine::Ordered
        },
    };

    let reports = evaluate(&config).context("evaluation failed")?;
    for point in &reports {
        if let Some(summary) = Summary::of_scores(&point.dlscore) {
            info!(params = %point.params.base, depth = point.params.depth, dlscore = %summary);
        }
        if let Some(summary) = Summary::of_durations(&point.duration) {
            info!(params = %point.params.base, depth = point.params.depth, duration_us = %summary);
        }
    }

    let json = report::to_json(&reports).context("serializing the report")?;
    sink::write_text(&args.output, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: EvaluateArgs,
    }

    #[test]
    fn metrics_default_to_dlscore() {
        let parsed = Harness::parse_from(["test", "--output", "out.json"]);
        assert_eq!(parsed.args.metrics().expect("metrics"), vec![Metric::DlScore]);
    }

    #[test]
    fn repeated_metrics_deduplicate_in_order() {
        let parsed = Harness::parse_from([
            "test", "--output", "out.json", "--metrics", "duration", "--metrics", "dlscore",
            "--metrics", "duration",
        ]);
        assert_eq!(
            parsed.args.metrics().expect("metrics"),
            vec![Metric::Duration, Metric::DlScore]
        );
    }

    #[test]
    fn unknown_metrics_are_rejected() {
        let parsed =
            Harness::parse_from(["test", "--output", "out.json", "--metrics", "latency"]);
        assert!(parsed.args.metrics().is_err());
    }

    #[test]
    fn axis_specs_expand_into_a_grid() {
        let parsed = Harness::parse_from([
            "test", "--output", "out.json", "--depth", "[2:4]", "--p-dup", "{0.2,0.8}",
        ]);
        let grid = parsed.args.grid_spec().expect("grid").expand();
        // 3 depths x 2 duplication probabilities.
        assert_eq!(grid.len(), 6);
    }

    #[test]
    fn malformed_axes_surface_with_the_flag_name() {
        let parsed =
            Harness::parse_from(["test", "--output", "out.json", "--p-loss", "[1:0]"]);
        let err = parsed.args.grid_spec().expect_err("should fail");
        assert!(format!("{err:#}").contains("--p-loss"));
    }
}
