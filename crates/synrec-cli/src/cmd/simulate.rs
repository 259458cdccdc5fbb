//! `synrec simulate` — generate a labeled reference tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ordered_float::OrderedFloat;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use synrec_core::write_tree;
use synrec_sim::{SeedReplay, SimulationParams, simulate};

use crate::sink;

/// Arguments for `synrec simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Ancestral synteny as whitespace-separated gene tokens.
    #[arg(long, default_value = "a b c d e")]
    pub base: String,

    /// Number of branching levels below the root.
    #[arg(long, default_value_t = 5)]
    pub depth: u32,

    /// Probability that an internal node is a duplication.
    #[arg(long = "p-dup", default_value_t = 0.5)]
    pub p_dup: f64,

    /// Geometric parameter for segmental-duplication lengths.
    #[arg(long = "p-dup-length", default_value_t = 0.3)]
    pub p_dup_length: f64,

    /// Probability of a segmental loss on each child branch.
    #[arg(long = "p-loss", default_value_t = 0.2)]
    pub p_loss: f64,

    /// Geometric parameter for loss lengths.
    #[arg(long = "p-loss-length", default_value_t = 0.7)]
    pub p_loss_length: f64,

    /// Geometric parameter for rearrangement swap counts; 1 disables
    /// rearrangement.
    #[arg(long = "p-rearr", default_value_t = 1.0)]
    pub p_rearr: f64,

    /// RNG seed; identical seeds reproduce runs exactly. Defaults to
    /// system entropy.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output path; '-' writes to standard output.
    #[arg(long, short, default_value = "-")]
    pub output: PathBuf,
}

impl SimulateArgs {
    fn params(&self) -> Result<SimulationParams> {
        Ok(SimulationParams {
            base: self.base.parse()?,
            depth: self.depth,
            p_dup: OrderedFloat(self.p_dup),
            p_dup_length: OrderedFloat(self.p_dup_length),
            p_loss: OrderedFloat(self.p_loss),
            p_loss_length: OrderedFloat(self.p_loss_length),
            p_rearr: OrderedFloat(self.p_rearr),
        })
    }
}

/// Run the subcommand.
pub fn run(args: &SimulateArgs) -> Result<()> {
    let params = args.params()?;
    debug!(seed = ?args.seed, depth = args.depth, "simulating reference tree");

    let tree = match args.seed {
        Some(seed) => SeedReplay::new(params, seed)
            .replay()
            .context("simulation failed")?,
        None => {
            let mut rng = StdRng::from_entropy();
            simulate(&params, &mut rng).context("simulation failed")?
        }
    };
    sink::write_text(&args.output, &write_tree(&tree))
}
