//! `synrec reconcile` — run a super-reconciliation engine on one tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use synrec_core::{parse_tree, write_tree};
use synrec_rec::{EventCounts, reconcile_ordered, reconcile_unordered};

use crate::sink;

/// Arguments for `synrec reconcile`.
#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Use the unordered (gene-set) engine instead of the ordered DP.
    #[arg(long)]
    pub unordered: bool,

    /// Input path; '-' reads from standard input.
    #[arg(long, short, default_value = "-")]
    pub input: PathBuf,

    /// Output path; '-' writes to standard output.
    #[arg(long, short, default_value = "-")]
    pub output: PathBuf,
}

/// Run the subcommand.
pub fn run(args: &ReconcileArgs) -> Result<()> {
    let text = sink::read_text(&args.input)?;
    let mut tree = parse_tree(&text)
        .with_context(|| format!("parsing tree from '{}'", args.input.display()))?;

    if args.unordered {
        reconcile_unordered(&mut tree)
            .with_context(|| format!("unordered reconciliation of '{}'", args.input.display()))?;
    } else {
        reconcile_ordered(&mut tree)
            .with_context(|| format!("ordered reconciliation of '{}'", args.input.display()))?;
    }
    let counts = EventCounts::of(&tree);
    debug!(score = counts.dl_score(), events = %counts, "reconciliation finished");

    sink::write_text(&args.output, &write_tree(&tree))
}
