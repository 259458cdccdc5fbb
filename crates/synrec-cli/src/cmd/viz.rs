//! `synrec viz` — render a tree as Graphviz DOT.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use synrec_core::{parse_tree, viz};

use crate::sink;

/// Arguments for `synrec viz`.
#[derive(Args, Debug)]
pub struct VizArgs {
    /// Input path; '-' reads from standard input.
    #[arg(long, short, default_value = "-")]
    pub input: PathBuf,

    /// Output path; '-' writes to standard output.
    #[arg(long, short, default_value = "-")]
    pub output: PathBuf,
}

/// Run the subcommand.
pub fn run(args: &VizArgs) -> Result<()> {
    let text = sink::read_text(&args.input)?;
    let tree = parse_tree(&text)
        .with_context(|| format!("parsing tree from '{}'", args.input.display()))?;
    sink::write_text(&args.output, viz::to_dot(&tree).trim_end())
}
