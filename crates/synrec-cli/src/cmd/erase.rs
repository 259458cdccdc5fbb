//! `synrec erase` — canonicalize a labeled tree into engine input.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use synrec_core::erase::erase_tree;
use synrec_core::{parse_tree, write_tree};

use crate::sink;

/// Arguments for `synrec erase`.
#[derive(Args, Debug)]
pub struct EraseArgs {
    /// Input path; '-' reads from standard input.
    #[arg(long, short, default_value = "-")]
    pub input: PathBuf,

    /// Output path; '-' writes to standard output.
    #[arg(long, short, default_value = "-")]
    pub output: PathBuf,
}

/// Run the subcommand.
pub fn run(args: &EraseArgs) -> Result<()> {
    let text = sink::read_text(&args.input)?;
    let mut tree = parse_tree(&text)
        .with_context(|| format!("parsing tree from '{}'", args.input.display()))?;
    erase_tree(&mut tree);
    sink::write_text(&args.output, &write_tree(&tree))
}
