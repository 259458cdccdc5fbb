#![forbid(unsafe_code)]
//! `synrec`: parsimonious super-reconciliation of synteny family trees.

mod cmd;
mod diagnose;
mod sink;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "synrec: parsimonious super-reconciliation of synteny trees",
    long_about = None,
    after_help = "QUICK REFERENCE:\n    synrec simulate --seed 42          # generate a reference tree\n    synrec erase < ref.nhx             # strip labels for the engines\n    synrec reconcile < erased.nhx      # ordered reconciliation\n    synrec reconcile --unordered       # gene-set reconciliation\n    synrec evaluate -o sweep.json --p-dup \"[0.1:0.9:0.2]\"\n    synrec viz < tree.nhx | dot -Tpdf  # render a tree"
)]
struct Cli {
    /// Enable verbose logging (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Generate a labeled reference tree",
        long_about = "Simulate a reference event tree under the birth/loss/rearrangement model.",
        after_help = "EXAMPLES:\n    # A reproducible reference tree\n    synrec simulate --seed 42 --base \"a b c d\" --depth 4\n\n    # Heavier loss pressure, written to a file\n    synrec simulate --p-loss 0.5 --output ref.nhx"
    )]
    Simulate(cmd::simulate::SimulateArgs),

    #[command(
        about = "Canonicalize a labeled tree into engine input",
        long_about = "Strip internal syntenies and collapse cascaded loss chains so the tree is a valid reconciliation input.",
        after_help = "EXAMPLES:\n    # Erase a simulated reference\n    synrec erase --input ref.nhx --output erased.nhx\n\n    # As a pipe stage\n    synrec simulate --seed 7 | synrec erase"
    )]
    Erase(cmd::erase::EraseArgs),

    #[command(
        about = "Reconcile one tree",
        long_about = "Run the ordered DP engine (default) or the unordered gene-set engine on one NHX tree.",
        after_help = "EXAMPLES:\n    # Ordered reconciliation of an erased tree\n    synrec reconcile --input erased.nhx\n\n    # Unordered reconciliation from a pipe\n    synrec simulate --seed 7 | synrec erase | synrec reconcile --unordered"
    )]
    Reconcile(cmd::reconcile::ReconcileArgs),

    #[command(
        about = "Sweep simulation parameters and measure the engines",
        long_about = "Expand per-parameter axes (value, {set}, or [min:max:step] range) into a grid, run simulate-erase-reconcile per sample on a worker pool, and write a JSON report.",
        after_help = "EXAMPLES:\n    # Sweep duplication probability, 20 samples per point\n    synrec evaluate -o sweep.json --p-dup \"[0.1:0.9:0.2]\" --sample-size 20\n\n    # Compare depths for the unordered engine, timing included\n    synrec evaluate -o sweep.json --unordered --depth \"{3,5,7}\" --metrics dlscore --metrics duration"
    )]
    Evaluate(cmd::evaluate::EvaluateArgs),

    #[command(
        about = "Render a tree as Graphviz DOT",
        after_help = "EXAMPLES:\n    # Render to PDF via graphviz\n    synrec viz --input tree.nhx | dot -Tpdf > tree.pdf"
    )]
    Viz(cmd::viz::VizArgs),

    #[command(
        about = "Emit shell completion scripts",
        after_help = "EXAMPLES:\n    # Bash completions\n    synrec completions bash > /etc/bash_completion.d/synrec"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Simulate(args) => cmd::simulate::run(args),
        Commands::Erase(args) => cmd::erase::run(args),
        Commands::Reconcile(args) => cmd::reconcile::run(args),
        Commands::Evaluate(args) => cmd::evaluate::run(args),
        Commands::Viz(args) => cmd::viz::run(args),
        Commands::Completions(args) => {
            cmd::completions::run(args, &mut Cli::command())
        }
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(&cli.command) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", diagnose::render(&err));
            std::process::ExitCode::FAILURE
        }
    }
}
