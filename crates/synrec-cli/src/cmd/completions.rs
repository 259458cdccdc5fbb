//! `synrec completions` — emit shell completion scripts.

use anyhow::Result;
use clap::{Args, Command};
use clap_complete::{Shell, generate};

/// Arguments for `synrec completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell` to standard output.
pub fn run(args: &CompletionsArgs, command: &mut Command) -> Result<()> {
    let name = command.get_name().to_owned();
    generate(args.shell, command, name, &mut std::io::stdout());
    Ok(())
}
