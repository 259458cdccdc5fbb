//! Path-or-stdio plumbing: a path of `-` maps to standard input/output.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// True when `path` designates standard input/output.
fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read the whole source into a string.
///
/// # Errors
///
/// I/O failures, annotated with the offending path.
pub fn read_text(path: &Path) -> Result<String> {
    if is_stdio(path) {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading standard input")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("reading '{}'", path.display()))
}

/// Write `text` to the sink, with a trailing newline.
///
/// # Errors
///
/// I/O failures, annotated with the offending path.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    if is_stdio(path) {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.write_all(b"\n"))
            .context("writing standard output")?;
        return Ok(());
    }
    fs::write(path, format!("{text}\n"))
        .with_context(|| format!("writing '{}'", path.display()))
}
