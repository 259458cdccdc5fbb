//! Map failures onto the workspace-wide machine-readable error codes.
//!
//! Subcommands return `anyhow` chains whose leaves are the typed errors
//! of the library crates. This module walks a chain, recovers the first
//! typed error it recognizes, and renders the terminal failure report:
//! the human-readable chain, the stable code, and the remediation hint.

use synrec_core::error::{
    CoreError, DomainError, MalformedTreeError, ParseError, SyntenyError,
};
use synrec_core::ErrorCode;
use synrec_eval::{EvalError, GridError};
use synrec_rec::ReconcileError;
use synrec_sim::SimulationError;

/// The first recognizable error code in the chain, if any.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> Option<ErrorCode> {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<EvalError>() {
            return Some(err.error_code());
        }
        if let Some(err) = cause.downcast_ref::<GridError>() {
            return Some(err.error_code());
        }
        if let Some(err) = cause.downcast_ref::<ReconcileError>() {
            return Some(err.error_code());
        }
        if let Some(err) = cause.downcast_ref::<SimulationError>() {
            return Some(err.error_code());
        }
        if let Some(err) = cause.downcast_ref::<CoreError>() {
            return Some(err.error_code());
        }
        if let Some(err) = cause.downcast_ref::<MalformedTreeError>() {
            return Some(err.error_code());
        }
        if let Some(err) = cause.downcast_ref::<ParseError>() {
            return Some(err.error_code());
        }
        if let Some(err) = cause.downcast_ref::<SyntenyError>() {
            return Some(err.error_code());
        }
        if let Some(err) = cause.downcast_ref::<DomainError>() {
            return Some(err.error_code());
        }
    }
    None
}

/// Render the failure report printed to standard error on exit.
#[must_use]
pub fn render(err: &anyhow::Error) -> String {
    let mut out = format!("error: {err:#}");
    if let Some(code) = error_code(err) {
        out.push_str(&format!("\ncode: {code}"));
        if let Some(hint) = code.hint() {
            out.push_str(&format!("\nhint: {hint}"));
        }
    }
    out
}
