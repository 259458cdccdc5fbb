//! Engine error types.

use synrec_core::error::{DomainError, ErrorCode, MalformedTreeError, SyntenyError};

/// Failures of either reconciliation engine.
///
/// All variants are fatal for the enclosing request: the engines produce
/// no partial results and leave no guarantees about a tree they failed on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// The input tree violates the shape contract (arity or event kinds).
    #[error(transparent)]
    MalformedTree(#[from] MalformedTreeError),

    /// No assignment of internal syntenies reconciles the leaves with the
    /// ancestral synteny affixed to the root.
    #[error("no assignment of internal syntenies reconciles the leaves with root synteny '{root}'")]
    InconsistentInput {
        /// The ancestral synteny that was given.
        root: String,
    },

    /// The ordered engine's candidate space is `2^n` over the root length
    /// `n`; oversized roots are rejected up front.
    #[error("root synteny '{root}' has {length} genes; the ordered engine supports at most {max}")]
    RootTooLong {
        /// The ancestral synteny that was given.
        root: String,
        /// Its length.
        length: usize,
        /// The supported maximum.
        max: usize,
    },

    /// Synteny algebra failure while measuring or reifying losses.
    #[error(transparent)]
    Synteny(#[from] SyntenyError),

    /// Undefined extended-arithmetic operation (a programming bug).
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ReconcileError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::MalformedTree(err) => err.error_code(),
            Self::InconsistentInput { .. } => ErrorCode::InconsistentInput,
            Self::RootTooLong { .. } => ErrorCode::RootTooLong,
            Self::Synteny(err) => err.error_code(),
            Self::Domain(err) => err.error_code(),
        }
    }
}
