//! Error types for the core data model.
//!
//! Each concern keeps its own enum with contextual fields; [`CoreError`]
//! aggregates them transparently for callers that do not need to match on
//! a single concern. The algorithmic crates layer their own error enums on
//! top of these. Core errors are fatal for the enclosing request: there
//! are no retries and no partial results, and the core logs nothing.
//!
//! Every failure kind across the workspace also maps to a stable
//! machine-readable [`ErrorCode`] with an optional remediation hint; the
//! command line surfaces these next to the human-readable message.
//!
//! # Error Code Ranges
//!
//! | Range | Category                      |
//! |-------|-------------------------------|
//! | E1xxx | Tree text format              |
//! | E2xxx | Tree structure                |
//! | E3xxx | Synteny algebra               |
//! | E4xxx | Extended arithmetic           |
//! | E5xxx | Reconciliation                |
//! | E6xxx | Simulation and evaluation     |

pub use crate::cost::DomainError;
pub use crate::nhx::ParseError;
pub use crate::synteny::SyntenyError;

use crate::event::EventKind;

// ---------------------------------------------------------------------------
// Machine-readable error codes
// ---------------------------------------------------------------------------

/// Machine-readable error codes shared by every crate in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// NHX syntax violation.
    ParseSyntax,
    /// Internal node with the wrong number of children.
    TreeArity,
    /// Internal node with a non-branching event kind.
    TreeInternalEvent,
    /// Leaf tagged with a branching event kind.
    TreeLeafEvent,
    /// Unrecognized `event` tag value.
    TreeUnknownEvent,
    /// Malformed `segment` tag.
    TreeSegmentTag,
    /// Segment outside its synteny.
    TreeSegmentBounds,
    /// Target is not a subsequence of its source.
    NotASubsequence,
    /// Undefined extended-arithmetic operation.
    UndefinedArithmetic,
    /// Finite cost arithmetic overflowed.
    ArithmeticOverflow,
    /// Infinite cost converted to a plain integer.
    InfiniteConversion,
    /// No internal-synteny assignment reconciles the leaves.
    InconsistentInput,
    /// Root synteny too long for the ordered engine.
    RootTooLong,
    /// Simulation parameter out of range.
    InvalidParameter,
    /// Malformed evaluation axis specification.
    GridSpec,
    /// Worker pool construction failed.
    WorkerPool,
    /// Reconciliation scored worse than its reference.
    EvaluationDivergence,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ParseSyntax => "E1001",
            Self::TreeArity => "E2001",
            Self::TreeInternalEvent => "E2002",
            Self::TreeLeafEvent => "E2003",
            Self::TreeUnknownEvent => "E2004",
            Self::TreeSegmentTag => "E2005",
            Self::TreeSegmentBounds => "E2006",
            Self::NotASubsequence => "E3001",
            Self::UndefinedArithmetic => "E4001",
            Self::ArithmeticOverflow => "E4002",
            Self::InfiniteConversion => "E4003",
            Self::InconsistentInput => "E5001",
            Self::RootTooLong => "E5002",
            Self::InvalidParameter => "E6001",
            Self::GridSpec => "E6002",
            Self::WorkerPool => "E6003",
            Self::EvaluationDivergence => "E6004",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ParseSyntax => "NHX syntax error",
            Self::TreeArity => "Wrong number of children on an internal node",
            Self::TreeInternalEvent => "Invalid event kind on an internal node",
            Self::TreeLeafEvent => "Branching event kind on a leaf",
            Self::TreeUnknownEvent => "Unknown event tag value",
            Self::TreeSegmentTag => "Malformed segment tag",
            Self::TreeSegmentBounds => "Segment outside its synteny",
            Self::NotASubsequence => "Not a subsequence",
            Self::UndefinedArithmetic => "Undefined extended-arithmetic operation",
            Self::ArithmeticOverflow => "Cost arithmetic overflow",
            Self::InfiniteConversion => "Infinite cost is not an integer",
            Self::InconsistentInput => "Leaves inconsistent with the root synteny",
            Self::RootTooLong => "Root synteny too long",
            Self::InvalidParameter => "Simulation parameter out of range",
            Self::GridSpec => "Malformed axis specification",
            Self::WorkerPool => "Worker pool construction failed",
            Self::EvaluationDivergence => "Reconciliation scored worse than its reference",
        }
    }

    /// Optional remediation hint surfaced next to the message.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ParseSyntax => {
                Some("Check the tree text near the reported line and column.")
            }
            Self::TreeArity => Some(
                "Internal nodes need exactly two children; run `synrec erase` first if the tree still carries unary loss chains.",
            ),
            Self::TreeInternalEvent => Some(
                "Internal nodes must be tagged duplication or speciation; losses belong on leaves or unary chains before erasure.",
            ),
            Self::TreeLeafEvent => {
                Some("Remove the event tag from the leaf or give the node two children.")
            }
            Self::TreeUnknownEvent => {
                Some("Valid event tags: duplication, speciation, loss (lowercase).")
            }
            Self::TreeSegmentTag => Some("Write segments as '<start> - <end>'."),
            Self::TreeSegmentBounds => {
                Some("The segment must fit inside the node's synteny; check the segfmt convention of the producer.")
            }
            Self::NotASubsequence => None,
            Self::UndefinedArithmetic | Self::ArithmeticOverflow | Self::InfiniteConversion => {
                Some("This is a bug in the caller of the cost arithmetic; please report it.")
            }
            Self::InconsistentInput => Some(
                "Every leaf synteny must be an ordered subsequence of the root synteny; rearranged leaves need the unordered engine.",
            ),
            Self::RootTooLong => Some(
                "The ordered engine enumerates all subsequences of the root; shorten the root synteny or use the unordered engine.",
            ),
            Self::InvalidParameter => {
                Some("Probabilities live in [0, 1]; geometric parameters in (0, 1].")
            }
            Self::GridSpec => {
                Some("Axes accept a value, a set {a,b,c}, or a range [min:max:step].")
            }
            Self::WorkerPool => Some("Lower --jobs or check system thread limits."),
            Self::EvaluationDivergence => Some(
                "The regression guard failed; the diagnostic payload contains both trees. Please report this with the payload.",
            ),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl DomainError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::OppositeInfinities
            | Self::ZeroTimesInfinity
            | Self::UndefinedDivision(_) => ErrorCode::UndefinedArithmetic,
            Self::Overflow => ErrorCode::ArithmeticOverflow,
            Self::InfiniteConversion => ErrorCode::InfiniteConversion,
        }
    }
}

impl ParseError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        ErrorCode::ParseSyntax
    }
}

impl SyntenyError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotASubsequence { .. } => ErrorCode::NotASubsequence,
        }
    }
}

/// Structural violations that make a tree unusable as algorithm input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedTreeError {
    /// An internal node has an arity the algorithms do not accept.
    ///
    /// Internal nodes must have exactly two children; only `Loss` nodes may
    /// be unary, and those are normalized away by erasure before the
    /// engines run.
    #[error("internal node '{synteny}' has {found} children; expected 2")]
    Arity {
        /// Synteny of the offending node (may be empty).
        synteny: String,
        /// Number of children found.
        found: usize,
    },

    /// An internal node carries an event kind the engines cannot process.
    #[error("internal node '{synteny}' has event kind '{kind}'; expected duplication or speciation")]
    InternalEventKind {
        /// Synteny of the offending node (may be empty).
        synteny: String,
        /// The offending kind.
        kind: EventKind,
    },

    /// A leaf carries an event kind that requires children.
    #[error("leaf '{synteny}' carries event kind '{kind}', which requires children")]
    LeafEventKind {
        /// Synteny of the offending leaf.
        synteny: String,
        /// The offending kind.
        kind: EventKind,
    },

    /// An `event` tag holds an unrecognized value.
    #[error("unknown event tag value '{value}'; expected duplication, speciation, or loss")]
    UnknownEventTag {
        /// The unrecognized tag value.
        value: String,
    },

    /// A `segment` tag is not of the form `<u> - <v>`.
    #[error("malformed segment tag '{value}'; expected '<start> - <end>'")]
    InvalidSegmentTag {
        /// The malformed tag value.
        value: String,
    },

    /// A segment does not fit within its node's synteny.
    #[error("segment [{start}, {end}) out of bounds for synteny '{synteny}' of length {length}")]
    SegmentOutOfBounds {
        /// Segment start.
        start: usize,
        /// Segment end (exclusive).
        end: usize,
        /// The node's synteny.
        synteny: String,
        /// Length of that synteny.
        length: usize,
    },
}

impl MalformedTreeError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Arity { .. } => ErrorCode::TreeArity,
            Self::InternalEventKind { .. } => ErrorCode::TreeInternalEvent,
            Self::LeafEventKind { .. } => ErrorCode::TreeLeafEvent,
            Self::UnknownEventTag { .. } => ErrorCode::TreeUnknownEvent,
            Self::InvalidSegmentTag { .. } => ErrorCode::TreeSegmentTag,
            Self::SegmentOutOfBounds { .. } => ErrorCode::TreeSegmentBounds,
        }
    }
}

/// Top-level error for core operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// NHX syntax violation, with location.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Structural violation of the event-tree invariants.
    #[error(transparent)]
    MalformedTree(#[from] MalformedTreeError),

    /// Synteny algebra failure.
    #[error(transparent)]
    Synteny(#[from] SyntenyError),

    /// Undefined extended-arithmetic operation (a programming bug).
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CoreError {
    /// Machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Parse(err) => err.error_code(),
            Self::MalformedTree(err) => err.error_code(),
            Self::Synteny(err) => err.error_code(),
            Self::Domain(err) => err.error_code(),
        }
    }
}
