//! Evolutionary event records carried by tree nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::synteny::{Segment, Synteny};

/// Kind of evolutionary event at a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// No event: an observed (extant) synteny at a leaf, or an unlabeled
    /// node.
    #[default]
    None,
    /// A duplication producing two copies; at most one copy is segmental.
    Duplication,
    /// A speciation producing two lineages with the same synteny.
    Speciation,
    /// A segmental loss along one branch.
    Loss,
}

impl EventKind {
    /// True for the kinds counted by the duplication-loss score.
    #[must_use]
    pub const fn is_scored(self) -> bool {
        matches!(self, Self::Duplication | Self::Loss)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::None => "none",
            Self::Duplication => "duplication",
            Self::Speciation => "speciation",
            Self::Loss => "loss",
        };
        f.write_str(text)
    }
}

/// The full payload of a tree node.
///
/// `segment` interprets according to `kind`: for a duplication it is the
/// duplicated interval of this node's synteny, for a loss the lost
/// interval, and [`Segment::NONE`] otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event kind.
    pub kind: EventKind,
    /// Inferred or observed synteny at this node.
    pub synteny: Synteny,
    /// Highlighted interval within `synteny`; see the type docs.
    pub segment: Segment,
}

impl Event {
    /// An event with the given kind and synteny and no segment.
    #[must_use]
    pub const fn new(kind: EventKind, synteny: Synteny) -> Self {
        Self {
            kind,
            synteny,
            segment: Segment::NONE,
        }
    }

    /// An observed leaf carrying `synteny`.
    #[must_use]
    pub const fn leaf(synteny: Synteny) -> Self {
        Self::new(EventKind::None, synteny)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.synteny)?;
        if !self.segment.is_empty() {
            write!(f, " {}", self.segment)?;
        }
        Ok(())
    }
}
