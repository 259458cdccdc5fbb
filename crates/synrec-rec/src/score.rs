//! The duplication-loss objective and per-kind event tallies.

use std::fmt;

use synrec_core::event::EventKind;
use synrec_core::tree::EventTree;

/// Number of duplication and loss nodes in a tree.
///
/// This is the objective both engines minimize; a reconciliation is only
/// acceptable when its score does not exceed the score of the reference
/// it was erased from.
#[must_use]
pub fn dl_score(tree: &EventTree) -> usize {
    EventCounts::of(tree).dl_score()
}

/// Per-kind node tallies for one tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    /// Duplication nodes.
    pub duplications: usize,
    /// Speciation nodes.
    pub speciations: usize,
    /// Loss nodes (unary wrappers and full-loss leaves alike).
    pub losses: usize,
    /// Observed leaves (kind `none`).
    pub leaves: usize,
}

impl EventCounts {
    /// Tally every live node of `tree`.
    #[must_use]
    pub fn of(tree: &EventTree) -> Self {
        let mut counts = Self::default();
        for node in tree.preorder() {
            match tree.event(node).kind {
                EventKind::Duplication => counts.duplications += 1,
                EventKind::Speciation => counts.speciations += 1,
                EventKind::Loss => counts.losses += 1,
                EventKind::None => counts.leaves += 1,
            }
        }
        counts
    }

    /// The duplication-loss objective.
    #[must_use]
    pub const fn dl_score(&self) -> usize {
        self.duplications + self.losses
    }

    /// Total number of tallied nodes.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.duplications + self.speciations + self.losses + self.leaves
    }
}

impl fmt::Display for EventCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} duplications, {} speciations, {} losses, {} leaves",
            self.duplications, self.speciations, self.losses, self.leaves
        )
    }
}
