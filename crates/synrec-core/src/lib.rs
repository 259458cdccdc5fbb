#![forbid(unsafe_code)]
//! Core data model for synteny super-reconciliation.
//!
//! This crate owns everything the reconciliation engines share: gene
//! families and syntenies with their segmental-loss algebra, extended
//! integer costs, the arena event tree with its local rewrites, erasure
//! of labeled reference trees, the NHX text format, and Graphviz
//! rendering. It performs no I/O and emits no log output; all failures
//! surface as typed errors.

pub mod cost;
pub mod erase;
pub mod error;
pub mod event;
pub mod gene;
pub mod nhx;
pub mod synteny;
pub mod translate;
pub mod tree;
pub mod viz;

pub use cost::Cost;
pub use error::{CoreError, ErrorCode};
pub use event::{Event, EventKind};
pub use gene::{Gene, GeneDict};
pub use synteny::{Segment, Synteny};
pub use tree::{EventTree, NodeId};

use error::MalformedTreeError;

/// Parse NHX text straight into an event tree.
///
/// # Errors
///
/// [`CoreError::Parse`] on NHX syntax violations and
/// [`CoreError::MalformedTree`] on translation failures.
pub fn parse_tree(text: &str) -> Result<EventTree, CoreError> {
    let tagged = nhx::parse(text)?;
    Ok(translate::tree_from_tagged(&tagged)?)
}

/// Serialize an event tree to NHX text.
#[must_use]
pub fn write_tree(tree: &EventTree) -> String {
    nhx::write(&translate::tree_to_tagged(tree))
}

/// Check the shape the reconciliation engines require: every internal node
/// has exactly two children and carries a duplication or speciation event.
///
/// # Errors
///
/// [`MalformedTreeError`] naming the offending node.
pub fn check_binary_events(tree: &EventTree) -> Result<(), MalformedTreeError> {
    for node in tree.preorder() {
        let event = tree.event(node);
        if tree.is_leaf(node) {
            continue;
        }
        if tree.number_of_children(node) != 2 {
            return Err(MalformedTreeError::Arity {
                synteny: event.synteny.to_string(),
                found: tree.number_of_children(node),
            });
        }
        if !matches!(
            event.kind,
            EventKind::Duplication | EventKind::Speciation
        ) {
            return Err(MalformedTreeError::InternalEventKind {
                synteny: event.synteny.to_string(),
                kind: event.kind,
            });
        }
    }
    Ok(())
}
