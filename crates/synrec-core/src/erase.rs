//! Erasure: canonicalize a fully-labeled reference tree into a valid
//! reconciliation input.
//!
//! A simulated reference tree labels every node with its true synteny and
//! reifies losses as unary nodes. The reconciliation engines must not see
//! any of that: they require internal syntenies to be unknown, losses to
//! be leaves, and only the root and leaf syntenies to survive. Erasure is
//! destructive and idempotent.

use crate::event::EventKind;
use crate::synteny::{Segment, Synteny};
use crate::tree::{EventTree, NodeId};

/// Strip internal labels and collapse cascaded loss chains, in place.
///
/// After the call:
///
/// - the root synteny and every leaf synteny are preserved,
/// - every other synteny is empty,
/// - every `Loss` node is a leaf with an empty synteny,
/// - no segment annotation remains.
pub fn erase_tree(tree: &mut EventTree) {
    erase_node(tree, tree.root(), true);
}

fn erase_node(tree: &mut EventTree, node: NodeId, is_root: bool) {
    match tree.event(node).kind {
        EventKind::None => {}
        EventKind::Loss => {
            if tree.number_of_children(node) == 1 {
                // A cascaded loss: the child takes this node's position and
                // is then erased under the usual rules.
                tree.flatten(node);
                erase_node(tree, node, false);
            } else {
                let event = tree.event_mut(node);
                event.synteny = Synteny::empty();
                event.segment = Segment::NONE;
            }
        }
        EventKind::Duplication | EventKind::Speciation => {
            {
                let event = tree.event_mut(node);
                if !is_root {
                    event.synteny = Synteny::empty();
                }
                event.segment = Segment::NONE;
            }
            let children = tree.children(node).to_vec();
            for child in children {
                erase_node(tree, child, false);
            }
        }
    }
}
