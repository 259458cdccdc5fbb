//! Root-to-leaf traceback: assign syntenies, set duplication segments,
//! and reify inferred losses as explicit loss nodes.

use synrec_core::cost::Cost;
use synrec_core::event::{Event, EventKind};
use synrec_core::synteny::{Segment, Synteny};
use synrec_core::tree::{EventTree, NodeId};

use super::dp::Tables;
use crate::error::ReconcileError;

/// Propagate the recorded optimal choices from the root down.
pub(crate) fn apply(tree: &mut EventTree, tables: &Tables) -> Result<(), ReconcileError> {
    apply_node(tree, tables, tree.root(), tables.full_mask())
}

fn apply_node(
    tree: &mut EventTree,
    tables: &Tables,
    node: NodeId,
    mask: usize,
) -> Result<(), ReconcileError> {
    if tree.is_leaf(node) {
        // Leaves keep their observed synteny; the DP only admitted the
        // matching candidate.
        return Ok(());
    }

    let candidate = tables.candidate(mask).clone();
    let choice = tables.choice(node, mask);
    tree.event_mut(node).synteny = candidate.clone();

    let &[left, right] = tree.children(node) else {
        unreachable!("shape was validated before the DP ran");
    };

    // A duplication with no segmental child copies its whole synteny.
    if tree.event(node).kind == EventKind::Duplication
        && !choice.partial_left
        && !choice.partial_right
    {
        tree.event_mut(node).segment = Segment::new(0, candidate.len());
    }

    let left_target = tables.candidate(choice.left).clone();
    let right_target = tables.candidate(choice.right).clone();
    reify_edge(tree, node, left, &left_target, choice.partial_left)?;
    reify_edge(tree, node, right, &right_target, choice.partial_right)?;

    if !left_target.is_empty() {
        tree.event_mut(left).synteny = left_target;
        apply_node(tree, tables, left, choice.left)?;
    }
    if !right_target.is_empty() {
        tree.event_mut(right).synteny = right_target;
        apply_node(tree, tables, right, choice.right)?;
    }
    Ok(())
}

/// Rewrite one parent→child edge so that each inserted loss node removes
/// exactly one segment.
///
/// For a segmental (partial) child, the duplication's segment is set to
/// the span of the parent synteny that covers the kept subsequence —
/// prefix and suffix losses are absorbed by the copy boundary — and only
/// the internal losses are reified. An empty target turns the child into
/// a full loss carrying the parent's synteny.
fn reify_edge(
    tree: &mut EventTree,
    parent: NodeId,
    child: NodeId,
    target: &Synteny,
    partial: bool,
) -> Result<(), ReconcileError> {
    let parent_synteny = tree.event(parent).synteny.clone();

    if target.is_empty() {
        tree.remove_children(child);
        let event = tree.event_mut(child);
        event.kind = EventKind::Loss;
        event.synteny = parent_synteny.clone();
        event.segment = if parent_synteny.is_empty() {
            Segment::NONE
        } else {
            Segment::new(0, parent_synteny.len())
        };
        return Ok(());
    }

    let mut current = parent_synteny;
    if partial {
        let runs = current.reconcile(target, false, Cost::PosInf)?;
        let span_start = runs
            .first()
            .filter(|run| run.start == 0)
            .map_or(0, |run| run.end);
        let span_end = runs
            .last()
            .filter(|run| run.end == current.len())
            .map_or(current.len(), |run| run.start);
        let span = Segment::new(span_start, span_end);
        tree.event_mut(parent).segment = span;
        current = current.slice(span);
    }

    loop {
        let runs = current.reconcile(target, false, Cost::Finite(1))?;
        let Some(&segment) = runs.first() else {
            break;
        };
        let mut loss = Event::new(EventKind::Loss, current.clone());
        loss.segment = segment;
        tree.wrap(child, loss);
        current = current.remove_segment(segment);
    }
    Ok(())
}
