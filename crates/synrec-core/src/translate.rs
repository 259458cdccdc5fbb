//! Translation between the NHX text layer and event trees.
//!
//! The text layer ([`crate::nhx`]) is deliberately ignorant of events;
//! this module owns the mapping contract:
//!
//! - `name` is the synteny as whitespace-separated gene tokens;
//! - the `event` tag is `duplication`, `speciation`, or `loss`, and is
//!   absent on observed leaves;
//! - an empty-name leaf without an `event` tag is a full-loss leaf;
//! - the `segment` tag is `<start> - <end>`;
//! - a duplication without a `segment` tag covers its whole synteny.
//!
//! # Segment interval format
//!
//! Historical releases wrote segments as closed intervals while reading
//! them back half-open, an off-by-one carried for compatibility. This
//! implementation normalizes: output is half-open and the root carries a
//! `segfmt=2` tag; input with that tag is read half-open, input without it
//! is read with the legacy closed rule (`"u - v"` meaning `[u, v+1)`).
//!
//! Branch lengths survive at the [`TaggedNode`] layer only; events do not
//! carry them, so trees that pass through an engine are emitted without
//! lengths.

use crate::error::MalformedTreeError;
use crate::event::{Event, EventKind};
use crate::nhx::TaggedNode;
use crate::synteny::{Segment, Synteny};
use crate::tree::{EventTree, NodeId};

/// Tag holding the event kind.
pub const EVENT_TAG: &str = "event";
/// Tag holding the segment interval.
pub const SEGMENT_TAG: &str = "segment";
/// Root tag announcing the segment interval convention.
pub const SEGMENT_FORMAT_TAG: &str = "segfmt";
/// Current (half-open) segment convention.
pub const SEGMENT_FORMAT_VERSION: &str = "2";

/// Build an event tree from a parsed NHX tree.
///
/// # Errors
///
/// [`MalformedTreeError`] on unknown event tags, malformed or
/// out-of-bounds segments, or leaves tagged with a branching event.
pub fn tree_from_tagged(root: &TaggedNode) -> Result<EventTree, MalformedTreeError> {
    let half_open = root.tag(SEGMENT_FORMAT_TAG) == Some(SEGMENT_FORMAT_VERSION);
    let mut tree = EventTree::new(node_event(root, half_open)?);
    let root_id = tree.root();
    for child in &root.children {
        attach(&mut tree, root_id, child, half_open)?;
    }
    Ok(tree)
}

fn attach(
    tree: &mut EventTree,
    parent: NodeId,
    node: &TaggedNode,
    half_open: bool,
) -> Result<(), MalformedTreeError> {
    let id = tree.add_child(parent, node_event(node, half_open)?);
    for child in &node.children {
        attach(tree, id, child, half_open)?;
    }
    Ok(())
}

fn node_event(node: &TaggedNode, half_open: bool) -> Result<Event, MalformedTreeError> {
    let synteny: Synteny = node.name.parse().unwrap_or_default();
    let is_leaf = node.children.is_empty();

    let kind = match node.tag(EVENT_TAG) {
        Some("duplication") => EventKind::Duplication,
        Some("speciation") => EventKind::Speciation,
        Some("loss") => EventKind::Loss,
        Some(value) => {
            return Err(MalformedTreeError::UnknownEventTag {
                value: value.to_owned(),
            });
        }
        // An unnamed leaf stands for a lineage that lost everything.
        None if is_leaf && synteny.is_empty() => EventKind::Loss,
        None => EventKind::None,
    };

    if is_leaf && matches!(kind, EventKind::Duplication | EventKind::Speciation) {
        return Err(MalformedTreeError::LeafEventKind {
            synteny: synteny.to_string(),
            kind,
        });
    }

    let segment = match kind {
        EventKind::Duplication | EventKind::Loss => match node.tag(SEGMENT_TAG) {
            Some(value) => parse_segment(value, half_open, &synteny)?,
            None if kind == EventKind::Duplication => Segment::new(0, synteny.len()),
            None => Segment::NONE,
        },
        // Segments only interpret under duplications and losses.
        EventKind::None | EventKind::Speciation => Segment::NONE,
    };

    Ok(Event {
        kind,
        synteny,
        segment,
    })
}

fn parse_segment(
    value: &str,
    half_open: bool,
    synteny: &Synteny,
) -> Result<Segment, MalformedTreeError> {
    let malformed = || MalformedTreeError::InvalidSegmentTag {
        value: value.to_owned(),
    };
    let (left, right) = value.split_once('-').ok_or_else(malformed)?;
    let start: usize = left.trim().parse().map_err(|_| malformed())?;
    let bound: usize = right.trim().parse().map_err(|_| malformed())?;
    let end = if half_open { bound } else { bound + 1 };

    if start > end || end > synteny.len() {
        return Err(MalformedTreeError::SegmentOutOfBounds {
            start,
            end,
            synteny: synteny.to_string(),
            length: synteny.len(),
        });
    }
    Ok(Segment { start, end })
}

/// Serialize an event tree back to the tagged text model.
///
/// The root is stamped with `segfmt=2`; segments are emitted only for
/// duplications and losses with a non-empty synteny.
#[must_use]
pub fn tree_to_tagged(tree: &EventTree) -> TaggedNode {
    let mut root = tagged_node(tree, tree.root());
    root.push_tag(SEGMENT_FORMAT_TAG, SEGMENT_FORMAT_VERSION);
    root
}

fn tagged_node(tree: &EventTree, node: NodeId) -> TaggedNode {
    let event = tree.event(node);
    let mut tagged = TaggedNode::leaf(event.synteny.to_string());

    if event.kind != EventKind::None {
        tagged.push_tag(EVENT_TAG, event.kind.to_string());
    }
    if event.kind.is_scored() && !event.synteny.is_empty() && !event.segment.is_empty() {
        tagged.push_tag(
            SEGMENT_TAG,
            format!("{} - {}", event.segment.start, event.segment.end),
        );
    }

    tagged.children = tree
        .children(node)
        .iter()
        .map(|child| tagged_node(tree, *child))
        .collect();
    tagged
}
