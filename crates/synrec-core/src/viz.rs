//! Graphviz DOT rendering of event trees.

use std::fmt::Write as _;

use crate::event::{Event, EventKind};
use crate::tree::EventTree;

/// Render a tree as a Graphviz `digraph`.
///
/// Each node is a box showing the event kind and the synteny with the
/// active segment bracketed; losses are dashed, duplications filled.
#[must_use]
pub fn to_dot(tree: &EventTree) -> String {
    let mut out = String::from("digraph event_tree {\n");
    out.push_str("    node [shape=box, fontname=\"monospace\"];\n");

    for node in tree.preorder() {
        let event = tree.event(node);
        let _ = write!(
            out,
            "    n{} [label=\"{}\"{}];\n",
            node.index(),
            escape(&node_label(event)),
            node_style(event.kind)
        );
    }
    for node in tree.preorder() {
        for child in tree.children(node) {
            let _ = writeln!(out, "    n{} -> n{};", node.index(), child.index());
        }
    }

    out.push_str("}\n");
    out
}

fn node_style(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Duplication => ", style=filled, fillcolor=lightgrey",
        EventKind::Loss => ", style=dashed",
        EventKind::None | EventKind::Speciation => "",
    }
}

fn node_label(event: &Event) -> String {
    let synteny = if event.synteny.is_empty() {
        "-".to_owned()
    } else {
        marked_synteny(event)
    };
    match event.kind {
        EventKind::None => synteny,
        kind => format!("{kind}\n{synteny}"),
    }
}

/// The synteny with the active segment bracketed, e.g. `x [x' x'']`.
fn marked_synteny(event: &Event) -> String {
    if !event.kind.is_scored() || event.segment.is_empty() {
        return event.synteny.to_string();
    }
    let mut pieces = Vec::with_capacity(event.synteny.len());
    for (position, gene) in event.synteny.genes().iter().enumerate() {
        let mut piece = gene.to_string();
        if position == event.segment.start {
            piece.insert(0, '[');
        }
        if position + 1 == event.segment.end {
            piece.push(']');
        }
        pieces.push(piece);
    }
    pieces.join(" ")
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synteny::Segment;
    use crate::tree::EventTree;

    #[test]
    fn renders_nodes_edges_and_segment_brackets() {
        let mut root = Event::new(EventKind::Duplication, "x x' x''".parse().expect("synteny"));
        root.segment = Segment::new(1, 3);
        let mut tree = EventTree::new(root);
        tree.add_child(tree.root(), Event::leaf("x".parse().expect("synteny")));
        let mut loss = Event::new(EventKind::Loss, "x x' x''".parse().expect("synteny"));
        loss.segment = Segment::new(0, 3);
        tree.add_child(tree.root(), loss);

        let dot = to_dot(&tree);
        assert!(dot.starts_with("digraph event_tree {"));
        assert!(dot.contains("duplication\\nx [x' x'']"));
        assert!(dot.contains("loss\\n[x x' x'']"));
        assert!(dot.contains("style=dashed"));
        assert!(dot.contains("n0 -> n1;"));
        assert!(dot.contains("n0 -> n2;"));
    }

    #[test]
    fn empty_synteny_renders_as_a_dash() {
        let tree = EventTree::new(Event::new(EventKind::Loss, crate::synteny::Synteny::empty()));
        let dot = to_dot(&tree);
        assert!(dot.contains("loss\\n-"));
    }

    #[test]
    fn quotes_in_gene_names_are_escaped() {
        let tree = EventTree::new(Event::leaf("a\"b".parse().expect("synteny")));
        let dot = to_dot(&tree);
        assert!(dot.contains("a\\\"b"));
    }
}
