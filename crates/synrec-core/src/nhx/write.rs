//! NHX writer: the inverse of [`super::parse`].

use std::fmt::Write as _;

use super::TaggedNode;

/// Serialize a tree to NHX text, terminated by `;`.
///
/// Names, lengths, and tags are emitted verbatim in stored order, so
/// `write(&parse(text)?) == text` for any canonically spaced input.
#[must_use]
pub fn write(root: &TaggedNode) -> String {
    let mut out = String::new();
    write_node(root, &mut out);
    out.push(';');
    out
}

fn write_node(node: &TaggedNode, out: &mut String) {
    if !node.children.is_empty() {
        out.push('(');
        for (position, child) in node.children.iter().enumerate() {
            if position > 0 {
                out.push(',');
            }
            write_node(child, out);
        }
        out.push(')');
    }
    out.push_str(&node.name);
    if let Some(length) = &node.length {
        let _ = write!(out, ":{length}");
    }
    if !node.tags.is_empty() {
        out.push_str("[&&NHX");
        for (key, value) in &node.tags {
            let _ = write!(out, ":{key}={value}");
        }
        out.push(']');
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;

    #[test]
    fn writes_leaves_children_lengths_and_tags() {
        let mut root = TaggedNode::leaf("r");
        root.children.push(TaggedNode::leaf("a b"));
        let mut second = TaggedNode::leaf("c");
        second.length = Some("0.5".to_owned());
        second.push_tag("event", "loss");
        second.push_tag("segment", "1 - 2");
        root.children.push(second);

        assert_eq!(write(&root), "(a b,c:0.5[&&NHX:event=loss:segment=1 - 2])r;");
    }

    #[test]
    fn empty_leaf_writes_as_bare_terminator() {
        assert_eq!(write(&TaggedNode::default()), ";");
    }

    #[test]
    fn parse_write_round_trip() {
        let text = "((,x)n[&&NHX:event=duplication:segment=0 - 1],y:2)a b:3;";
        let tree = parse(text).expect("parse");
        assert_eq!(write(&tree), text);
    }
}
