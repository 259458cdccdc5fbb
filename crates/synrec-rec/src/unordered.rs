//! Unordered super-reconciliation.
//!
//! When gene order within syntenies is unknown, the assignment problem
//! collapses to sets: each node receives a *set* of gene families (and an
//! arbitrary but consistent linear order) minimizing the same
//! duplication-loss objective. Three passes over a per-node record
//! `{ genes, should_propagate }` suffice:
//!
//! 1. **Initialize** (postorder): leaves take their observed gene sets;
//!    internal nodes take the union of their children, and are marked
//!    propagable when their children's sets demonstrably undershoot the
//!    true ancestral content (both strictly smaller, loss children under
//!    a duplication, or two loss-like children).
//! 2. **Propagate** (preorder): a propagable child inherits its parent's
//!    set, cascading root-down.
//! 3. **Resolve** (postorder): partition each node's set against its
//!    children into the four disjoint pieces `S1 = L ∩ R`, `S2 = L \ R`,
//!    `S3 = v \ (L ∪ R)`, `S4 = R \ L`, lay the synteny out as
//!    `S1·S2·S3·S4` (ascending gene id inside each piece), and insert the
//!    loss nodes and duplication segments that account for the
//!    differences.
//!
//! Gene sets are [`GeneSet`] bit sets over a per-tree gene dictionary, so
//! the set algebra is linear merges without hashing.

use synrec_core::check_binary_events;
use synrec_core::error::MalformedTreeError;
use synrec_core::event::{Event, EventKind};
use synrec_core::gene::GeneDict;
use synrec_core::synteny::{Segment, Synteny};
use synrec_core::tree::{EventTree, NodeId};

use crate::error::ReconcileError;
use crate::gene_set::GeneSet;

/// Run the unordered engine in place.
///
/// On success every edge satisfies `genes(parent) ⊇ genes(child)`, every
/// loss node carries its parent's synteny with an in-bounds non-empty
/// segment, and every duplication's segment covers the copy handed to one
/// child. Unlike the ordered engine, the root synteny is *inferred*: any
/// synteny present on the input root is replaced.
///
/// # Errors
///
/// [`ReconcileError::MalformedTree`] on unary internal nodes or internal
/// `loss`/unlabeled events.
pub fn reconcile_unordered(tree: &mut EventTree) -> Result<(), ReconcileError> {
    check_binary_events(tree)?;

    let dict = build_dictionary(tree);
    let width = dict.len();
    let mut genes: Vec<GeneSet> = vec![GeneSet::with_width(width); tree.capacity()];
    let mut propagable = vec![false; tree.capacity()];

    initialize(tree, &dict, &mut genes, &mut propagable)?;
    propagate(tree, &mut genes, &propagable);
    resolve(tree, &dict, &genes)?;
    Ok(())
}

/// Gene ids are issued in lexicographic token order, which fixes the
/// element order used inside every resolved piece.
fn build_dictionary(tree: &EventTree) -> GeneDict {
    let nodes = tree.preorder();
    let genes = nodes
        .iter()
        .flat_map(|node| tree.event(*node).synteny.genes());
    GeneDict::from_genes(genes)
}

/// Pass 1 — initialize gene sets bottom-up and mark propagable nodes.
fn initialize(
    tree: &EventTree,
    dict: &GeneDict,
    genes: &mut [GeneSet],
    propagable: &mut [bool],
) -> Result<(), ReconcileError> {
    for node in tree.postorder() {
        let index = node.index();
        if tree.is_leaf(node) {
            genes[index] = GeneSet::from_synteny(&tree.event(node).synteny, dict);
            continue;
        }

        let &[left, right] = tree.children(node) else {
            return Err(MalformedTreeError::Arity {
                synteny: tree.event(node).synteny.to_string(),
                found: tree.number_of_children(node),
            }
            .into());
        };

        let union = genes[left.index()].union(&genes[right.index()]);

        let left_smaller = genes[left.index()] != union;
        let right_smaller = genes[right.index()] != union;
        let left_lossy =
            tree.event(left).kind == EventKind::Loss || propagable[left.index()];
        let right_lossy =
            tree.event(right).kind == EventKind::Loss || propagable[right.index()];
        let is_duplication = tree.event(node).kind == EventKind::Duplication;

        propagable[index] = (left_smaller && right_smaller)
            || (propagable[left.index()] && propagable[right.index()])
            || (is_duplication && (left_lossy || right_lossy))
            || (left_lossy && right_lossy);
        genes[index] = union;
    }
    Ok(())
}

/// Pass 2 — copy parent sets into propagable children, root-down.
fn propagate(tree: &EventTree, genes: &mut [GeneSet], propagable: &[bool]) {
    for node in tree.preorder() {
        for child in tree.children(node).to_vec() {
            if propagable[child.index()] {
                genes[child.index()] = genes[node.index()].clone();
            }
        }
    }
}

/// Pass 3 — lay out syntenies and account for every set difference with a
/// loss node or a duplication segment.
fn resolve(
    tree: &mut EventTree,
    dict: &GeneDict,
    genes: &[GeneSet],
) -> Result<(), ReconcileError> {
    for node in tree.postorder() {
        if tree.is_leaf(node) {
            continue;
        }
        if genes[node.index()].is_empty() {
            // Nothing survives below this point: the whole subtree is one
            // full loss.
            tree.remove_children(node);
            let event = tree.event_mut(node);
            event.kind = EventKind::Loss;
            event.synteny = Synteny::empty();
            event.segment = Segment::NONE;
            continue;
        }
        resolve_internal(tree, dict, genes, node)?;
    }
    Ok(())
}

fn resolve_internal(
    tree: &mut EventTree,
    dict: &GeneDict,
    genes: &[GeneSet],
    node: NodeId,
) -> Result<(), ReconcileError> {
    let &[left, right] = tree.children(node) else {
        unreachable!("shape was validated before the passes ran");
    };
    let own = &genes[node.index()];
    let l = &genes[left.index()];
    let r = &genes[right.index()];

    // The four disjoint pieces, each in ascending gene-id order.
    let s1 = l.shared_ids(r);
    let s2 = l.exclusive_ids(r);
    let s4 = r.exclusive_ids(l);
    let s3 = own.exclusive_ids(&l.union(r));

    let synteny: Synteny = s1
        .iter()
        .chain(&s2)
        .chain(&s3)
        .chain(&s4)
        .map(|id| dict.gene(*id).clone())
        .collect();
    let (c1, c2, c3, c4) = (s1.len(), s2.len(), s3.len(), s4.len());
    let total = c1 + c2 + c3 + c4;

    {
        let event = tree.event_mut(node);
        event.synteny = synteny.clone();
        event.segment = Segment::NONE;
    }

    let is_duplication = tree.event(node).kind == EventKind::Duplication;
    let left_is_loss = tree.event(left).kind == EventKind::Loss;
    let right_is_loss = tree.event(right).kind == EventKind::Loss;

    // The left target S1·S2 differs from the node synteny: either the
    // duplication copies exactly that prefix, or the left edge loses the
    // tail S3·S4.
    let mut segmental_left = false;
    if c3 + c4 > 0 && !left_is_loss {
        if is_duplication {
            tree.event_mut(node).segment = Segment::new(0, c1 + c2);
            segmental_left = true;
        } else {
            let mut loss = Event::new(EventKind::Loss, synteny.clone());
            loss.segment = Segment::new(c1 + c2, total);
            tree.wrap(left, loss);
        }
    }

    if is_duplication && !segmental_left {
        // The copy must cover the right target S1·S4 exactly.
        let segment = if left_is_loss {
            Segment::new(c1 + c2 + c3, total)
        } else {
            Segment::new(0, c1)
        };
        tree.event_mut(node).segment = segment;
    } else if c2 + c3 > 0 && !right_is_loss {
        // The right target S1·S4 differs: the right edge loses S2·S3.
        let mut loss = Event::new(EventKind::Loss, synteny.clone());
        loss.segment = Segment::new(c1, c1 + c2 + c3);
        tree.wrap(right, loss);
    }

    // Full-loss children lose this node's synteny in its entirety.
    if left_is_loss {
        let event = tree.event_mut(left);
        event.synteny = synteny.clone();
        event.segment = Segment::new(0, total);
    }
    if right_is_loss {
        let event = tree.event_mut(right);
        event.synteny = synteny;
        event.segment = Segment::new(0, total);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use synrec_core::parse_tree;

    use crate::score::dl_score;

    #[test]
    fn identical_leaves_need_no_events() {
        let mut tree =
            parse_tree("(a b,b a)[&&NHX:event=speciation];").expect("parse");
        reconcile_unordered(&mut tree).expect("reconcile");
        // Gene order differs but the sets agree: no losses, root inferred.
        assert_eq!(dl_score(&tree), 0);
        assert_eq!(
            tree.event(tree.root()).synteny,
            "a b".parse().expect("synteny")
        );
    }

    #[test]
    fn a_missing_gene_on_one_side_becomes_one_loss() {
        let mut tree = parse_tree("(a b c,a c)[&&NHX:event=speciation];").expect("parse");
        reconcile_unordered(&mut tree).expect("reconcile");

        assert_eq!(dl_score(&tree), 1);
        // Root = S1·S2: shared {a, c} first, then the left-only {b}.
        assert_eq!(
            tree.event(tree.root()).synteny,
            "a c b".parse().expect("synteny")
        );
        let wrapper = tree.child(tree.root(), 1).expect("right edge");
        assert_eq!(tree.event(wrapper).kind, EventKind::Loss);
        assert_eq!(tree.event(wrapper).segment, Segment::new(2, 3));
    }

    #[test]
    fn duplication_with_a_smaller_child_is_segmental() {
        let mut tree = parse_tree("(a b c,b)[&&NHX:event=duplication];").expect("parse");
        reconcile_unordered(&mut tree).expect("reconcile");

        // The right child is the segmental copy of the shared prefix S1.
        assert_eq!(dl_score(&tree), 1);
        let root = tree.root();
        assert_eq!(tree.event(root).synteny, "b a c".parse().expect("synteny"));
        assert_eq!(tree.event(root).segment, Segment::new(0, 1));
    }

    #[test]
    fn two_loss_children_inherit_the_parent_content() {
        // Both children of the inner speciation are loss leaves, so the
        // inner node is propagable: it inherits the root's content and its
        // losses become full losses of "a".
        let mut tree = parse_tree(
            "((,)[&&NHX:event=speciation],a)[&&NHX:event=speciation];",
        )
        .expect("parse");
        reconcile_unordered(&mut tree).expect("reconcile");

        let inner = tree.child(tree.root(), 0).expect("left child");
        assert_eq!(tree.event(inner).kind, EventKind::Speciation);
        assert_eq!(tree.event(inner).synteny, "a".parse().expect("synteny"));
        for child in tree.children(inner).to_vec() {
            assert_eq!(tree.event(child).kind, EventKind::Loss);
            assert_eq!(tree.event(child).synteny, "a".parse().expect("synteny"));
            assert_eq!(tree.event(child).segment, Segment::new(0, 1));
        }
        assert_eq!(dl_score(&tree), 2);
    }

    #[test]
    fn an_all_loss_tree_collapses_into_a_single_loss_root() {
        let mut tree = parse_tree("(,)[&&NHX:event=speciation];").expect("parse");
        reconcile_unordered(&mut tree).expect("reconcile");

        assert!(tree.is_leaf(tree.root()));
        assert_eq!(tree.event(tree.root()).kind, EventKind::Loss);
        assert!(tree.event(tree.root()).synteny.is_empty());
        assert_eq!(dl_score(&tree), 1);
    }

    #[test]
    fn parent_sets_contain_child_sets_on_every_edge() {
        let mut tree = parse_tree(
            "((a b,c)[&&NHX:event=speciation],(b c,a)[&&NHX:event=duplication])[&&NHX:event=speciation];",
        )
        .expect("parse");
        reconcile_unordered(&mut tree).expect("reconcile");

        for node in tree.preorder() {
            let parent_genes: std::collections::BTreeSet<String> = tree
                .event(node)
                .synteny
                .genes()
                .iter()
                .map(ToString::to_string)
                .collect();
            for child in tree.children(node) {
                let child_genes: std::collections::BTreeSet<String> = tree
                    .event(*child)
                    .synteny
                    .genes()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                assert!(
                    child_genes.is_subset(&parent_genes),
                    "edge {parent_genes:?} -> {child_genes:?}"
                );
            }
        }
    }

    #[test]
    fn unary_internal_nodes_are_rejected() {
        let mut tree =
            parse_tree("((a)[&&NHX:event=speciation],a)[&&NHX:event=speciation];").expect("parse");
        assert!(matches!(
            reconcile_unordered(&mut tree),
            Err(ReconcileError::MalformedTree { .. })
        ));
    }

    // ----------------------------------------------------------------
    // Propagation-marking rules (pass 1), observed through pass 3.
    // ----------------------------------------------------------------

    #[test]
    fn both_children_strictly_smaller_marks_propagable() {
        // inner = spec({a}, {b}) sits under a root whose other side shows
        // {a, b, c}; since both of inner's children undershoot its union,
        // inner inherits the full root content.
        let mut tree = parse_tree(
            "((a,b)[&&NHX:event=speciation],a b c)[&&NHX:event=speciation];",
        )
        .expect("parse");
        reconcile_unordered(&mut tree).expect("reconcile");

        let inner = tree.child(tree.root(), 0).expect("inner");
        assert_eq!(
            tree.event(inner).synteny.genes().len(),
            3,
            "inner must inherit the full ancestral content"
        );
    }

    #[test]
    fn one_full_child_blocks_propagation_under_a_speciation() {
        // inner = spec({a, b}, {a}): the left child already carries the
        // whole union, so inner is not propagable and keeps {a, b} even
        // though the root holds {a, b, c}.
        let mut tree = parse_tree(
            "((a b,a)[&&NHX:event=speciation],a b c)[&&NHX:event=speciation];",
        )
        .expect("parse");
        reconcile_unordered(&mut tree).expect("reconcile");

        let wrapper = tree.child(tree.root(), 0).expect("inner edge");
        assert_eq!(tree.event(wrapper).kind, EventKind::Loss);
        let inner = tree.child(wrapper, 0).expect("inner");
        assert_eq!(
            tree.event(inner).synteny,
            "a b".parse().expect("synteny"),
            "a non-propagable node keeps its leaf-derived content"
        );
    }

    #[test]
    fn a_duplication_with_a_loss_child_is_propagable() {
        // dup({a}, loss) under a root showing {a, b}: the duplication
        // inherits {a, b} and absorbs the difference segmentally.
        let mut tree = parse_tree(
            "((a,)[&&NHX:event=duplication],a b)[&&NHX:event=speciation];",
        )
        .expect("parse");
        reconcile_unordered(&mut tree).expect("reconcile");

        let dup = tree.child(tree.root(), 0).expect("duplication");
        assert_eq!(tree.event(dup).kind, EventKind::Duplication);
        assert_eq!(tree.event(dup).synteny, "a b".parse().expect("synteny"));
        assert_eq!(tree.event(dup).segment, Segment::new(0, 1));
    }

    #[test]
    fn a_speciation_with_one_loss_child_is_not_propagable() {
        // spec({a}, loss) under a root showing {a, b}: one loss-like
        // child alone does not mark a speciation, so the inner node keeps
        // {a} and the missing {b} is paid on its incoming edge.
        let mut tree = parse_tree(
            "((a,)[&&NHX:event=speciation],a b)[&&NHX:event=speciation];",
        )
        .expect("parse");
        reconcile_unordered(&mut tree).expect("reconcile");

        let wrapper = tree.child(tree.root(), 0).expect("inner edge");
        assert_eq!(tree.event(wrapper).kind, EventKind::Loss);
        let inner = tree.child(wrapper, 0).expect("inner");
        assert_eq!(tree.event(inner).synteny, "a".parse().expect("synteny"));
    }

    #[test]
    fn propagation_cascades_through_nested_propagable_nodes() {
        // Two nested propagable speciations: the parent's inherited
        // content flows down to the grandchild level in one preorder
        // sweep.
        let mut tree = parse_tree(
            "(((a,b)[&&NHX:event=speciation],(b,c)[&&NHX:event=speciation])[&&NHX:event=speciation],a b c d)[&&NHX:event=speciation];",
        )
        .expect("parse");
        reconcile_unordered(&mut tree).expect("reconcile");

        let outer = tree.child(tree.root(), 0).expect("outer");
        assert_eq!(
            tree.event(outer).synteny.genes().len(),
            4,
            "outer inherits all four families"
        );
        for child in tree.children(outer).to_vec() {
            let node = if tree.event(child).kind == EventKind::Loss {
                tree.child(child, 0).expect("wrapped child")
            } else {
                child
            };
            assert_eq!(
                tree.event(node).synteny.genes().len(),
                4,
                "nested propagable nodes inherit the same content"
            );
        }
    }
}
