//! Ordered super-reconciliation.
//!
//! Given a binary event tree whose root carries the ancestral synteny,
//! whose internal nodes are labeled `duplication` or `speciation`, and
//! whose leaves carry observed syntenies, assign an ordered synteny to
//! every internal node so that the total number of segmental duplications
//! plus segmental losses is minimal, then insert explicit loss nodes so
//! that every parent→child difference is exactly one lost segment per
//! loss node.
//!
//! # Recurrence
//!
//! With `candidates(A)` the ordered subsequences of the root synteny `A`
//! and, for a node `v` with children `L, R` and candidate `X`:
//!
//! ```text
//! bestTotal(c)   = min over Y ⊆ X of lossTotal(X, Y)   + cost(c, Y)
//! bestPartial(c) = min over non-empty Y ⊆ X of lossPartial(X, Y) + cost(c, Y)
//!
//! speciation:  cost(v, X) = bestTotal(L) + bestTotal(R)
//! duplication: cost(v, X) = 1 + min(bestTotal(L) + bestTotal(R),
//!                                   bestTotal(L) + bestPartial(R),
//!                                   bestPartial(L) + bestTotal(R))
//! leaf:        cost(v, X) = 0 if X equals the observed synteny, else +∞
//! ```
//!
//! `lossPartial` is the substring-mode loss distance: the copy boundary of
//! a segmental duplication absorbs prefix and suffix losses. Ties among
//! the three duplication scenarios resolve in the written order (full,
//! partial-right, partial-left).

mod candidates;
mod dp;
mod traceback;

use synrec_core::cost::Cost;
use synrec_core::tree::EventTree;
use synrec_core::check_binary_events;

use crate::error::ReconcileError;

/// Largest supported root synteny; the candidate space is `2^n`.
pub const MAX_ROOT_GENES: usize = 16;

/// Run the ordered engine in place and return the optimal
/// duplication-loss cost.
///
/// On success the tree satisfies: every internal node carries a
/// subsequence of its parent's synteny, every duplication's segment covers
/// the copy handed to one child, and every inserted loss node carries its
/// parent's synteny with a single non-empty lost segment.
///
/// # Errors
///
/// - [`ReconcileError::MalformedTree`] on unary internal nodes or
///   internal `loss`/unlabeled events;
/// - [`ReconcileError::RootTooLong`] when the root synteny exceeds
///   [`MAX_ROOT_GENES`];
/// - [`ReconcileError::InconsistentInput`] when no assignment reconciles
///   the leaves with the root synteny.
pub fn reconcile_ordered(tree: &mut EventTree) -> Result<Cost, ReconcileError> {
    check_binary_events(tree)?;

    let root = tree.root();
    let ancestral = tree.event(root).synteny.clone();
    if ancestral.len() > MAX_ROOT_GENES {
        return Err(ReconcileError::RootTooLong {
            root: ancestral.to_string(),
            length: ancestral.len(),
            max: MAX_ROOT_GENES,
        });
    }
    if tree.is_leaf(root) {
        return Ok(Cost::ZERO);
    }

    let tables = dp::Tables::compute(tree, &ancestral)?;
    let total = tables.cost(root, tables.full_mask());
    if !total.is_finite() {
        return Err(ReconcileError::InconsistentInput {
            root: ancestral.to_string(),
        });
    }

    traceback::apply(tree, &tables)?;
    Ok(total)
}
