//! The bottom-up dynamic program over candidate root subsequences.
//!
//! Candidates are the ordered subsequences of the ancestral synteny `A`,
//! indexed by bitmask (bit `i` = keep position `i` of `A`). For a node
//! `v` and candidate `X`, `cost(v, X)` is the minimum number of
//! duplications plus segmental losses in the subtree of `v` given that
//! `v` carries `X`. The candidates available below `X` are exactly the
//! submasks of `X`, enumerated with the standard descending-submask walk;
//! ties keep the first (largest) submask encountered, which makes the
//! whole table deterministic.

use synrec_core::cost::Cost;
use synrec_core::error::MalformedTreeError;
use synrec_core::event::EventKind;
use synrec_core::synteny::Synteny;
use synrec_core::tree::{EventTree, NodeId};

use super::candidates::CandidateSet;
use crate::error::ReconcileError;

/// The children assignment recorded for one `(node, candidate)` optimum.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Choice {
    /// Candidate mask assigned to the left child.
    pub left: usize,
    /// Candidate mask assigned to the right child.
    pub right: usize,
    /// Left child is the segmental copy of a duplication.
    pub partial_left: bool,
    /// Right child is the segmental copy of a duplication.
    pub partial_right: bool,
}

/// Completed DP tables for one tree.
pub(crate) struct Tables {
    candidates: CandidateSet,
    costs: Vec<Vec<Cost>>,
    choices: Vec<Vec<Choice>>,
}

impl Tables {
    /// The mask selecting the whole ancestral synteny.
    pub(crate) fn full_mask(&self) -> usize {
        self.candidates.full_mask()
    }

    /// The candidate synteny for `mask`.
    pub(crate) fn candidate(&self, mask: usize) -> &Synteny {
        self.candidates.sequence(mask)
    }

    /// The optimal subtree cost for `node` carrying `candidate(mask)`.
    pub(crate) fn cost(&self, node: NodeId, mask: usize) -> Cost {
        self.costs[node.index()][mask]
    }

    /// The recorded children assignment for `node` at `mask`.
    pub(crate) fn choice(&self, node: NodeId, mask: usize) -> Choice {
        self.choices[node.index()][mask]
    }

    /// Fill the tables bottom-up.
    ///
    /// The tree shape must already have passed
    /// [`synrec_core::check_binary_events`].
    pub(crate) fn compute(tree: &EventTree, ancestral: &Synteny) -> Result<Self, ReconcileError> {
        let candidates = CandidateSet::enumerate(ancestral);
        let size = candidates.len();
        let mut costs: Vec<Vec<Cost>> = vec![Vec::new(); tree.capacity()];
        let mut choices: Vec<Vec<Choice>> = vec![Vec::new(); tree.capacity()];

        for node in tree.postorder() {
            if tree.is_leaf(node) {
                let observed = &tree.event(node).synteny;
                costs[node.index()] = (0..size)
                    .map(|mask| {
                        if candidates.sequence(mask) == observed {
                            Cost::ZERO
                        } else {
                            Cost::PosInf
                        }
                    })
                    .collect();
                continue;
            }

            let &[left, right] = tree.children(node) else {
                return Err(MalformedTreeError::Arity {
                    synteny: tree.event(node).synteny.to_string(),
                    found: tree.number_of_children(node),
                }
                .into());
            };
            let kind = tree.event(node).kind;

            let mut row = Vec::with_capacity(size);
            let mut choice_row = Vec::with_capacity(size);
            for mask in 0..size {
                let candidate = candidates.sequence(mask);
                let left_bests =
                    child_bests(&costs[left.index()], &candidates, mask, candidate)?;
                let right_bests =
                    child_bests(&costs[right.index()], &candidates, mask, candidate)?;
                let (cost, choice) = combine(kind, candidate, &left_bests, &right_bests)?;
                row.push(cost);
                choice_row.push(choice);
            }
            costs[node.index()] = row;
            choices[node.index()] = choice_row;
        }

        Ok(Self {
            candidates,
            costs,
            choices,
        })
    }
}

/// Best achievable costs for one child below candidate `x`.
struct ChildBests {
    /// Minimum of `lossTotal(x, y) + cost(child, y)` over submasks `y`.
    total: Cost,
    total_arg: usize,
    /// Minimum of `lossPartial(x, y) + cost(child, y)` over *non-empty*
    /// submasks `y`. A segmental duplication copies a non-empty segment,
    /// so the empty candidate never rides for free on the substring rule.
    partial: Cost,
    partial_arg: usize,
}

fn child_bests(
    child_costs: &[Cost],
    candidates: &CandidateSet,
    x_mask: usize,
    x: &Synteny,
) -> Result<ChildBests, ReconcileError> {
    let mut bests = ChildBests {
        total: Cost::PosInf,
        total_arg: x_mask,
        partial: Cost::PosInf,
        partial_arg: x_mask,
    };

    for sub in CandidateSet::submasks(x_mask) {
        let child_cost = child_costs[sub];
        // An infinite subtree cost stays infinite after adding losses, so
        // it can never improve either minimum.
        if !child_cost.is_finite() {
            continue;
        }
        let (total_runs, inner_runs) = x.loss_counts(candidates.sequence(sub))?;
        let total = child_cost.checked_add(Cost::from(total_runs))?;
        if total < bests.total {
            bests.total = total;
            bests.total_arg = sub;
        }
        if sub != 0 {
            let partial = child_cost.checked_add(Cost::from(inner_runs))?;
            if partial < bests.partial {
                bests.partial = partial;
                bests.partial_arg = sub;
            }
        }
    }
    Ok(bests)
}

fn combine(
    kind: EventKind,
    candidate: &Synteny,
    left: &ChildBests,
    right: &ChildBests,
) -> Result<(Cost, Choice), ReconcileError> {
    match kind {
        EventKind::Speciation => {
            let cost = left.total.checked_add(right.total)?;
            Ok((
                cost,
                Choice {
                    left: left.total_arg,
                    right: right.total_arg,
                    partial_left: false,
                    partial_right: false,
                },
            ))
        }
        EventKind::Duplication => {
            let one = Cost::Finite(1);
            let full = one.checked_add(left.total)?.checked_add(right.total)?;
            let partial_right = one.checked_add(left.total)?.checked_add(right.partial)?;
            let partial_left = one.checked_add(left.partial)?.checked_add(right.total)?;

            // Tie-break order: full, then partial-right, then partial-left.
            let mut best = (
                full,
                Choice {
                    left: left.total_arg,
                    right: right.total_arg,
                    partial_left: false,
                    partial_right: false,
                },
            );
            if partial_right < best.0 {
                best = (
                    partial_right,
                    Choice {
                        left: left.total_arg,
                        right: right.partial_arg,
                        partial_left: false,
                        partial_right: true,
                    },
                );
            }
            if partial_left < best.0 {
                best = (
                    partial_left,
                    Choice {
                        left: left.partial_arg,
                        right: right.total_arg,
                        partial_left: true,
                        partial_right: false,
                    },
                );
            }
            Ok(best)
        }
        EventKind::None | EventKind::Loss => Err(MalformedTreeError::InternalEventKind {
            synteny: candidate.to_string(),
            kind,
        }
        .into()),
    }
}
