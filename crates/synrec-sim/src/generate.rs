//! The tree-growing algorithm.

use rand::Rng;
use rand_distr::{Distribution, Geometric};

use synrec_core::event::{Event, EventKind};
use synrec_core::synteny::{Segment, Synteny};
use synrec_core::tree::{EventTree, NodeId};

use crate::{SimulationError, SimulationParams};

/// Grow a fully-labeled reference tree.
///
/// At each node with synteny `B` and remaining depth:
///
/// 1. an empty `B` becomes a loss leaf;
/// 2. depth 0 becomes an observed leaf carrying `B`;
/// 3. otherwise the node is a duplication with probability `p_dup` (one
///    side receives a non-empty segmental copy, recorded on the node) and
///    a speciation otherwise;
/// 4. independently per child, a segmental loss fires with probability
///    `p_loss` and is reified as a unary loss node carrying the pre-loss
///    synteny and segment;
/// 5. each child synteny is rearranged by a geometric number of random
///    position swaps before recursing with decremented depth.
///
/// # Errors
///
/// [`SimulationError::InvalidParameter`] when `params` fails validation.
pub fn simulate(
    params: &SimulationParams,
    rng: &mut impl Rng,
) -> Result<EventTree, SimulationError> {
    params.validate()?;
    let model = Model {
        dup_length: geometric(params.p_dup_length.0, "p-dup-length")?,
        loss_length: geometric(params.p_loss_length.0, "p-loss-length")?,
        rearrangements: geometric(params.p_rearr.0, "p-rearr")?,
        p_dup: params.p_dup.0,
        p_loss: params.p_loss.0,
    };

    let mut tree = EventTree::new(Event::default());
    let root = tree.root();
    grow(&mut tree, root, params.base.clone(), params.depth, &model, rng);
    Ok(tree)
}

fn geometric(p: f64, name: &'static str) -> Result<Geometric, SimulationError> {
    Geometric::new(p).map_err(|_| SimulationError::InvalidParameter {
        name,
        value: p,
        expected: "a probability in (0, 1]",
    })
}

struct Model {
    dup_length: Geometric,
    loss_length: Geometric,
    rearrangements: Geometric,
    p_dup: f64,
    p_loss: f64,
}

/// Fill `node` (pre-created with a placeholder event) and grow its
/// subtree.
fn grow(
    tree: &mut EventTree,
    node: NodeId,
    synteny: Synteny,
    depth: u32,
    model: &Model,
    rng: &mut impl Rng,
) {
    if synteny.is_empty() {
        *tree.event_mut(node) = Event::new(EventKind::Loss, Synteny::empty());
        return;
    }
    if depth == 0 {
        *tree.event_mut(node) = Event::leaf(synteny);
        return;
    }

    let mut bases = [synteny.clone(), synteny.clone()];
    let event = if rng.gen_bool(model.p_dup) {
        let mut event = Event::new(EventKind::Duplication, synteny);
        let segment = draw_duplication_segment(&event.synteny, model, rng);
        event.segment = segment;
        // One side becomes the segmental copy.
        let side = usize::from(rng.gen_bool(0.5));
        bases[side] = event.synteny.slice(segment);
        event
    } else {
        Event::new(EventKind::Speciation, synteny)
    };
    *tree.event_mut(node) = event;

    for base in bases {
        grow_child(tree, node, base, depth - 1, model, rng);
    }
}

/// Attach one child branch, possibly through a loss node, after
/// rearrangement.
fn grow_child(
    tree: &mut EventTree,
    parent: NodeId,
    base: Synteny,
    depth: u32,
    model: &Model,
    rng: &mut impl Rng,
) {
    let (attach_to, surviving) = if !base.is_empty() && rng.gen_bool(model.p_loss) {
        let segment = draw_loss_segment(base.len(), model, rng);
        let mut loss = Event::new(EventKind::Loss, base.clone());
        loss.segment = segment;
        let loss_node = tree.add_child(parent, loss);
        (loss_node, base.remove_segment(segment))
    } else {
        (parent, base)
    };

    let rearranged = rearrange(surviving, model, rng);
    let child = tree.add_child(attach_to, Event::default());
    grow(tree, child, rearranged, depth, model, rng);
}

/// A non-empty segment with geometric length (clamped to `[1, len]`) and
/// uniform start.
fn draw_duplication_segment(synteny: &Synteny, model: &Model, rng: &mut impl Rng) -> Segment {
    let len = synteny.len();
    let drawn = usize::try_from(model.dup_length.sample(rng)).unwrap_or(len);
    let length = drawn.clamp(1, len);
    let start = rng.gen_range(0..=len - length);
    Segment::new(start, start + length)
}

/// A loss segment with geometric-plus-one length, clamped to the synteny.
fn draw_loss_segment(len: usize, model: &Model, rng: &mut impl Rng) -> Segment {
    let drawn = usize::try_from(model.loss_length.sample(rng)).unwrap_or(len);
    let length = (drawn + 1).clamp(1, len);
    let start = rng.gen_range(0..=len - length);
    Segment::new(start, start + length)
}

/// Swap a geometric number of uniformly chosen position pairs.
fn rearrange(synteny: Synteny, model: &Model, rng: &mut impl Rng) -> Synteny {
    let len = synteny.len();
    if len < 2 {
        return synteny;
    }
    let swaps = model.rearrangements.sample(rng);
    if swaps == 0 {
        return synteny;
    }
    let mut genes = synteny.genes().to_vec();
    for _ in 0..swaps {
        let a = rng.gen_range(0..len);
        let b = rng.gen_range(0..len);
        genes.swap(a, b);
    }
    Synteny::from(genes)
}
