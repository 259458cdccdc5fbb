//! Arena-allocated rooted ordered trees of [`Event`] records.
//!
//! Nodes live in a slot vector and are addressed by stable [`NodeId`]
//! handles; removal tombstones the slot instead of shifting ids, so a
//! handle remains valid until that specific node is removed. Traversals
//! return snapshot vectors of ids, which keeps iteration decoupled from
//! in-place rewrites: both reconciliation engines walk a snapshot while
//! wrapping nodes and pruning subtrees.
//!
//! The local rewrites mirror what the algorithms need:
//!
//! - [`EventTree::wrap`] inserts a new parent between a node and its
//!   current parent (loss reification),
//! - [`EventTree::flatten`] absorbs a node's single child into the node
//!   (collapsing cascaded loss chains during erasure),
//! - [`EventTree::erase`] removes a node and lets its parent adopt its
//!   children in place.

use crate::event::Event;

/// Stable handle to a node in an [`EventTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The raw arena index, usable as a dense table key.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct Slot {
    event: Event,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    alive: bool,
}

/// A rooted ordered tree of events.
#[derive(Debug, Clone)]
pub struct EventTree {
    slots: Vec<Slot>,
    root: NodeId,
}

impl EventTree {
    /// Create a tree consisting of a single root node.
    #[must_use]
    pub fn new(root_event: Event) -> Self {
        Self {
            slots: vec![Slot {
                event: root_event,
                parent: None,
                children: Vec::new(),
                alive: true,
            }],
            root: NodeId(0),
        }
    }

    /// The root handle.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Upper bound for dense side tables indexed by [`NodeId::index`].
    ///
    /// Counts every slot ever allocated, including tombstones.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live nodes reachable from the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.preorder().len()
    }

    /// True while `node` has not been removed.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.slots.get(node.0).is_some_and(|slot| slot.alive)
    }

    fn slot(&self, node: NodeId) -> &Slot {
        let slot = &self.slots[node.0];
        assert!(slot.alive, "use of removed tree node");
        slot
    }

    fn slot_mut(&mut self, node: NodeId) -> &mut Slot {
        let slot = &mut self.slots[node.0];
        assert!(slot.alive, "use of removed tree node");
        slot
    }

    /// The event payload of `node`.
    ///
    /// # Panics
    ///
    /// Panics when `node` has been removed.
    #[must_use]
    pub fn event(&self, node: NodeId) -> &Event {
        &self.slot(node).event
    }

    /// Mutable access to the event payload of `node`.
    ///
    /// # Panics
    ///
    /// Panics when `node` has been removed.
    pub fn event_mut(&mut self, node: NodeId) -> &mut Event {
        &mut self.slot_mut(node).event
    }

    /// The children of `node`, in order.
    ///
    /// # Panics
    ///
    /// Panics when `node` has been removed.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.slot(node).children
    }

    /// Number of children of `node`.
    ///
    /// # Panics
    ///
    /// Panics when `node` has been removed.
    #[must_use]
    pub fn number_of_children(&self, node: NodeId) -> usize {
        self.slot(node).children.len()
    }

    /// The `index`-th child of `node`, if present.
    ///
    /// # Panics
    ///
    /// Panics when `node` has been removed.
    #[must_use]
    pub fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.slot(node).children.get(index).copied()
    }

    /// The parent of `node`, or `None` for the root.
    ///
    /// # Panics
    ///
    /// Panics when `node` has been removed.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).parent
    }

    /// True when `node` has no children.
    ///
    /// # Panics
    ///
    /// Panics when `node` has been removed.
    #[must_use]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.slot(node).children.is_empty()
    }

    /// Append a new child under `parent`.
    ///
    /// # Panics
    ///
    /// Panics when `parent` has been removed.
    pub fn add_child(&mut self, parent: NodeId, event: Event) -> NodeId {
        assert!(self.contains(parent), "use of removed tree node");
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            event,
            parent: Some(parent),
            children: Vec::new(),
            alive: true,
        });
        self.slots[parent.0].children.push(id);
        id
    }

    /// Streaming root-to-leaf traversal: every live node before its
    /// descendants, children in order.
    #[must_use]
    pub fn walk_preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Root-to-leaf snapshot: every live node before its descendants,
    /// children in order. A snapshot stays valid while the tree is
    /// rewritten, which is how the engines interleave traversal with
    /// in-place edits.
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        self.walk_preorder().collect()
    }

    /// Leaves-to-root snapshot: every live node after its descendants.
    #[must_use]
    pub fn postorder(&self) -> Vec<NodeId> {
        let mut order = self.preorder();
        // Reversed preorder with reversed child order is a valid postorder.
        order.reverse();
        order
    }

    /// Insert a new node carrying `event` between `child` and its current
    /// parent. The new node takes `child`'s former slot in the parent's
    /// child list (or becomes the root) and adopts `child` as its only
    /// child. Returns the new node.
    ///
    /// # Panics
    ///
    /// Panics when `child` has been removed.
    pub fn wrap(&mut self, child: NodeId, event: Event) -> NodeId {
        let parent = self.slot(child).parent;
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            event,
            parent,
            children: vec![child],
            alive: true,
        });
        self.slots[child.0].parent = Some(id);
        match parent {
            Some(parent) => self.replace_in_parent(parent, child, &[id]),
            None => self.root = id,
        }
        id
    }

    /// Absorb the single child of `node`: the child's event and children
    /// move into `node` and the child slot is removed. The handle `node`
    /// stays valid, which makes this the right rewrite for collapsing a
    /// cascaded loss chain from its top node (including at the root).
    ///
    /// # Panics
    ///
    /// Panics when `node` has been removed or does not have exactly one
    /// child.
    pub fn flatten(&mut self, node: NodeId) {
        let children = self.slot(node).children.clone();
        assert_eq!(
            children.len(),
            1,
            "flatten requires exactly one child, found {}",
            children.len()
        );
        let child = children[0];
        let grandchildren = self.slots[child.0].children.clone();
        for grandchild in &grandchildren {
            self.slots[grandchild.0].parent = Some(node);
        }
        self.slots[node.0].event = self.slots[child.0].event.clone();
        self.slots[node.0].children = grandchildren;
        self.slots[child.0].alive = false;
    }

    /// Remove `node`; its parent adopts its children at `node`'s former
    /// position. A root may only be erased when it has at most one child
    /// (its child becomes the new root).
    ///
    /// # Panics
    ///
    /// Panics when `node` has been removed, or when `node` is a root with
    /// more than one child (there would be no single replacement root), or
    /// when a childless root is erased (the tree may not become empty).
    pub fn erase(&mut self, node: NodeId) {
        let children = self.slot(node).children.clone();
        let parent = self.slot(node).parent;
        for child in &children {
            self.slots[child.0].parent = parent;
        }
        match parent {
            Some(parent) => self.replace_in_parent(parent, node, &children),
            None => {
                assert_eq!(
                    children.len(),
                    1,
                    "erasing the root requires exactly one child, found {}",
                    children.len()
                );
                self.root = children[0];
            }
        }
        self.slots[node.0].alive = false;
        self.slots[node.0].children.clear();
    }

    /// Remove every descendant of `node`, leaving `node` itself as a leaf.
    ///
    /// # Panics
    ///
    /// Panics when `node` has been removed.
    pub fn remove_children(&mut self, node: NodeId) {
        let children = self.slot(node).children.clone();
        for child in children {
            self.kill_subtree(child);
        }
        self.slots[node.0].children.clear();
    }

    fn kill_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            stack.extend(self.slots[current.0].children.iter().copied());
            self.slots[current.0].alive = false;
            self.slots[current.0].children.clear();
        }
    }

    fn replace_in_parent(&mut self, parent: NodeId, old: NodeId, replacements: &[NodeId]) {
        let children = &mut self.slots[parent.0].children;
        let position = children
            .iter()
            .position(|child| *child == old)
            .expect("child listed under its parent");
        children.splice(position..=position, replacements.iter().copied());
    }
}

/// Streaming preorder traversal over a borrowed tree.
///
/// Borrowing the tree for the whole walk rules out concurrent rewrites;
/// use [`EventTree::preorder`] for a snapshot when edits must interleave.
#[derive(Debug)]
pub struct Preorder<'a> {
    tree: &'a EventTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        // Reverse so the first child is visited first.
        self.stack
            .extend(self.tree.slot(node).children.iter().rev());
        Some(node)
    }
}
