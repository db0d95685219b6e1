use crate::error::NodeError;
use crate::tree::node::{NodeKind, Payload};

/// Generation-checked handle to a node owned by a [`Tree`].
///
/// Handles are plain copyable values; they never keep a node alive. When the
/// node behind a handle is destroyed, the handle goes stale: navigation
/// through it yields `None` and every fallible operation reports
/// [`NodeError::StaleNode`]. A stale handle can never observe a slot that
/// has been recycled for a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// One node record: kind, kind-specific payload, and the structural links
/// maintained by the topology operations.
#[derive(Debug)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) payload: Payload,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<NodeData>,
}

/// Owning store for the nodes of one or more document trees.
///
/// The store is an arena: it owns every node it ever allocated, hands out
/// [`NodeId`] handles as the canonical node identity, and recycles slots
/// through a free list. A single store may hold several roots at once —
/// a parsed document plus any subtrees detached from it with
/// [`Tree::unlink`](crate::tree::Tree::unlink).
///
/// Structural edits require `&mut Tree`; read-only traversal works on
/// `&Tree`, so the borrow checker enforces the single-writer model.
#[derive(Debug, Default)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Tree {
    /// Create an empty store.
    pub fn new() -> Self {
        Tree::default()
    }

    /// Allocate a new root node of the given kind.
    ///
    /// The node starts detached, with the default payload for its kind
    /// (empty literal, heading level 1, tight-off bullet list, and so on).
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let node = NodeData {
            kind,
            payload: Payload::new_for(kind),
            parent: None,
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
        };
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Destroy `id` and its entire subtree, freeing every contained node
    /// exactly once.
    ///
    /// Only roots may be destroyed: attaching a node to a parent transfers
    /// destruction responsibility upward, so a node that still has a parent
    /// must be unlinked first. All handles into the destroyed subtree become
    /// stale.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), NodeError> {
        const OP: &str = "destroy";
        let node = self.expect_node(id, OP)?;
        if node.parent.is_some() {
            return Err(NodeError::InvalidTarget {
                op: OP,
                reason: "node is still attached to a parent; unlink it first",
            });
        }
        // Collect the whole subtree before freeing anything, so no link is
        // ever read out of an already-freed slot.
        for doomed in self.subtree_ids(id) {
            let slot = &mut self.slots[doomed.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(doomed.index);
            self.live -= 1;
        }
        Ok(())
    }

    /// Whether `id` still refers to a live node in this store.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes across all trees in the store.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&NodeData> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub(crate) fn expect_node(&self, id: NodeId, op: &'static str) -> Result<&NodeData, NodeError> {
        self.node(id).ok_or(NodeError::StaleNode { op })
    }

    pub(crate) fn expect_node_mut(
        &mut self,
        id: NodeId,
        op: &'static str,
    ) -> Result<&mut NodeData, NodeError> {
        self.node_mut(id).ok_or(NodeError::StaleNode { op })
    }

    /// Access a node through an internal structural link.
    ///
    /// Links are maintained exclusively by the topology engine and always
    /// point at live slots; a miss here is tree corruption, not a caller
    /// error, so it panics instead of reporting a `NodeError`.
    pub(crate) fn link(&self, id: NodeId) -> &NodeData {
        self.slots[id.index as usize]
            .node
            .as_ref()
            .expect("structural link points at a freed slot")
    }

    pub(crate) fn link_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.slots[id.index as usize]
            .node
            .as_mut()
            .expect("structural link points at a freed slot")
    }

    /// Preorder ids of `root` and everything below it.
    pub(crate) fn subtree_ids(&self, root: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            ids.push(id);
            let mut child = self.node(id).and_then(|n| n.first_child);
            while let Some(c) = child {
                stack.push(c);
                child = self.node(c).and_then(|n| n.next);
            }
        }
        ids
    }
}
