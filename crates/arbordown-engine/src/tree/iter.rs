//! Read-only traversal over trees: child lists, preorder walks, and the
//! Enter/Exit event stream the renderers consume.

use crate::tree::{NodeId, Tree};

/// One step of a depth-first walk. Containers produce an `Enter` when the
/// walk reaches them and an `Exit` once all their children have been
/// walked; leaves produce the two back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    Enter(NodeId),
    Exit(NodeId),
}

/// Iterator over the direct children of one node, in order.
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next(current);
        Some(current)
    }
}

/// Depth-first Enter/Exit walk over a subtree, root included.
///
/// The walk borrows the tree, so the borrow checker guarantees the shape
/// cannot change underneath it.
#[derive(Debug)]
pub struct Traverse<'a> {
    tree: &'a Tree,
    root: NodeId,
    next: Option<TreeEvent>,
}

impl Iterator for Traverse<'_> {
    type Item = TreeEvent;

    fn next(&mut self) -> Option<TreeEvent> {
        let current = self.next.take()?;
        self.next = match current {
            TreeEvent::Enter(id) => match self.tree.first_child(id) {
                Some(child) => Some(TreeEvent::Enter(child)),
                None => Some(TreeEvent::Exit(id)),
            },
            TreeEvent::Exit(id) => {
                if id == self.root {
                    None
                } else if let Some(sibling) = self.tree.next(id) {
                    Some(TreeEvent::Enter(sibling))
                } else {
                    self.tree.parent(id).map(TreeEvent::Exit)
                }
            }
        };
        Some(current)
    }
}

/// Preorder iterator over a subtree, root included.
#[derive(Debug)]
pub struct Descendants<'a> {
    inner: Traverse<'a>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            match self.inner.next()? {
                TreeEvent::Enter(id) => return Some(id),
                TreeEvent::Exit(_) => continue,
            }
        }
    }
}

impl Tree {
    /// Iterate the direct children of `id`. Empty for leaves and stale
    /// handles.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Walk the subtree rooted at `id`, yielding Enter/Exit events. Empty
    /// for stale handles.
    pub fn traverse(&self, id: NodeId) -> Traverse<'_> {
        Traverse {
            tree: self,
            root: id,
            next: self.contains(id).then_some(TreeEvent::Enter(id)),
        }
    }

    /// Preorder walk of the subtree rooted at `id`, `id` first.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            inner: self.traverse(id),
        }
    }
}
