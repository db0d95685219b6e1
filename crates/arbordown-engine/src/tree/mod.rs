//! The document tree: an owning node store plus the structural-editing
//! operations that keep it well-formed.
//!
//! ## Shape
//!
//! Nodes live in an arena ([`Tree`]) and are addressed by generation-checked
//! [`NodeId`] handles. Parent, first/last-child, and sibling links are plain
//! handles resolved through the arena — ownership stays a strict tree with
//! no reference cycles, and destroying a root frees its whole subtree
//! exactly once.
//!
//! ## Editing protocol
//!
//! All edits go through five operations — [`Tree::unlink`],
//! [`Tree::insert_before`], [`Tree::insert_after`], [`Tree::prepend_child`],
//! [`Tree::append_child`] — each of which validates before mutating, so the
//! tree is never observable in a half-edited state. Inserting a node
//! anywhere detaches it from its previous position first; a node occupies
//! at most one position at a time.
//!
//! ## Module structure
//!
//! - **`arena`**: the node store — allocation, destruction, handle checks
//! - **`node`**: node kinds and kind-gated payload accessors
//! - **`edit`**: the structural operations and navigation
//! - **`iter`**: child, preorder, and Enter/Exit traversal iterators
//! - **`check`**: assertion-based well-formedness validation for tests

pub mod arena;
pub mod check;
pub mod edit;
pub mod iter;
pub mod node;

pub use arena::{NodeId, Tree};
pub use iter::{Children, Descendants, Traverse, TreeEvent};
pub use node::{ListType, NodeKind};
