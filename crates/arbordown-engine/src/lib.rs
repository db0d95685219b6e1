//! Document-tree core for arbordown.
//!
//! Markdown text goes in through [`parse_document`], becomes a typed node
//! tree owned by a [`Tree`] store, gets edited in place through the
//! structural API ([`Tree::unlink`], [`Tree::append_child`], ...), and comes
//! back out through [`render_html`] or [`render_commonmark`].

pub mod error;
pub mod escape;
pub mod options;
pub mod parse;
pub mod render;
pub mod tree;

// Re-export key types for easier usage
pub use error::NodeError;
pub use options::Options;
pub use parse::parse_document;
pub use render::{render_commonmark, render_html};
pub use tree::{Children, Descendants, ListType, NodeId, NodeKind, Traverse, Tree, TreeEvent};

/// One-shot convenience: parse markdown and render it as HTML with default
/// options.
pub fn markdown_to_html(text: &str) -> Result<String, NodeError> {
    let mut tree = Tree::new();
    let root = parse_document(&mut tree, text, Options::DEFAULT)?;
    render_html(&tree, root, Options::DEFAULT)
}
