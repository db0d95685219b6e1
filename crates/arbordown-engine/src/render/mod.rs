//! Renderer adapters: read-only consumers of the document tree.
//!
//! Two output formats share the same traversal contract: HTML (the primary
//! output) and commonmark (normalized markdown whose re-parse reproduces the
//! tree's structure).

pub mod commonmark;
pub mod html;

pub use commonmark::render_commonmark;
pub use html::render_html;
