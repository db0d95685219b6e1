//! HTML renderer: consumes a tree read-only via the Enter/Exit traversal
//! and writes markup.
//!
//! Newline discipline follows the reference output shape: every block tag
//! asks for a fresh line before it opens (`cr`), paragraphs inside tight
//! lists render without `<p>` wrappers, and `<ol>` only carries a `start`
//! attribute when it doesn't begin at 1.

use crate::error::NodeError;
use crate::escape::{escape_attribute, escape_href, escape_html};
use crate::options::Options;
use crate::tree::{ListType, NodeId, NodeKind, Tree, TreeEvent};

/// Render the subtree rooted at `root` as HTML.
///
/// The tree is only read; traversal goes through the navigation API.
/// Output is deterministic for a fixed tree and options.
pub fn render_html(tree: &Tree, root: NodeId, options: Options) -> Result<String, NodeError> {
    tree.expect_node(root, "render_html")?;
    let mut writer = HtmlWriter {
        tree,
        options,
        out: String::new(),
    };
    writer.render(root)?;
    tracing::debug!(bytes = writer.out.len(), "rendered html");
    Ok(writer.out)
}

struct HtmlWriter<'a> {
    tree: &'a Tree,
    options: Options,
    out: String,
}

impl HtmlWriter<'_> {
    fn render(&mut self, root: NodeId) -> Result<(), NodeError> {
        let mut events = self.tree.traverse(root);
        while let Some(event) = events.next() {
            match event {
                TreeEvent::Enter(id) if self.tree.kind(id) == Some(NodeKind::Image) => {
                    self.image(id)?;
                    // The children were flattened into the alt text; skip
                    // the rest of the image subtree.
                    for ev in events.by_ref() {
                        if ev == TreeEvent::Exit(id) {
                            break;
                        }
                    }
                }
                TreeEvent::Enter(id) => self.enter(id)?,
                TreeEvent::Exit(id) => self.exit(id)?,
            }
        }
        Ok(())
    }

    /// Start a new line unless output is empty or already ends with one.
    fn cr(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn safe(&self) -> bool {
        self.options.contains(Options::SAFE)
    }

    fn enter(&mut self, id: NodeId) -> Result<(), NodeError> {
        let kind = self
            .tree
            .kind(id)
            .ok_or(NodeError::StaleNode { op: "render_html" })?;
        match kind {
            NodeKind::Document => {}
            NodeKind::BlockQuote => {
                self.cr();
                self.out.push_str("<blockquote>\n");
            }
            NodeKind::List => {
                self.cr();
                match self.tree.list_type(id)? {
                    ListType::Bullet => self.out.push_str("<ul>\n"),
                    ListType::Ordered => {
                        let start = self.tree.list_start(id)?;
                        if start == 1 {
                            self.out.push_str("<ol>\n");
                        } else {
                            self.out.push_str(&format!("<ol start=\"{start}\">\n"));
                        }
                    }
                }
            }
            NodeKind::ListItem => {
                self.cr();
                self.out.push_str("<li>");
            }
            NodeKind::Heading => {
                self.cr();
                let level = self.tree.heading_level(id)?;
                self.out.push_str(&format!("<h{level}>"));
            }
            NodeKind::CodeBlock => {
                self.cr();
                self.out.push_str("<pre><code");
                let info = self.tree.fence_info(id)?;
                if let Some(language) = info.split_whitespace().next() {
                    self.out.push_str(" class=\"language-");
                    self.out.push_str(&escape_attribute(language));
                    self.out.push('"');
                }
                self.out.push('>');
                self.out.push_str(&escape_html(self.tree.literal(id)?));
                self.out.push_str("</code></pre>\n");
            }
            NodeKind::HtmlBlock => {
                self.cr();
                if self.safe() {
                    self.out.push_str("<!-- raw HTML omitted -->");
                } else {
                    self.out.push_str(self.tree.literal(id)?);
                }
                self.cr();
            }
            NodeKind::Paragraph => {
                if !self.in_tight_list(id) {
                    self.cr();
                    self.out.push_str("<p>");
                }
            }
            NodeKind::ThematicBreak => {
                self.cr();
                self.out.push_str("<hr />\n");
            }
            NodeKind::Text => {
                self.out.push_str(&escape_html(self.tree.literal(id)?));
            }
            NodeKind::SoftBreak => {
                if self.options.contains(Options::HARDBREAKS) {
                    self.out.push_str("<br />\n");
                } else if self.options.contains(Options::NOBREAKS) {
                    self.out.push(' ');
                } else {
                    self.out.push('\n');
                }
            }
            NodeKind::LineBreak => {
                self.out.push_str("<br />\n");
            }
            NodeKind::Code => {
                self.out.push_str("<code>");
                self.out.push_str(&escape_html(self.tree.literal(id)?));
                self.out.push_str("</code>");
            }
            NodeKind::InlineHtml => {
                if self.safe() {
                    self.out.push_str("<!-- raw HTML omitted -->");
                } else {
                    self.out.push_str(self.tree.literal(id)?);
                }
            }
            NodeKind::Emphasis => self.out.push_str("<em>"),
            NodeKind::Strong => self.out.push_str("<strong>"),
            NodeKind::Link => {
                let url = self.tree.url(id)?;
                self.out.push_str("<a href=\"");
                if !(self.safe() && is_unsafe_url(url)) {
                    self.out.push_str(&escape_href(url));
                }
                self.out.push('"');
                let title = self.tree.title(id)?;
                if !title.is_empty() {
                    self.out.push_str(" title=\"");
                    self.out.push_str(&escape_attribute(title));
                    self.out.push('"');
                }
                self.out.push('>');
            }
            // Images are handled before dispatch so their subtree can be
            // projected into alt text.
            NodeKind::Image => {}
        }
        Ok(())
    }

    fn exit(&mut self, id: NodeId) -> Result<(), NodeError> {
        let Some(kind) = self.tree.kind(id) else {
            return Ok(());
        };
        match kind {
            NodeKind::BlockQuote => {
                self.cr();
                self.out.push_str("</blockquote>\n");
            }
            NodeKind::List => {
                self.cr();
                match self.tree.list_type(id)? {
                    ListType::Bullet => self.out.push_str("</ul>\n"),
                    ListType::Ordered => self.out.push_str("</ol>\n"),
                }
            }
            NodeKind::ListItem => self.out.push_str("</li>\n"),
            NodeKind::Heading => {
                let level = self.tree.heading_level(id)?;
                self.out.push_str(&format!("</h{level}>\n"));
            }
            NodeKind::Paragraph => {
                if !self.in_tight_list(id) {
                    self.out.push_str("</p>\n");
                }
            }
            NodeKind::Emphasis => self.out.push_str("</em>"),
            NodeKind::Strong => self.out.push_str("</strong>"),
            NodeKind::Link => self.out.push_str("</a>"),
            _ => {}
        }
        Ok(())
    }

    fn image(&mut self, id: NodeId) -> Result<(), NodeError> {
        let url = self.tree.url(id)?;
        self.out.push_str("<img src=\"");
        if !(self.safe() && is_unsafe_url(url)) {
            self.out.push_str(&escape_href(url));
        }
        self.out.push_str("\" alt=\"");
        let alt = self.plain_text(id);
        self.out.push_str(&escape_attribute(&alt));
        self.out.push('"');
        let title = self.tree.title(id)?;
        if !title.is_empty() {
            self.out.push_str(" title=\"");
            self.out.push_str(&escape_attribute(title));
            self.out.push('"');
        }
        self.out.push_str(" />");
        Ok(())
    }

    /// Plain-text projection of a subtree: literal text with breaks as
    /// spaces, markup dropped. Used for image alt text.
    fn plain_text(&self, root: NodeId) -> String {
        let mut out = String::new();
        for id in self.tree.descendants(root).skip(1) {
            match self.tree.kind(id) {
                Some(NodeKind::Text) | Some(NodeKind::Code) => {
                    if let Ok(literal) = self.tree.literal(id) {
                        out.push_str(literal);
                    }
                }
                Some(NodeKind::SoftBreak) | Some(NodeKind::LineBreak) => out.push(' '),
                _ => {}
            }
        }
        out
    }

    fn in_tight_list(&self, paragraph: NodeId) -> bool {
        let Some(item) = self.tree.parent(paragraph) else {
            return false;
        };
        if self.tree.kind(item) != Some(NodeKind::ListItem) {
            return false;
        }
        let Some(list) = self.tree.parent(item) else {
            return false;
        };
        self.tree.list_tight(list).unwrap_or(false)
    }
}

/// Link targets that `Options::SAFE` refuses to emit.
fn is_unsafe_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("data:") {
        return !(rest.starts_with("image/png")
            || rest.starts_with("image/gif")
            || rest.starts_with("image/jpeg")
            || rest.starts_with("image/webp"));
    }
    lower.starts_with("javascript:")
        || lower.starts_with("vbscript:")
        || lower.starts_with("file:")
}
