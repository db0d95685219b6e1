//! Markdown renderer: writes a tree back out as commonmark source.
//!
//! The output is normalized, not byte-faithful to whatever was parsed: ATX
//! headings, fenced code, `-` bullets, `_`/`**` emphasis delimiters. What it
//! guarantees instead is structural idempotence — parsing the rendered text
//! reproduces a tree with the same kinds, literals, and attributes. Literal
//! text is escaped conservatively (always for span punctuation, at line
//! starts for block punctuation) to keep that property.

use crate::error::NodeError;
use crate::options::Options;
use crate::tree::{ListType, NodeId, NodeKind, Tree};

/// Render the subtree rooted at `root` as commonmark text.
///
/// `_options` is accepted for signature symmetry with the HTML renderer; no
/// current flag changes markdown output.
pub fn render_commonmark(
    tree: &Tree,
    root: NodeId,
    _options: Options,
) -> Result<String, NodeError> {
    tree.expect_node(root, "render_commonmark")?;
    let writer = CommonmarkWriter { tree };
    let mut out = writer.block(root)?;
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    tracing::debug!(bytes = out.len(), "rendered commonmark");
    Ok(out)
}

struct CommonmarkWriter<'a> {
    tree: &'a Tree,
}

impl CommonmarkWriter<'_> {
    fn block(&self, id: NodeId) -> Result<String, NodeError> {
        let kind = self
            .tree
            .kind(id)
            .ok_or(NodeError::StaleNode { op: "render_commonmark" })?;
        match kind {
            NodeKind::Document => self.child_blocks(id, false),
            NodeKind::Paragraph => self.inlines(id),
            NodeKind::Heading => {
                let level = self.tree.heading_level(id)?;
                Ok(format!(
                    "{} {}",
                    "#".repeat(level as usize),
                    self.inlines(id)?
                ))
            }
            NodeKind::ThematicBreak => Ok("***".to_string()),
            NodeKind::CodeBlock => {
                let literal = self.tree.literal(id)?;
                let info = self.tree.fence_info(id)?;
                let fence = "`".repeat(fence_width(literal));
                let mut out = String::new();
                out.push_str(&fence);
                out.push_str(info);
                out.push('\n');
                out.push_str(literal);
                if !literal.is_empty() && !literal.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&fence);
                Ok(out)
            }
            NodeKind::HtmlBlock => Ok(self.tree.literal(id)?.trim_end_matches('\n').to_string()),
            NodeKind::BlockQuote => {
                let inner = self.child_blocks(id, false)?;
                let mut out = String::new();
                for (i, line) in inner.lines().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    if line.is_empty() {
                        out.push('>');
                    } else {
                        out.push_str("> ");
                        out.push_str(line);
                    }
                }
                Ok(out)
            }
            NodeKind::List => self.list(id),
            // A bare item rendered as a root: just its content.
            NodeKind::ListItem => self.child_blocks(id, false),
            // Inline kinds as block roots render as a single line.
            _ => self.inline(id),
        }
    }

    /// Render the block children of `parent`, separated by a blank line
    /// (one newline when `tight`).
    fn child_blocks(&self, parent: NodeId, tight: bool) -> Result<String, NodeError> {
        let separator = if tight { "\n" } else { "\n\n" };
        let mut parts = Vec::new();
        for child in self.tree.children(parent) {
            parts.push(self.block(child)?);
        }
        Ok(parts.join(separator))
    }

    fn list(&self, list: NodeId) -> Result<String, NodeError> {
        let tight = self.tree.list_tight(list)?;
        let list_type = self.tree.list_type(list)?;
        let start = match list_type {
            ListType::Ordered => self.tree.list_start(list)?,
            ListType::Bullet => 0,
        };

        let mut items = Vec::new();
        for (i, item) in self.tree.children(list).enumerate() {
            let marker = match list_type {
                ListType::Bullet => "- ".to_string(),
                ListType::Ordered => format!("{}. ", start + i as u32),
            };
            let indent = " ".repeat(marker.len());
            let content = self.child_blocks(item, tight)?;

            let mut rendered = String::new();
            let mut lines = content.lines();
            match lines.next() {
                Some(first) => {
                    rendered.push_str(&marker);
                    rendered.push_str(first);
                }
                None => rendered.push_str(marker.trim_end()),
            }
            for line in lines {
                rendered.push('\n');
                if !line.is_empty() {
                    rendered.push_str(&indent);
                    rendered.push_str(line);
                }
            }
            items.push(rendered);
        }
        Ok(items.join(if tight { "\n" } else { "\n\n" }))
    }

    fn inlines(&self, parent: NodeId) -> Result<String, NodeError> {
        let mut out = String::new();
        for child in self.tree.children(parent) {
            out.push_str(&self.inline(child)?);
        }
        Ok(out)
    }

    fn inline(&self, id: NodeId) -> Result<String, NodeError> {
        let kind = self
            .tree
            .kind(id)
            .ok_or(NodeError::StaleNode { op: "render_commonmark" })?;
        Ok(match kind {
            NodeKind::Text => escape_markdown(self.tree.literal(id)?),
            NodeKind::SoftBreak => "\n".to_string(),
            NodeKind::LineBreak => "\\\n".to_string(),
            NodeKind::Code => {
                let literal = self.tree.literal(id)?;
                let ticks = "`".repeat(span_fence_width(literal));
                let pad = if literal.starts_with('`') || literal.ends_with('`') {
                    " "
                } else {
                    ""
                };
                format!("{ticks}{pad}{literal}{pad}{ticks}")
            }
            NodeKind::InlineHtml => self.tree.literal(id)?.to_string(),
            NodeKind::Emphasis => format!("_{}_", self.inlines(id)?),
            NodeKind::Strong => format!("**{}**", self.inlines(id)?),
            NodeKind::Link => format!(
                "[{}]({})",
                self.inlines(id)?,
                self.destination(id)?
            ),
            NodeKind::Image => format!(
                "![{}]({})",
                self.inlines(id)?,
                self.destination(id)?
            ),
            // Block kinds reached through an inline position (hand-built
            // trees); render their block form inline.
            _ => self.block(id)?,
        })
    }

    fn destination(&self, id: NodeId) -> Result<String, NodeError> {
        let url = self.tree.url(id)?;
        let title = self.tree.title(id)?;
        let needs_brackets =
            url.is_empty() || url.contains(char::is_whitespace) || url.contains(['(', ')']);
        let mut out = if needs_brackets {
            format!("<{url}>")
        } else {
            url.to_string()
        };
        if !title.is_empty() {
            out.push_str(" \"");
            out.push_str(&title.replace('"', "\\\""));
            out.push('"');
        }
        Ok(out)
    }
}

/// Width of a code fence that cannot collide with the literal: one backtick
/// more than the longest run inside, minimum three.
fn fence_width(literal: &str) -> usize {
    (longest_backtick_run(literal) + 1).max(3)
}

/// Width of an inline code span fence, minimum one.
fn span_fence_width(literal: &str) -> usize {
    longest_backtick_run(literal) + 1
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Backslash-escape literal text so it re-parses as the same text.
///
/// Span punctuation is escaped everywhere; characters that only open blocks
/// are escaped at line starts (the start of the string counts as one, which
/// over-escapes occasionally but never under-escapes the block position).
fn escape_markdown(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut at_line_start = true;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '&' => {
                out.push('\\');
                out.push(c);
            }
            '#' | '-' | '+' | '=' if at_line_start => {
                out.push('\\');
                out.push(c);
            }
            '0'..='9' if at_line_start => {
                // A leading number only opens a list when followed by a dot
                // or paren; escape that marker, keep the digits.
                let mut j = i;
                while j < chars.len() && chars[j].is_ascii_digit() {
                    out.push(chars[j]);
                    j += 1;
                }
                if j < chars.len() && (chars[j] == '.' || chars[j] == ')') {
                    out.push('\\');
                    out.push(chars[j]);
                    j += 1;
                }
                at_line_start = false;
                i = j;
                continue;
            }
            _ => out.push(c),
        }
        at_line_start = c == '\n' || (at_line_start && c == ' ');
        i += 1;
    }
    out
}
