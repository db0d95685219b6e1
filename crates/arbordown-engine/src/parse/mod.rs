//! Parser adapter: drives the external markdown grammar and builds the
//! document tree through the structural-editing and payload APIs.
//!
//! The grammar (pulldown-cmark) emits a flat event stream; the builder keeps
//! a stack of open containers and turns the stream into nodes. Two pieces of
//! shape normalization happen here so the tree always looks the same
//! regardless of how the grammar chunked its output:
//!
//! - adjacent text events merge into one Text node;
//! - items of tight lists, whose content arrives without paragraph wrappers,
//!   get a synthesized Paragraph around each run of inline children, and the
//!   list's tight flag records that the paragraphs are suppressed when
//!   rendering.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options as GrammarOptions, Parser, Tag};

use crate::error::NodeError;
use crate::options::Options;
use crate::tree::{ListType, NodeId, NodeKind, Tree};

/// Parse markdown into a new Document tree inside `tree`.
///
/// Returns the root node of the parsed document. The store may already hold
/// other trees; they are untouched. `Options::SMART` turns on smart
/// punctuation in the grammar; other flags are ignored here.
pub fn parse_document(
    tree: &mut Tree,
    text: &str,
    options: Options,
) -> Result<NodeId, NodeError> {
    let mut grammar = GrammarOptions::empty();
    if options.contains(Options::SMART) {
        grammar.insert(GrammarOptions::ENABLE_SMART_PUNCTUATION);
    }

    let mut builder = TreeBuilder::new(tree);
    for event in Parser::new_ext(text, grammar) {
        builder.event(event)?;
    }
    let root = builder.finish()?;

    tracing::debug!(
        bytes = text.len(),
        nodes = tree.descendants(root).count(),
        "parsed document"
    );
    Ok(root)
}

/// Stack-driven tree construction over the grammar's event stream.
struct TreeBuilder<'t> {
    tree: &'t mut Tree,
    root: NodeId,
    /// Open container chain; the document root sits at the bottom and is
    /// never popped by an event.
    stack: Vec<NodeId>,
    /// Open lists paired with whether a paragraph has shown up directly
    /// inside one of their items (the grammar's looseness signal).
    open_lists: Vec<(NodeId, bool)>,
}

impl<'t> TreeBuilder<'t> {
    fn new(tree: &'t mut Tree) -> Self {
        let root = tree.create(NodeKind::Document);
        TreeBuilder {
            tree,
            root,
            stack: vec![root],
            open_lists: Vec::new(),
        }
    }

    fn top(&self) -> NodeId {
        *self.stack.last().expect("builder stack always holds the root")
    }

    /// Create a node of `kind`, attach it under the current container, and
    /// make it the new current container.
    fn open(&mut self, kind: NodeKind) -> Result<NodeId, NodeError> {
        let id = self.leaf(kind)?;
        self.stack.push(id);
        Ok(id)
    }

    /// Create a node of `kind` and attach it under the current container.
    fn leaf(&mut self, kind: NodeKind) -> Result<NodeId, NodeError> {
        let id = self.tree.create(kind);
        self.tree.append_child(self.top(), id)?;
        Ok(id)
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), NodeError> {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let id = self.leaf(NodeKind::Code)?;
                self.tree.set_literal(id, code.as_ref())
            }
            Event::InlineHtml(html) => {
                let id = self.leaf(NodeKind::InlineHtml)?;
                self.tree.set_literal(id, html.as_ref())
            }
            Event::Html(html) => self.block_html(&html),
            Event::SoftBreak => self.leaf(NodeKind::SoftBreak).map(|_| ()),
            Event::HardBreak => self.leaf(NodeKind::LineBreak).map(|_| ()),
            Event::Rule => self.leaf(NodeKind::ThematicBreak).map(|_| ()),
            // No grammar extension is ever enabled, so nothing else can
            // appear; if it does, report it instead of guessing at a shape.
            other => Err(NodeError::Parse(format!(
                "unsupported grammar event: {other:?}"
            ))),
        }
    }

    fn start(&mut self, tag: Tag<'_>) -> Result<(), NodeError> {
        match tag {
            Tag::Paragraph => {
                // A paragraph directly inside a list item means the
                // innermost open list is loose.
                if self.tree.kind(self.top()) == Some(NodeKind::ListItem)
                    && let Some(entry) = self.open_lists.last_mut()
                {
                    entry.1 = true;
                }
                self.open(NodeKind::Paragraph)?;
            }
            Tag::Heading { level, .. } => {
                let id = self.open(NodeKind::Heading)?;
                self.tree.set_heading_level(id, heading_level(level))?;
            }
            Tag::BlockQuote(_) => {
                self.open(NodeKind::BlockQuote)?;
            }
            Tag::CodeBlock(kind) => {
                let id = self.open(NodeKind::CodeBlock)?;
                if let CodeBlockKind::Fenced(info) = kind {
                    self.tree.set_fence_info(id, info.as_ref())?;
                }
            }
            Tag::List(start) => {
                let id = self.open(NodeKind::List)?;
                if let Some(start) = start {
                    self.tree.set_list_type(id, ListType::Ordered)?;
                    self.tree
                        .set_list_start(id, u32::try_from(start).unwrap_or(u32::MAX))?;
                }
                self.open_lists.push((id, false));
            }
            Tag::Item => {
                self.open(NodeKind::ListItem)?;
            }
            Tag::Emphasis => {
                self.open(NodeKind::Emphasis)?;
            }
            Tag::Strong => {
                self.open(NodeKind::Strong)?;
            }
            Tag::Link {
                dest_url, title, ..
            } => {
                let id = self.open(NodeKind::Link)?;
                self.tree.set_url(id, dest_url.as_ref())?;
                self.tree.set_title(id, title.as_ref())?;
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let id = self.open(NodeKind::Image)?;
                self.tree.set_url(id, dest_url.as_ref())?;
                self.tree.set_title(id, title.as_ref())?;
            }
            Tag::HtmlBlock => {
                self.open(NodeKind::HtmlBlock)?;
            }
            other => {
                return Err(NodeError::Parse(format!(
                    "unsupported grammar block: {other:?}"
                )));
            }
        }
        Ok(())
    }

    fn end(&mut self) -> Result<(), NodeError> {
        if self.stack.len() <= 1 {
            return Err(NodeError::Parse(
                "unbalanced end event from the grammar".to_string(),
            ));
        }
        let id = self.stack.pop().expect("stack length checked above");
        match self.tree.kind(id) {
            Some(NodeKind::ListItem) => self.finish_item(id)?,
            Some(NodeKind::List) => {
                let (list, loose) = self.open_lists.pop().ok_or_else(|| {
                    NodeError::Parse("list bookkeeping out of sync".to_string())
                })?;
                debug_assert_eq!(list, id);
                self.tree.set_list_tight(list, !loose)?;
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), NodeError> {
        let top = self.top();
        match self.tree.kind(top) {
            // Code and HTML blocks collect their event text as one literal.
            Some(NodeKind::CodeBlock) | Some(NodeKind::HtmlBlock) => {
                let mut literal = self.tree.literal(top)?.to_string();
                literal.push_str(text);
                self.tree.set_literal(top, literal)
            }
            _ => {
                // Consolidate with a trailing Text node so escape-split
                // grammar output doesn't fragment the tree.
                if let Some(last) = self.tree.last_child(top)
                    && self.tree.kind(last) == Some(NodeKind::Text)
                {
                    let mut literal = self.tree.literal(last)?.to_string();
                    literal.push_str(text);
                    return self.tree.set_literal(last, literal);
                }
                let id = self.leaf(NodeKind::Text)?;
                self.tree.set_literal(id, text)
            }
        }
    }

    fn block_html(&mut self, html: &str) -> Result<(), NodeError> {
        let top = self.top();
        if self.tree.kind(top) == Some(NodeKind::HtmlBlock) {
            let mut literal = self.tree.literal(top)?.to_string();
            literal.push_str(html);
            self.tree.set_literal(top, literal)
        } else {
            let id = self.leaf(NodeKind::HtmlBlock)?;
            self.tree.set_literal(id, html)
        }
    }

    /// Wrap each run of consecutive inline children of a finished list item
    /// into a synthesized Paragraph. Tight-list items arrive from the
    /// grammar with bare inline content; the tree keeps items as block
    /// containers regardless, and the renderers consult the list's tight
    /// flag to suppress the wrappers again.
    fn finish_item(&mut self, item: NodeId) -> Result<(), NodeError> {
        let children: Vec<NodeId> = self.tree.children(item).collect();
        let mut run: Vec<NodeId> = Vec::new();
        for child in children {
            if self.tree.kind(child).is_some_and(NodeKind::is_inline) {
                run.push(child);
            } else {
                self.wrap_run(&mut run)?;
            }
        }
        self.wrap_run(&mut run)
    }

    fn wrap_run(&mut self, run: &mut Vec<NodeId>) -> Result<(), NodeError> {
        let Some(&first) = run.first() else {
            return Ok(());
        };
        let para = self.tree.create(NodeKind::Paragraph);
        self.tree.insert_before(first, para)?;
        for node in run.drain(..) {
            self.tree.append_child(para, node)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<NodeId, NodeError> {
        if self.stack.len() != 1 {
            return Err(NodeError::Parse(format!(
                "grammar left {} containers unclosed",
                self.stack.len() - 1
            )));
        }
        Ok(self.root)
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
