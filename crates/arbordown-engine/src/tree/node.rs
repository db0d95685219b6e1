use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NodeError;
use crate::tree::{NodeId, Tree};

/// The kind of a document-tree node.
///
/// Kinds partition into block kinds (document structure) and inline kinds
/// (content within a block). The enum is closed: the type system rules out
/// the out-of-range kinds the dynamic API had to guard against, so kind
/// validation only survives at the [`NodeKind::from_type_string`] boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    // Block kinds
    Document,
    BlockQuote,
    List,
    ListItem,
    CodeBlock,
    HtmlBlock,
    Paragraph,
    Heading,
    ThematicBreak,
    // Inline kinds
    Text,
    SoftBreak,
    LineBreak,
    Code,
    InlineHtml,
    Emphasis,
    Strong,
    Link,
    Image,
}

impl NodeKind {
    /// Whether this kind represents document structure.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            NodeKind::Document
                | NodeKind::BlockQuote
                | NodeKind::List
                | NodeKind::ListItem
                | NodeKind::CodeBlock
                | NodeKind::HtmlBlock
                | NodeKind::Paragraph
                | NodeKind::Heading
                | NodeKind::ThematicBreak
        )
    }

    /// Whether this kind represents content within a block.
    pub fn is_inline(self) -> bool {
        !self.is_block()
    }

    /// Stable human-readable name for this kind.
    pub fn type_string(self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::BlockQuote => "block_quote",
            NodeKind::List => "list",
            NodeKind::ListItem => "list_item",
            NodeKind::CodeBlock => "code_block",
            NodeKind::HtmlBlock => "html_block",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::ThematicBreak => "thematic_break",
            NodeKind::Text => "text",
            NodeKind::SoftBreak => "softbreak",
            NodeKind::LineBreak => "linebreak",
            NodeKind::Code => "code",
            NodeKind::InlineHtml => "inline_html",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::Link => "link",
            NodeKind::Image => "image",
        }
    }

    /// Look a kind up by its [`type_string`](NodeKind::type_string) name.
    pub fn from_type_string(name: &str) -> Result<NodeKind, NodeError> {
        Ok(match name {
            "document" => NodeKind::Document,
            "block_quote" => NodeKind::BlockQuote,
            "list" => NodeKind::List,
            "list_item" => NodeKind::ListItem,
            "code_block" => NodeKind::CodeBlock,
            "html_block" => NodeKind::HtmlBlock,
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "thematic_break" => NodeKind::ThematicBreak,
            "text" => NodeKind::Text,
            "softbreak" => NodeKind::SoftBreak,
            "linebreak" => NodeKind::LineBreak,
            "code" => NodeKind::Code,
            "inline_html" => NodeKind::InlineHtml,
            "emphasis" => NodeKind::Emphasis,
            "strong" => NodeKind::Strong,
            "link" => NodeKind::Link,
            "image" => NodeKind::Image,
            _ => return Err(NodeError::InvalidKind(name.to_string())),
        })
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_string())
    }
}

/// Bullet vs. ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    Bullet,
    Ordered,
}

/// Kind-specific node payload. The variant is fixed at allocation time and
/// always matches the node's kind, which is what lets the accessors gate on
/// kind by matching the payload alone.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Payload {
    None,
    /// Text, Code, InlineHtml, HtmlBlock.
    Literal(String),
    /// CodeBlock: fence info plus the code text.
    CodeBlock { info: String, literal: String },
    Heading { level: u8 },
    List {
        list_type: ListType,
        start: u32,
        tight: bool,
    },
    /// Link and Image.
    Link { url: String, title: String },
}

impl Payload {
    pub(crate) fn new_for(kind: NodeKind) -> Payload {
        match kind {
            NodeKind::Text | NodeKind::Code | NodeKind::InlineHtml | NodeKind::HtmlBlock => {
                Payload::Literal(String::new())
            }
            NodeKind::CodeBlock => Payload::CodeBlock {
                info: String::new(),
                literal: String::new(),
            },
            NodeKind::Heading => Payload::Heading { level: 1 },
            NodeKind::List => Payload::List {
                list_type: ListType::Bullet,
                start: 1,
                tight: false,
            },
            NodeKind::Link | NodeKind::Image => Payload::Link {
                url: String::new(),
                title: String::new(),
            },
            _ => Payload::None,
        }
    }
}

/// Typed payload accessors. Every getter and setter validates the node's
/// kind before touching anything; a failed call leaves the node unchanged.
impl Tree {
    /// The node's kind, or `None` for a stale handle.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    /// Text content of a Text, Code, InlineHtml, HtmlBlock, or CodeBlock
    /// node.
    pub fn literal(&self, id: NodeId) -> Result<&str, NodeError> {
        let node = self.expect_node(id, "literal")?;
        match &node.payload {
            Payload::Literal(text) => Ok(text),
            Payload::CodeBlock { literal, .. } => Ok(literal),
            _ => Err(NodeError::NoContent { kind: node.kind }),
        }
    }

    /// Replace the text content of a literal-carrying node.
    pub fn set_literal(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), NodeError> {
        const OP: &str = "set_literal";
        let text = text.into();
        if text.contains('\0') {
            return Err(NodeError::InvalidLiteral {
                op: OP,
                reason: "text contains an embedded NUL byte".to_string(),
            });
        }
        let node = self.expect_node_mut(id, OP)?;
        match &mut node.payload {
            Payload::Literal(slot) => {
                *slot = text;
                Ok(())
            }
            Payload::CodeBlock { literal, .. } => {
                *literal = text;
                Ok(())
            }
            _ => Err(NodeError::NoContent { kind: node.kind }),
        }
    }

    /// URL of a Link or Image node.
    pub fn url(&self, id: NodeId) -> Result<&str, NodeError> {
        let node = self.expect_node(id, "url")?;
        match &node.payload {
            Payload::Link { url, .. } => Ok(url),
            _ => Err(NodeError::NotApplicable {
                op: "url",
                kind: node.kind,
                expected: "link or image",
            }),
        }
    }

    pub fn set_url(&mut self, id: NodeId, url: impl Into<String>) -> Result<(), NodeError> {
        let node = self.expect_node_mut(id, "set_url")?;
        match &mut node.payload {
            Payload::Link { url: slot, .. } => {
                *slot = url.into();
                Ok(())
            }
            _ => Err(NodeError::NotApplicable {
                op: "set_url",
                kind: node.kind,
                expected: "link or image",
            }),
        }
    }

    /// Title of a Link or Image node.
    pub fn title(&self, id: NodeId) -> Result<&str, NodeError> {
        let node = self.expect_node(id, "title")?;
        match &node.payload {
            Payload::Link { title, .. } => Ok(title),
            _ => Err(NodeError::NotApplicable {
                op: "title",
                kind: node.kind,
                expected: "link or image",
            }),
        }
    }

    pub fn set_title(&mut self, id: NodeId, title: impl Into<String>) -> Result<(), NodeError> {
        let node = self.expect_node_mut(id, "set_title")?;
        match &mut node.payload {
            Payload::Link { title: slot, .. } => {
                *slot = title.into();
                Ok(())
            }
            _ => Err(NodeError::NotApplicable {
                op: "set_title",
                kind: node.kind,
                expected: "link or image",
            }),
        }
    }

    /// Level of a Heading node (1..=6).
    pub fn heading_level(&self, id: NodeId) -> Result<u8, NodeError> {
        let node = self.expect_node(id, "heading_level")?;
        match node.payload {
            Payload::Heading { level } => Ok(level),
            _ => Err(NodeError::NotApplicable {
                op: "heading_level",
                kind: node.kind,
                expected: "heading",
            }),
        }
    }

    /// Set a Heading node's level. Levels outside 1..=6 are rejected, never
    /// clamped.
    pub fn set_heading_level(&mut self, id: NodeId, level: u8) -> Result<(), NodeError> {
        const OP: &str = "set_heading_level";
        let node = self.expect_node_mut(id, OP)?;
        match &mut node.payload {
            Payload::Heading { level: slot } => {
                if !(1..=6).contains(&level) {
                    return Err(NodeError::InvalidLiteral {
                        op: OP,
                        reason: format!("heading level must be between 1 and 6, got {level}"),
                    });
                }
                *slot = level;
                Ok(())
            }
            _ => Err(NodeError::NotApplicable {
                op: OP,
                kind: node.kind,
                expected: "heading",
            }),
        }
    }

    /// Bullet/ordered type of a List node.
    pub fn list_type(&self, id: NodeId) -> Result<ListType, NodeError> {
        let node = self.expect_node(id, "list_type")?;
        match node.payload {
            Payload::List { list_type, .. } => Ok(list_type),
            _ => Err(NodeError::NotApplicable {
                op: "list_type",
                kind: node.kind,
                expected: "list",
            }),
        }
    }

    pub fn set_list_type(&mut self, id: NodeId, list_type: ListType) -> Result<(), NodeError> {
        let node = self.expect_node_mut(id, "set_list_type")?;
        match &mut node.payload {
            Payload::List {
                list_type: slot, ..
            } => {
                *slot = list_type;
                Ok(())
            }
            _ => Err(NodeError::NotApplicable {
                op: "set_list_type",
                kind: node.kind,
                expected: "list",
            }),
        }
    }

    /// Start number of an ordered List node. Bullet lists have no start
    /// number and reject the call.
    pub fn list_start(&self, id: NodeId) -> Result<u32, NodeError> {
        const OP: &str = "list_start";
        let node = self.expect_node(id, OP)?;
        match node.payload {
            Payload::List {
                list_type: ListType::Ordered,
                start,
                ..
            } => Ok(start),
            _ => Err(NodeError::NotApplicable {
                op: OP,
                kind: node.kind,
                expected: "ordered list",
            }),
        }
    }

    pub fn set_list_start(&mut self, id: NodeId, start: u32) -> Result<(), NodeError> {
        const OP: &str = "set_list_start";
        let node = self.expect_node_mut(id, OP)?;
        match &mut node.payload {
            Payload::List {
                list_type: ListType::Ordered,
                start: slot,
                ..
            } => {
                *slot = start;
                Ok(())
            }
            _ => Err(NodeError::NotApplicable {
                op: OP,
                kind: node.kind,
                expected: "ordered list",
            }),
        }
    }

    /// Tightness of a List node (tight lists render without paragraph
    /// separators).
    pub fn list_tight(&self, id: NodeId) -> Result<bool, NodeError> {
        let node = self.expect_node(id, "list_tight")?;
        match node.payload {
            Payload::List { tight, .. } => Ok(tight),
            _ => Err(NodeError::NotApplicable {
                op: "list_tight",
                kind: node.kind,
                expected: "list",
            }),
        }
    }

    pub fn set_list_tight(&mut self, id: NodeId, tight: bool) -> Result<(), NodeError> {
        let node = self.expect_node_mut(id, "set_list_tight")?;
        match &mut node.payload {
            Payload::List { tight: slot, .. } => {
                *slot = tight;
                Ok(())
            }
            _ => Err(NodeError::NotApplicable {
                op: "set_list_tight",
                kind: node.kind,
                expected: "list",
            }),
        }
    }

    /// Fence info string of a CodeBlock node (empty for indented code).
    pub fn fence_info(&self, id: NodeId) -> Result<&str, NodeError> {
        let node = self.expect_node(id, "fence_info")?;
        match &node.payload {
            Payload::CodeBlock { info, .. } => Ok(info),
            _ => Err(NodeError::NotApplicable {
                op: "fence_info",
                kind: node.kind,
                expected: "code_block",
            }),
        }
    }

    pub fn set_fence_info(&mut self, id: NodeId, info: impl Into<String>) -> Result<(), NodeError> {
        let node = self.expect_node_mut(id, "set_fence_info")?;
        match &mut node.payload {
            Payload::CodeBlock { info: slot, .. } => {
                *slot = info.into();
                Ok(())
            }
            _ => Err(NodeError::NotApplicable {
                op: "set_fence_info",
                kind: node.kind,
                expected: "code_block",
            }),
        }
    }
}
