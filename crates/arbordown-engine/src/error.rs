use crate::tree::NodeKind;

/// Errors reported by the tree, payload accessors, and pipeline adapters.
///
/// Every operation validates its preconditions before touching the tree, so
/// a returned error always means the tree is exactly as it was before the
/// call. Variants carry the offending operation and, where relevant, the
/// node kind, so callers can produce precise diagnostics.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NodeError {
    /// A node-kind name was not recognized.
    #[error("invalid node kind: {0:?}")]
    InvalidKind(String),

    /// The grammar reported a fatal condition while building the tree.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// A kind-specific accessor was called on a node of the wrong kind.
    #[error("{op} is only valid for {expected} nodes, not {kind}")]
    NotApplicable {
        op: &'static str,
        kind: NodeKind,
        expected: &'static str,
    },

    /// A literal-text getter was called on a kind that never carries text.
    #[error("{kind} nodes have no text content")]
    NoContent { kind: NodeKind },

    /// A setter was given a value the node cannot hold.
    #[error("invalid value for {op}: {reason}")]
    InvalidLiteral { op: &'static str, reason: String },

    /// A structural operation needed a parent, but the node is a root.
    #[error("{op} requires the node to have a parent")]
    NoParent { op: &'static str },

    /// A structural operation would violate the tree shape.
    #[error("invalid target for {op}: {reason}")]
    InvalidTarget {
        op: &'static str,
        reason: &'static str,
    },

    /// A handle referred to a node that has since been destroyed.
    #[error("stale node handle passed to {op}")]
    StaleNode { op: &'static str },
}
