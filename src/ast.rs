//! AST types for normalized chat markup.
//!
//! One parse of a message yields an ordered sequence of [`AstNode`]s. Node
//! order follows source order and is significant: concatenating the source
//! spans of all nodes reconstructs the input exactly, with no gaps and no
//! overlaps.

use serde::{Deserialize, Serialize};

/// A byte range in the source message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Wrapper for carrying source span information with any value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    #[serde(flatten)]
    pub value: T,
    pub span: Span,
}

/// Canonical AST node type: a [`Node`] plus the span of text it was parsed from.
pub type AstNode = Spanned<Node>;

/// Bridged platform whose mention syntax produced an [`Node::At`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Dc,
    Khl,
    Qq,
}

/// Which broadcast token produced an [`Node::AtAll`] node.
///
/// The KHL broadcast token `(met)all(met)` maps to `Everyone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BroadcastScope {
    Everyone,
    Here,
}

/// One lexical construct recognized in a chat message.
///
/// Closed set of variants, one per rule family; the renderer matches
/// exhaustively so adding a platform is a compile-time checked change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// Cross-platform at-mention in a bridged platform's textual syntax.
    ///
    /// Only the KHL form captures a separate username/discriminator pair; the
    /// DC and QQ forms carry their full matched text as the username.
    At {
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<Platform>,
        username: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        discriminator: Option<String>,
    },
    /// Literal text with no special meaning.
    Plain { text: String },
    /// Native Discord user mention; identity resolution is deferred to render
    /// time, the node carries only the opaque numeric id.
    Mention { id: String },
    /// Broadcast mention addressing all participants.
    AtAll { scope: BroadcastScope },
    /// Custom Discord emoji reference.
    Emoji {
        animated: bool,
        name: String,
        id: String,
    },
}

impl Node {
    /// Returns the variant name of this node (for diagnostics and debugging).
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::At { .. } => "At",
            Node::Plain { .. } => "Plain",
            Node::Mention { .. } => "Mention",
            Node::AtAll { .. } => "AtAll",
            Node::Emoji { .. } => "Emoji",
        }
    }
}
