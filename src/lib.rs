//! Chatmark normalizes chat messages that mix markup dialects from Discord
//! and two bridged platforms (KHL, QQ) into a single typed AST, then renders
//! that AST back into display markup through pluggable mention resolvers.
//!
//! The pipeline is two-phase and synchronous: [`tokenize`] walks the input
//! with an ordered rule table and produces spanned nodes; [`render`] walks
//! the nodes and produces markup, invoking the injected [`MentionResolver`]
//! for user and broadcast mentions.

pub mod ast;
pub mod cli;
pub mod errors;
pub mod render;
pub mod rules;
pub mod server;
pub mod tokenizer;

pub use ast::{AstNode, BroadcastScope, Node, Platform, Span, Spanned};
pub use errors::ChatmarkError;
pub use render::{render, MentionResolver, RenderState};
pub use tokenizer::tokenize;
