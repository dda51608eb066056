//! Chatmark error handling.
//!
//! All pipeline failures are represented by [`ChatmarkError`], a single
//! `miette`-based diagnostic enum. Parse-time errors abort the whole parse (no
//! partial AST); render-time errors abort the whole render (no partial
//! markup). There is no retry path: every failure here is either a
//! deterministic input-shape issue or an implementation defect.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ChatmarkError {
    /// No rule matched at some offset. The rule table ends with the catch-all
    /// plain-text rule, so this can only happen if the table itself is broken;
    /// fail loudly rather than silently dropping text.
    #[error("no rule matched at byte {offset}")]
    #[diagnostic(
        code(chatmark::no_rule_matched),
        help("the rule table must end with the catch-all plain-text rule; this is a defect in the table, not in the input")
    )]
    NoRuleMatched {
        #[source_code]
        src: NamedSource<String>,
        #[label("nothing matches here")]
        span: SourceSpan,
        offset: usize,
    },

    /// A rule claimed a match of zero bytes, which would stall the scan loop.
    #[error("rule '{rule}' matched zero bytes at byte {offset}")]
    #[diagnostic(code(chatmark::stalled_rule))]
    StalledRule {
        rule: &'static str,
        #[source_code]
        src: NamedSource<String>,
        #[label("scan stalled here")]
        span: SourceSpan,
        offset: usize,
    },

    /// A render callback required by a node in the AST was not supplied.
    #[error("missing render capability: {capability}")]
    #[diagnostic(
        code(chatmark::missing_capability),
        help("supply a MentionResolver in the RenderState when the AST contains mention or broadcast nodes")
    )]
    MissingCapability { capability: &'static str },

    /// A rule's build step received captures inconsistent with its own
    /// pattern. A defect in the rule definition, not a runtime input
    /// condition.
    #[error("rule '{rule}' produced a malformed capture")]
    #[diagnostic(code(chatmark::malformed_capture))]
    MalformedCapture { rule: &'static str },
}

/// Builds a defect-level error pointing at `offset` in `input`.
pub(crate) fn no_rule_matched(input: &str, offset: usize) -> ChatmarkError {
    ChatmarkError::NoRuleMatched {
        src: message_source(input),
        span: offset_span(input, offset),
        offset,
    }
}

pub(crate) fn stalled_rule(rule: &'static str, input: &str, offset: usize) -> ChatmarkError {
    ChatmarkError::StalledRule {
        rule,
        src: message_source(input),
        span: offset_span(input, offset),
        offset,
    }
}

fn message_source(input: &str) -> NamedSource<String> {
    NamedSource::new("message", input.to_string())
}

/// One-character label at `offset`, clamped to the next char boundary.
fn offset_span(input: &str, offset: usize) -> SourceSpan {
    let len = input[offset..].chars().next().map_or(0, |c| c.len_utf8());
    SourceSpan::new(offset.into(), len)
}
