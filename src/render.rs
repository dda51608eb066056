//! Rendering of the AST back into display markup.
//!
//! Each node kind renders independently; the only shared input is the
//! [`RenderState`], which carries the HTML-escaping flag and the injected
//! mention resolver. Rendering is sequential so the output string preserves
//! node order deterministically.

use crate::ast::{AstNode, BroadcastScope, Node};
use crate::errors::ChatmarkError;

/// Injected identity resolution for mention nodes, typically backed by a
/// cached member list. Each method receives the full node so a resolver can
/// inspect the id or broadcast scope.
pub trait MentionResolver {
    fn user(&self, node: &Node) -> String;
    fn everyone(&self, node: &Node) -> String;
    fn here(&self, node: &Node) -> String;
}

/// Per-render configuration. A resolver is required whenever the AST contains
/// `Mention` or `AtAll` nodes; omitting it fails with
/// [`ChatmarkError::MissingCapability`] rather than silently producing empty
/// output.
pub struct RenderState<'a> {
    pub escape_html: bool,
    pub resolver: Option<&'a dyn MentionResolver>,
}

impl Default for RenderState<'_> {
    fn default() -> Self {
        RenderState {
            escape_html: false,
            resolver: None,
        }
    }
}

/// Renders the AST to a markup string, concatenating per-node renders in
/// order. Aborts on the first error; no partial markup is returned.
pub fn render(nodes: &[AstNode], state: &RenderState) -> Result<String, ChatmarkError> {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&render_node(&node.value, state)?);
    }
    Ok(out)
}

fn render_node(node: &Node, state: &RenderState) -> Result<String, ChatmarkError> {
    match node {
        Node::Plain { text } => Ok(if state.escape_html {
            sanitize_text(text)
        } else {
            text.clone()
        }),

        // Bridged at-mentions render as a template placeholder; the bridge
        // substitutes the target-platform mention downstream.
        Node::At { .. } => Ok("{{atDc}}".to_string()),

        Node::Mention { .. } => {
            let resolver = require_resolver(state, "discordCallback.user")?;
            Ok(mention_span(&resolver.user(node)))
        }

        Node::AtAll { scope } => match scope {
            BroadcastScope::Everyone => {
                let resolver = require_resolver(state, "discordCallback.everyone")?;
                Ok(mention_span(&resolver.everyone(node)))
            }
            BroadcastScope::Here => {
                let resolver = require_resolver(state, "discordCallback.here")?;
                Ok(mention_span(&resolver.here(node)))
            }
        },

        Node::Emoji { animated, name, id } => {
            let class = if *animated {
                "d-emoji d-emoji-animated"
            } else {
                "d-emoji"
            };
            let extension = if *animated { "gif" } else { "png" };
            let src = format!("https://cdn.discordapp.com/emojis/{id}.{extension}");
            let alt = format!(":{name}:");
            Ok(html_tag(
                "img",
                "",
                &[("class", class), ("src", &src), ("alt", &alt)],
                false,
            ))
        }
    }
}

fn require_resolver<'a>(
    state: &RenderState<'a>,
    capability: &'static str,
) -> Result<&'a dyn MentionResolver, ChatmarkError> {
    state
        .resolver
        .ok_or(ChatmarkError::MissingCapability { capability })
}

fn mention_span(content: &str) -> String {
    html_tag("span", content, &[("class", "d-mention d-user")], true)
}

/// Builds an HTML tag with sanitized attribute values. `content` is assumed to
/// be markup already and is included verbatim.
fn html_tag(tag: &str, content: &str, attributes: &[(&str, &str)], closed: bool) -> String {
    let mut out = String::new();
    out.push('<');
    out.push_str(tag);
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&sanitize_text(value));
        out.push('"');
    }
    out.push('>');
    if closed {
        out.push_str(content);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
    out
}

/// HTML-escapes the characters `<>&"'`.
pub fn sanitize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_escapes_markup_characters() {
        assert_eq!(
            sanitize_text(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#x27;"
        );
    }

    #[test]
    fn sanitize_leaves_ordinary_text_alone() {
        assert_eq!(sanitize_text("héllo world"), "héllo world");
    }

    #[test]
    fn html_tag_escapes_attribute_values() {
        assert_eq!(
            html_tag("span", "x", &[("title", "a\"b")], true),
            r#"<span title="a&quot;b">x</span>"#
        );
    }

    #[test]
    fn html_tag_unclosed_omits_content_and_closer() {
        assert_eq!(
            html_tag("img", "ignored", &[("src", "u")], false),
            r#"<img src="u">"#
        );
    }
}
