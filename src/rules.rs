//! Rule definitions and the ordering policy for the chat markup grammar.
//!
//! Each rule recognizes one lexical construct anchored at the current scan
//! position and builds the corresponding [`Node`]. The table built by
//! [`rule_set`] is process-wide immutable data, constructed once and never
//! mutated.
//!
//! Ordering policy: rules in [`Tier::Inline`] are tried before rules in
//! [`Tier::Fallback`], and within a tier the declaration order of the table
//! decides. The first rule to match wins, even when a later rule would have
//! matched a longer span, so the declaration order below is part of the
//! observable contract.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::ast::{BroadcastScope, Node, Platform};
use crate::errors::ChatmarkError;

/// Priority group of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Mention and emoji spans, tried first at every offset.
    Inline,
    /// Bridged at-mentions and the catch-all plain-text rule, tried only once
    /// every inline rule has failed.
    Fallback,
}

/// How a rule recognizes input at the current scan position.
enum Matcher {
    /// Anchored pattern; captures feed the build function.
    Pattern(Regex, fn(&Captures) -> Result<Node, ChatmarkError>),
    /// Hand-rolled scanner for the plain-text rule. Its grammar needs
    /// lookahead, which the `regex` crate deliberately does not support.
    PlainText,
}

/// A named matcher/builder pair defining one lexical construct.
pub struct Rule {
    pub name: &'static str,
    pub tier: Tier,
    matcher: Matcher,
}

/// A successful match: how many bytes of the remaining input it consumed and
/// the node it produced. `len` is always greater than zero.
pub struct RuleMatch {
    pub len: usize,
    pub node: Node,
}

impl Rule {
    fn pattern(
        name: &'static str,
        tier: Tier,
        pattern: &str,
        build: fn(&Captures) -> Result<Node, ChatmarkError>,
    ) -> Self {
        debug_assert!(pattern.starts_with('^'), "rule patterns must be anchored");
        let regex = Regex::new(pattern).expect("rule pattern must compile");
        Rule {
            name,
            tier,
            matcher: Matcher::Pattern(regex, build),
        }
    }

    /// Tries this rule against the remaining input. Rules only ever inspect
    /// the prefix of `rest`; a match that does not start at byte zero would
    /// break the tokenizer's forward-progress guarantee.
    pub fn try_match(&self, rest: &str) -> Result<Option<RuleMatch>, ChatmarkError> {
        match &self.matcher {
            Matcher::Pattern(regex, build) => match regex.captures(rest) {
                Some(caps) => {
                    let len = caps.get(0).map_or(0, |m| m.end());
                    let node = build(&caps)?;
                    Ok(Some(RuleMatch { len, node }))
                }
                None => Ok(None),
            },
            Matcher::PlainText => Ok(match_plain(rest)),
        }
    }
}

lazy_static! {
    /// The full rule table in tier-then-declaration order.
    static ref RULES: Vec<Rule> = build_rule_table();
}

/// Returns the process-wide rule table, already sorted by tier.
pub fn rule_set() -> &'static [Rule] {
    &RULES
}

fn build_rule_table() -> Vec<Rule> {
    vec![
        // Inline tier. Discord's native mention spans plus the KHL broadcast
        // token.
        Rule::pattern(
            "discord_user",
            Tier::Inline,
            r"^<@!?([0-9]+)>",
            build_discord_user,
        ),
        Rule::pattern(
            "discord_everyone",
            Tier::Inline,
            r"^@everyone",
            build_everyone,
        ),
        Rule::pattern("discord_here", Tier::Inline, r"^@here", build_here),
        // Emoji names are ASCII word characters only, as in the source
        // grammar; Unicode `\w` would accept names the original rejects.
        Rule::pattern(
            "discord_emoji",
            Tier::Inline,
            r"^<(a?):([0-9A-Za-z_]+):([0-9]+)>",
            build_discord_emoji,
        ),
        Rule::pattern(
            "khl_everyone",
            Tier::Inline,
            r"^\(met\)all\(met\)",
            build_everyone,
        ),
        // Fallback tier. Bridged textual at-mentions, then the catch-all.
        Rule::pattern(
            "at_dc",
            Tier::Fallback,
            r"^@\[DC\] [^\n]+?#[0-9]{4}",
            build_at_raw,
        ),
        Rule::pattern(
            "at_khl",
            Tier::Fallback,
            r"^@\[KHL\] ([^\n#]+)#([0-9]{4})",
            build_at_khl,
        ),
        Rule::pattern(
            "at_qq",
            Tier::Fallback,
            r"^@\[QQ\] [^\n]+?\([0-9]+\)",
            build_at_raw,
        ),
        Rule {
            name: "plain",
            tier: Tier::Fallback,
            matcher: Matcher::PlainText,
        },
    ]
}

// ============================================================================
// NODE BUILDERS
// ============================================================================

fn build_discord_user(caps: &Captures) -> Result<Node, ChatmarkError> {
    let id = capture(caps, 1, "discord_user")?;
    Ok(Node::Mention { id: id.to_string() })
}

fn build_everyone(_caps: &Captures) -> Result<Node, ChatmarkError> {
    Ok(Node::AtAll {
        scope: BroadcastScope::Everyone,
    })
}

fn build_here(_caps: &Captures) -> Result<Node, ChatmarkError> {
    Ok(Node::AtAll {
        scope: BroadcastScope::Here,
    })
}

fn build_discord_emoji(caps: &Captures) -> Result<Node, ChatmarkError> {
    let animated = capture(caps, 1, "discord_emoji")? == "a";
    let name = capture(caps, 2, "discord_emoji")?.to_string();
    let id = capture(caps, 3, "discord_emoji")?.to_string();
    Ok(Node::Emoji { animated, name, id })
}

/// DC and QQ mentions carry their full matched text; the grammar does not
/// split them further.
fn build_at_raw(caps: &Captures) -> Result<Node, ChatmarkError> {
    let full = capture(caps, 0, "at_raw")?;
    Ok(Node::At {
        source: None,
        username: full.to_string(),
        discriminator: None,
    })
}

fn build_at_khl(caps: &Captures) -> Result<Node, ChatmarkError> {
    let username = capture(caps, 1, "at_khl")?.to_string();
    let discriminator = capture(caps, 2, "at_khl")?.to_string();
    Ok(Node::At {
        source: Some(Platform::Khl),
        username,
        discriminator: Some(discriminator),
    })
}

fn capture<'t>(
    caps: &Captures<'t>,
    index: usize,
    rule: &'static str,
) -> Result<&'t str, ChatmarkError> {
    caps.get(index)
        .map(|m| m.as_str())
        .ok_or(ChatmarkError::MalformedCapture { rule })
}

// ============================================================================
// PLAIN-TEXT RULE
// ============================================================================

/// Greedy-but-bounded plain-text capture: consume at least one character, then
/// stop before the earliest later position where the stop set begins. Always
/// matches on non-empty input, which is what makes it a valid catch-all.
///
/// The stop set is a port of the original compound pattern
/// `^[\s\S]+?(?=[^0-9A-Za-z\sÀ-￿-]|\n\n|\n|\w+:\S|$)`: a special
/// character, a blank line, a newline, a `word:` immediately followed by
/// non-space, or end of input. Its edge-case behavior is easy to change
/// inadvertently, so the arms are kept exactly as specified rather than
/// re-derived.
///
/// Implemented as a single forward pass instead of a per-position lookahead
/// probe, which would go quadratic on long single-character runs. The `word:`
/// arm can match starting anywhere inside a contiguous word-character run
/// that ends in `:` followed by non-space, so the earliest stop for that arm
/// is the start of the run (but never position zero; one character must be
/// consumed).
fn match_plain(rest: &str) -> Option<RuleMatch> {
    if rest.is_empty() {
        return None;
    }

    let mut end = rest.len();
    let mut word_run_start: Option<usize> = None;
    for (index, c) in rest.char_indices() {
        // The word-colon arm first: its stop position precedes the colon
        // itself, so it beats the special-character stop on the colon.
        if c == ':' {
            if let Some(run_start) = word_run_start {
                let stop = run_start.max(1);
                let followed_by_non_space = rest[index + 1..]
                    .chars()
                    .next()
                    .is_some_and(|after| !after.is_whitespace());
                if stop < index && followed_by_non_space {
                    end = stop;
                    break;
                }
            }
        }
        if index > 0 && (is_special(c) || c == '\n') {
            end = index;
            break;
        }
        if is_word(c) {
            word_run_start.get_or_insert(index);
        } else {
            word_run_start = None;
        }
    }

    Some(RuleMatch {
        len: end,
        node: Node::Plain {
            text: rest[..end].to_string(),
        },
    })
}

/// Characters that terminate a plain run: anything that is not ASCII
/// alphanumeric, whitespace, a hyphen, or at/above U+00C0 (accented letters,
/// CJK, and everything beyond stay inside plain text).
fn is_special(c: char) -> bool {
    !(c.is_ascii_alphanumeric() || c.is_whitespace() || c == '-' || c >= '\u{00c0}')
}

/// The `\w` class of the original grammar (ASCII word characters).
fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_len(input: &str) -> usize {
        match_plain(input).map(|m| m.len).unwrap_or(0)
    }

    #[test]
    fn table_preserves_declaration_order() {
        let names: Vec<&str> = rule_set().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "discord_user",
                "discord_everyone",
                "discord_here",
                "discord_emoji",
                "khl_everyone",
                "at_dc",
                "at_khl",
                "at_qq",
                "plain",
            ]
        );
    }

    #[test]
    fn inline_tier_precedes_fallback_tier() {
        let first_fallback = rule_set()
            .iter()
            .position(|r| r.tier == Tier::Fallback)
            .unwrap();
        assert!(rule_set()[..first_fallback]
            .iter()
            .all(|r| r.tier == Tier::Inline));
        assert!(rule_set()[first_fallback..]
            .iter()
            .all(|r| r.tier == Tier::Fallback));
    }

    #[test]
    fn rules_are_anchored() {
        // khl_everyone was unanchored upstream; the anchor is deliberate here.
        let khl = rule_set().iter().find(|r| r.name == "khl_everyone").unwrap();
        assert!(khl.try_match("x (met)all(met)").unwrap().is_none());
        assert!(khl.try_match("(met)all(met)").unwrap().is_some());
    }

    #[test]
    fn plain_consumes_whole_unremarkable_text() {
        assert_eq!(plain_len("hello world"), "hello world".len());
    }

    #[test]
    fn plain_consumes_at_least_one_char_even_when_special() {
        // The catch-all property: a leading special character is consumed
        // unconditionally (at least one char, not exactly one), and the run
        // then extends to the next stop position.
        assert_eq!(plain_len("<b>"), 2);
        assert_eq!(plain_len("@"), 1);
        assert_eq!(plain_len("<"), 1);
    }

    #[test]
    fn plain_stops_before_special_char() {
        assert_eq!(plain_len("hello <@1>"), "hello ".len());
    }

    #[test]
    fn plain_stops_before_newline() {
        assert_eq!(plain_len("line1\nline2"), "line1".len());
    }

    #[test]
    fn plain_stops_before_word_colon_nonspace() {
        // Lookahead fires at the earliest position where `\w+:\S` begins.
        assert_eq!(plain_len("note:x"), 1);
        // A colon followed by a space does not trigger the stop.
        assert_eq!(plain_len("notes: here"), "notes".len());
    }

    #[test]
    fn plain_keeps_accented_and_cjk_text() {
        assert_eq!(plain_len("héllo 世界"), "héllo 世界".len());
    }

    #[test]
    fn plain_keeps_hyphens() {
        assert_eq!(plain_len("well-known"), "well-known".len());
    }

    #[test]
    fn plain_no_match_on_empty_input() {
        assert!(match_plain("").is_none());
    }

    #[test]
    fn plain_is_linear_on_pathological_input() {
        // Long single-character runs must not trigger super-linear
        // backtracking.
        let long = "a".repeat(100_000);
        assert_eq!(plain_len(&long), long.len());
    }
}
