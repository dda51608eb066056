//! The scanning loop: drives the rule table over an input string and produces
//! the ordered node sequence.

use crate::ast::{AstNode, Span, Spanned};
use crate::errors::{no_rule_matched, stalled_rule, ChatmarkError};
use crate::rules::{rule_set, Rule, RuleMatch, Tier};

/// Tokenizes a message into its AST.
///
/// At each offset the rule table is tried in tier-then-declaration order; the
/// first successful match appends a spanned node and advances the offset by
/// the full matched length. Empty input yields an empty AST. A failed offset
/// or a zero-length match is a defect in the rule table and aborts the whole
/// parse; no partial AST is returned.
///
/// Single pass, synchronous, no shared mutable state; concurrent calls are
/// safe without locking.
pub fn tokenize(input: &str) -> Result<Vec<AstNode>, ChatmarkError> {
    let rules = rule_set();
    let mut nodes = Vec::new();
    let mut offset = 0;

    while offset < input.len() {
        let rest = &input[offset..];
        let Some((rule, matched)) = first_match(rules, rest)? else {
            return Err(no_rule_matched(input, offset));
        };
        if matched.len == 0 {
            return Err(stalled_rule(rule.name, input, offset));
        }
        nodes.push(Spanned {
            value: matched.node,
            span: Span {
                start: offset,
                end: offset + matched.len,
            },
        });
        offset += matched.len;
    }

    Ok(nodes)
}

/// First-match-wins lookup: inline tier first, then fallback, declaration
/// order within each tier. Never sort the table; the order is load-bearing.
fn first_match<'r>(
    rules: &'r [Rule],
    rest: &str,
) -> Result<Option<(&'r Rule, RuleMatch)>, ChatmarkError> {
    for tier in [Tier::Inline, Tier::Fallback] {
        for rule in rules.iter().filter(|r| r.tier == tier) {
            if let Some(matched) = rule.try_match(rest)? {
                return Ok(Some((rule, matched)));
            }
        }
    }
    Ok(None)
}
