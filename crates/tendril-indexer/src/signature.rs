//! One-line signature rendering
//!
//! Signatures are rebuilt from a declaration's non-trivia tokens, so the
//! rendered text (and the interface hash built on it) does not move when a
//! declaration is reformatted or commented.

use tendril_core::SyntaxNode;

use crate::node::TsNode;

/// Tokens followed by a space.
const SPACE_AFTER: &[&str] = &[
    ",", ";", ":", "=>", "=", "|", "&", "?:", "extends", "implements", "keyof", "typeof",
    "readonly", "new",
];

/// Tokens preceded by a space.
const SPACE_BEFORE: &[&str] = &["=>", "=", "|", "&", "{", "extends", "implements"];

/// Tokens that attach directly to a preceding `}`.
const CLOSE_AFTER_BRACE: &[&str] = &[")", "]", ">", ",", ";", ":", "?"];

/// Non-trivia tokens of `node` for display. String literals stay whole so
/// their quotes hug their content.
pub fn tokens(node: &TsNode<'_>) -> Vec<String> {
    let mut out = Vec::new();
    collect(node, &mut out);
    out
}

fn collect(node: &TsNode<'_>, out: &mut Vec<String>) {
    if node.is_trivia() {
        return;
    }
    if node.kind() == "string" {
        out.push(node.text().to_string());
        return;
    }
    let children = node.children();
    if children.is_empty() {
        let text = node.text().trim();
        if !text.is_empty() {
            out.push(text.to_string());
        }
        return;
    }
    for child in &children {
        collect(child, out);
    }
}

/// Join tokens with the spacing a person would write.
pub fn render_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    let mut prev: Option<&str> = None;
    for token in tokens {
        let token = token.as_ref();
        if let Some(p) = prev {
            if needs_space(p, token) {
                out.push(' ');
            }
        }
        out.push_str(token);
        prev = Some(token);
    }
    out
}

fn needs_space(prev: &str, next: &str) -> bool {
    if SPACE_AFTER.contains(&prev) || SPACE_BEFORE.contains(&next) {
        return true;
    }
    if prev == "}" && !CLOSE_AFTER_BRACE.contains(&next) {
        return true;
    }
    ends_with_word(prev) && starts_with_word(next)
}

fn ends_with_word(s: &str) -> bool {
    s.chars().last().is_some_and(is_word_char)
}

fn starts_with_word(s: &str) -> bool {
    s.chars().next().is_some_and(is_word_char)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '"' || c == '\''
}

/// Rendered tokens of an optional node.
pub fn render(node: Option<TsNode<'_>>) -> String {
    node.map(|n| render_tokens(&tokens(&n))).unwrap_or_default()
}
