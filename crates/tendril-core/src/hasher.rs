//! Formatting-insensitive fingerprints of declarations
//!
//! A declaration is reduced to the sequence of its non-trivia leaf tokens.
//! Whitespace between leaves and comments never reach the digest. Literal
//! content is kept verbatim, whitespace included.

use sha2::{Digest, Sha256};

use crate::model::HashPair;
use crate::syntax::SyntaxNode;

/// Joins tokens. Cannot occur inside identifiers or literals.
const SEPARATOR: char = '\0';

/// Non-trivia leaf tokens of `node`, depth-first in source order.
pub fn tokens<N: SyntaxNode>(node: &N) -> Vec<String> {
    let mut out = Vec::new();
    collect(node, &mut out);
    out
}

fn collect<N: SyntaxNode>(node: &N, out: &mut Vec<String>) {
    if node.is_trivia() {
        return;
    }
    let children = node.children();
    if children.is_empty() {
        if node.is_literal_content() {
            out.push(node.text().to_string());
            return;
        }
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

/// Fingerprint of what a declaration does.
pub fn implementation_hash<N: SyntaxNode>(declaration: &N) -> String {
    digest(&tokens(declaration))
}

/// Fingerprint of how a declaration is called: its rendered signature
/// followed by the tokens of its type or props node, if any.
pub fn interface_hash<N: SyntaxNode>(signature: &str, type_node: Option<&N>) -> String {
    let mut all = vec![signature.trim().to_string()];
    if let Some(node) = type_node {
        all.extend(tokens(node));
    }
    digest(&all)
}

pub fn hash_pair<N: SyntaxNode>(
    declaration: &N,
    signature: &str,
    type_node: Option<&N>,
) -> HashPair {
    HashPair::new(
        implementation_hash(declaration),
        interface_hash(signature, type_node),
    )
}

/// SHA-256 of the separator-joined tokens, as 64 lowercase hex digits.
pub fn digest<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut hasher = Sha256::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            let mut buf = [0u8; 4];
            hasher.update(SEPARATOR.encode_utf8(&mut buf).as_bytes());
        }
        hasher.update(token.as_ref().as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
