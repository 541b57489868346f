//! Token stream normalization.

use super::tables::{is_qualifier, literal};
use crate::registry::IdentifierRegistry;

const BLOCK_COMMENT_OPEN: &str = "/*";
const BLOCK_COMMENT_CLOSE: &str = "*/";

/// Drop block comments and qualifiers, then substitute literal spellings.
pub fn normalize(tokens: Vec<String>) -> Vec<String> {
    let mut tokens = tokens;
    strip_block_comments(&mut tokens);
    tokens
        .into_iter()
        .filter(|t| !is_qualifier(t))
        .map(|t| match literal(&t) {
            Some(replacement) => replacement.to_string(),
            None => t,
        })
        .collect()
}

/// Delete every `/* ... */` range, inclusive. An unterminated comment runs to the end.
pub fn strip_block_comments(tokens: &mut Vec<String>) {
    while let Some(start) = tokens.iter().position(|t| t == BLOCK_COMMENT_OPEN) {
        let end = tokens[start..]
            .iter()
            .position(|t| t == BLOCK_COMMENT_CLOSE)
            .map_or(tokens.len(), |offset| start + offset + 1);
        tokens.drain(start..end);
    }
}

/// Rewrite identifiers declared in the registry's rename table.
pub fn apply_renames(tokens: &mut [String], registry: &IdentifierRegistry) {
    for token in tokens.iter_mut() {
        if !is_word(token) {
            continue;
        }
        if let Some(target) = registry.rename(token) {
            *token = target.to_string();
        }
    }
}

/// Word tokens start with a letter, digit or underscore.
pub fn is_word(token: &str) -> bool {
    token
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
}
