//! Static mapping tables.

use crate::ir::CastType;

/// Multi-character operators merged into one token before parsing.
///
/// Three-character sequences come first so that `**=` is not split into
/// `**` followed by `=`.
pub const LIGATURES: &[&str] = &[
    "**=", ">>=", "<<=", "#()", "#{}", "==", "!=", ">=", "<=", "+=", "-=", "*=", "/=", "%=", "::",
    "**", "//", "&=", "|=", "^=", ":=", "<<", ">>", "/*", "*/",
];

/// Single-character operators. Function-call arguments stop at any of these.
pub const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "^", "&", "|", "<", ">", "=", "!", "~",
];

/// Storage qualifiers and the scope marker, dropped by the normalizer.
pub const QUALIFIERS: &[&str] = &["local", "global", "persistent", "::"];

/// Keywords that never name a value, so never index, cast or own members.
pub const RESERVED_WORDS: &[&str] = &[
    "return", "if", "then", "else", "do", "for", "in", "collect", "while", "where", "to", "by",
    "of", "and", "or", "not", "try", "catch", "exit", "continue", "case", "fn", "function",
];

/// Literal tokens and their Python spelling. Keys are matched case-insensitively.
pub const LITERALS: &[(&str, &str)] = &[
    ("true", "True"),
    ("false", "False"),
    ("undefined", "None"),
    ("#()", "[]"),
    ("#{}", "rt.BitArray()"),
    ("unsupplied", "rt.unsupplied"),
    ("ok", "rt.OK"),
];

/// `as` type names and the cast they produce.
pub const CAST_TYPES: &[(&str, CastType)] = &[
    ("string", CastType::Str),
    ("stringstream", CastType::StringStream),
    ("integer", CastType::Int),
    ("float", CastType::Float),
    ("name", CastType::Name),
];

/// Namespace prefix of host runtime calls.
pub const RUNTIME_PREFIX: &str = "rt.";

pub fn is_ligature(token: &str) -> bool {
    LIGATURES.contains(&token)
}

pub fn is_operator(token: &str) -> bool {
    OPERATORS.contains(&token)
}

pub fn is_reserved(token: &str) -> bool {
    RESERVED_WORDS.iter().any(|w| w.eq_ignore_ascii_case(token))
}

pub fn is_qualifier(token: &str) -> bool {
    QUALIFIERS.iter().any(|q| q.eq_ignore_ascii_case(token))
}

pub fn literal(token: &str) -> Option<&'static str> {
    LITERALS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(token))
        .map(|(_, value)| *value)
}

pub fn cast_type(name: &str) -> Option<CastType> {
    CAST_TYPES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, cast)| *cast)
}
