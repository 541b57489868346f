//! MAXScript lexer.
//!
//! ```text
//! source ──strip_line_comments──> tokenize ──strip_token_comments──> merge_ligatures
//! ```

use super::tables::LIGATURES;
use regex::Regex;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'[^']*'|"[^"]*"|\w+|[^\s\w]|\n"#).expect("token pattern is valid")
});

/// Explicit statement separator.
pub const NEWLINE: &str = "\n";

/// Full lexing pipeline.
pub fn lex(source: &str) -> Vec<String> {
    let text = strip_line_comments(source);
    let mut tokens = tokenize(&text);
    strip_token_comments(&mut tokens);
    merge_ligatures(&mut tokens);
    tokens
}

/// Split text into word, string, punctuation and newline tokens.
///
/// Blank lines are dropped first, so a newline token always separates two
/// non-empty lines.
pub fn tokenize(text: &str) -> Vec<String> {
    let text = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    TOKEN
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Truncate each line at `--` unless it is inside a string literal.
pub fn strip_line_comments(text: &str) -> String {
    text.split('\n')
        .map(strip_line_comment)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_line_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '-' && line[i + 1..].starts_with('-') => return line[..i].trim_end(),
            None => {}
        }
    }
    line.trim_end()
}

/// Delete every `-` `-` pair and the tokens after it up to the next newline.
pub fn strip_token_comments(tokens: &mut Vec<String>) {
    let mut i = 0;
    while i + 1 < tokens.len() {
        if tokens[i] == "-" && tokens[i + 1] == "-" {
            let end = tokens[i..]
                .iter()
                .position(|t| t == NEWLINE)
                .map_or(tokens.len(), |offset| i + offset);
            tokens.drain(i..end);
        }
        i += 1;
    }
}

/// Merge every known multi-character operator into a single token.
pub fn merge_ligatures(tokens: &mut Vec<String>) {
    for ligature in LIGATURES {
        merge_sequence(tokens, ligature);
    }
}

/// Replace each run of single-character tokens spelling `sequence` with one token.
pub fn merge_sequence(tokens: &mut Vec<String>, sequence: &str) {
    let parts: Vec<String> = sequence.chars().map(String::from).collect();
    let n = parts.len();
    let mut i = 0;
    while i + n <= tokens.len() {
        if tokens[i..i + n] == parts[..] {
            tokens.splice(i..i + n, [sequence.to_string()]);
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tokenize_words_strings_and_newlines() {
        let tokens = tokenize("x = \"a b\"\n\n  y = 'c d'\n");
        assert_eq!(tokens, toks(&["x", "=", "\"a b\"", "\n", "y", "=", "'c d'"]));
    }

    #[test]
    fn test_tokenize_punctuation_is_single_char() {
        assert_eq!(tokenize("a==b"), toks(&["a", "=", "=", "b"]));
        assert_eq!(tokenize("#(1,2)"), toks(&["#", "(", "1", ",", "2", ")"]));
    }

    #[test]
    fn test_strip_line_comments() {
        assert_eq!(strip_line_comments("x = 1 -- note"), "x = 1");
        assert_eq!(strip_line_comments("s = \"a--b\" -- c"), "s = \"a--b\"");
        assert_eq!(strip_line_comments("-- only\ny = 2  "), "\ny = 2");
        assert_eq!(strip_line_comments("s = \"q\\\"--\" --x"), "s = \"q\\\"--\"");
    }

    #[test]
    fn test_strip_line_comments_idempotent() {
        let text = "a = 1 -- one\nb = \"--\" -- two\n-- three\nc = 'x--y'";
        let once = strip_line_comments(text);
        assert_eq!(strip_line_comments(&once), once);
    }

    #[test]
    fn test_strip_token_comments() {
        let mut tokens = toks(&["a", "-", "-", "b", "c", "\n", "d", "-", "-", "e"]);
        strip_token_comments(&mut tokens);
        assert_eq!(tokens, toks(&["a", "\n", "d"]));
    }

    #[test]
    fn test_merge_ligatures() {
        let mut tokens = toks(&["a", "*", "*", "=", "b", "=", "=", "c", "#", "(", ")"]);
        merge_ligatures(&mut tokens);
        assert_eq!(tokens, toks(&["a", "**=", "b", "==", "c", "#()"]));
    }

    #[test]
    fn test_lex_pipeline() {
        let tokens = lex("if a>=b then -- compare\n  x+=1");
        assert_eq!(
            tokens,
            toks(&["if", "a", ">=", "b", "then", "\n", "x", "+=", "1"])
        );
    }
}
