//! Balance scanners.
//!
//! Pure functions over a token buffer. None of them fail: on malformed input
//! they fall back to the end of the buffer.

use crate::ir::Element;
use std::ops::Range;

/// Anything the scanners can read token text from.
pub trait TokenText {
    /// Token text, `None` for an already-built node.
    fn text(&self) -> Option<&str>;

    fn is(&self, token: &str) -> bool {
        self.text() == Some(token)
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        self.text().is_some_and(|t| t.eq_ignore_ascii_case(keyword))
    }
}

impl TokenText for Element {
    fn text(&self) -> Option<&str> {
        self.as_token()
    }
}

impl TokenText for String {
    fn text(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl TokenText for &str {
    fn text(&self) -> Option<&str> {
        Some(*self)
    }
}

/// Index where the paren depth, counted from `start`, first returns to zero.
///
/// Falls back to the last index when the buffer ends first.
pub fn matching_bracket<T: TokenText>(tokens: &[T], start: usize) -> usize {
    let mut depth: i64 = 0;
    for (k, token) in tokens.iter().enumerate().skip(start) {
        match token.text() {
            Some("(") => depth += 1,
            Some(")") => depth -= 1,
            _ => {}
        }
        if depth == 0 {
            return k;
        }
    }
    tokens.len().saturating_sub(1)
}

/// Index of the `then`/`do` keyword closing the condition that starts at `start`.
///
/// Each nested `if` claims one terminator before the outer condition can
/// end, and terminators inside parentheses never end it. Returns the buffer
/// length when no terminator is found.
pub fn condition_end<T: TokenText>(tokens: &[T], start: usize) -> usize {
    let mut depth: i64 = 0;
    let mut pending_ifs = 0usize;
    for (k, token) in tokens.iter().enumerate().skip(start) {
        if token.is("(") {
            depth += 1;
        } else if token.is(")") {
            depth -= 1;
        } else if token.is_keyword("if") {
            pending_ifs += 1;
        } else if token.is_keyword("then") || token.is_keyword("do") {
            if pending_ifs > 0 {
                pending_ifs -= 1;
            } else if depth <= 0 {
                return k;
            }
        }
    }
    tokens.len()
}

/// Range of the consequent clause beginning right after `then`.
///
/// - `then ( ... )` and `then` newline `( ... )`: the parenthesized group.
/// - `then` newline `stmt`: the statement on the next line.
/// - `then stmt`: the rest of the statement on the same line.
pub fn then_clause<T: TokenText>(tokens: &[T], start: usize) -> Range<usize> {
    let len = tokens.len();
    if start >= len {
        return len..len;
    }
    if tokens[start].is("(") {
        return start..matching_bracket(tokens, start) + 1;
    }
    if tokens[start].is("\n") {
        let next = start + 1;
        if tokens.get(next).is_some_and(|t| t.is("(")) {
            return next..matching_bracket(tokens, next) + 1;
        }
        return next..statement_end(tokens, next);
    }
    start..statement_end(tokens, start)
}

/// End (exclusive) of the single statement starting at `start`.
///
/// A statement ends at a newline outside parentheses, at an unmatched close
/// paren, or at an `else` not claimed by an `if` nested in the statement.
pub fn statement_end<T: TokenText>(tokens: &[T], start: usize) -> usize {
    let mut depth: i64 = 0;
    let mut pending_ifs = 0usize;
    for (k, token) in tokens.iter().enumerate().skip(start) {
        if token.is("(") {
            depth += 1;
        } else if token.is(")") {
            if depth == 0 {
                return k;
            }
            depth -= 1;
        } else if depth > 0 {
            continue;
        } else if token.is("\n") {
            return k;
        } else if token.is_keyword("if") {
            pending_ifs += 1;
        } else if token.is_keyword("else") {
            if pending_ifs == 0 {
                return k;
            }
            pending_ifs -= 1;
        }
    }
    tokens.len()
}

/// Index of the first `,` or newline at which `(`, `[` and `{` are all balanced.
pub fn separator_end<T: TokenText>(tokens: &[T], start: usize) -> usize {
    let (mut parens, mut brackets, mut braces) = (0i64, 0i64, 0i64);
    for (k, token) in tokens.iter().enumerate().skip(start) {
        match token.text() {
            Some("(") => parens += 1,
            Some(")") => parens -= 1,
            Some("[") => brackets += 1,
            Some("]") => brackets -= 1,
            Some("{") => braces += 1,
            Some("}") => braces -= 1,
            Some(",") | Some("\n") if parens == 0 && brackets == 0 && braces == 0 => return k,
            _ => {}
        }
    }
    tokens.len()
}

/// Inside range of the group opened at `open` and the index just past it.
///
/// An unterminated group runs to the end of the buffer.
pub fn group_range<T: TokenText>(tokens: &[T], open: usize) -> (Range<usize>, usize) {
    let close = matching_bracket(tokens, open);
    if close > open && tokens[close].is(")") {
        (open + 1..close, close + 1)
    } else {
        let len = tokens.len();
        ((open + 1).min(len)..len, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<&str> {
        src.split(' ').collect()
    }

    #[test]
    fn test_matching_bracket_nested() {
        let tokens = toks("( a ( b ) c ) d");
        assert_eq!(matching_bracket(&tokens, 0), 6);
        assert_eq!(matching_bracket(&tokens, 2), 4);
    }

    #[test]
    fn test_matching_bracket_unbalanced_falls_back() {
        let tokens = toks("( a ( b c");
        assert_eq!(matching_bracket(&tokens, 0), tokens.len() - 1);
        let empty: Vec<&str> = Vec::new();
        assert_eq!(matching_bracket(&empty, 0), 0);
    }

    #[test]
    fn test_condition_end_nested_if() {
        let tokens = toks("( if b then c else d ) then e");
        assert_eq!(condition_end(&tokens, 0), 8);
        let tokens = toks("if b then c then d");
        assert_eq!(condition_end(&tokens, 0), 4);
        let tokens = toks("x > 0 do y");
        assert_eq!(condition_end(&tokens, 0), 3);
    }

    #[test]
    fn test_condition_end_missing_terminator() {
        let tokens = toks("x > 0");
        assert_eq!(condition_end(&tokens, 0), 3);
    }

    #[test]
    fn test_then_clause_forms() {
        let same_line = toks("y = 1 else y = 2");
        assert_eq!(then_clause(&same_line, 0), 0..3);

        let next_line = vec!["\n", "y", "=", "1", "\n", "z"];
        assert_eq!(then_clause(&next_line, 0), 1..4);

        let block = vec!["\n", "(", "y", "\n", "z", ")", "\n", "else"];
        assert_eq!(then_clause(&block, 0), 1..6);

        let inline_block = toks("( if b then c ) else d");
        assert_eq!(then_clause(&inline_block, 0), 0..6);

        assert_eq!(then_clause(&inline_block, 20), 8..8);
    }

    #[test]
    fn test_statement_end_nested_else() {
        let tokens = toks("if b then c else d else e");
        assert_eq!(statement_end(&tokens, 0), 6);
        let tokens = toks("f ( a \n b ) \n c");
        assert_eq!(statement_end(&tokens, 0), 6);
    }

    #[test]
    fn test_separator_end_balances_three_kinds() {
        let tokens = toks("a = # ( 1 , [ 2 , { 3 , 4 } ] ) , b");
        assert_eq!(separator_end(&tokens, 0), 16);
        let tokens = toks("x = 1 \n y");
        assert_eq!(separator_end(&tokens, 0), 3);
    }

    #[test]
    fn test_group_range() {
        let tokens = toks("( a b ) c");
        assert_eq!(group_range(&tokens, 0), (1..3, 4));
        let tokens = toks("( a b");
        assert_eq!(group_range(&tokens, 0), (1..3, 3));
    }
}
