//! Conditionals, try/catch and for loops.

use super::block::{BlockReader, Buffer};
use super::scan::{condition_end, matching_bracket, statement_end, then_clause};
use crate::error::ConversionError;
use crate::ir::{Element, NodeId, NodeKind};
use std::ops::Range;

impl BlockReader<'_> {
    /// `if cond then a [else b]` with the keyword at `i`.
    pub(super) fn conditional(
        &mut self,
        tokens: &mut Buffer,
        i: usize,
        indent: usize,
    ) -> Result<(NodeId, usize), ConversionError> {
        let cond_end = condition_end(tokens, i + 1);
        let condition = self.block(tokens[i + 1..cond_end].to_vec(), indent, "Condition")?;

        let then_range = then_clause(tokens, cond_end + 1);
        let consequent = self.block(
            tokens[then_range.clone()].to_vec(),
            indent + 1,
            "Then statement",
        )?;

        let mut k = then_range.end;
        if tokens.get(k).is_some_and(|t| t.is("\n"))
            && tokens.get(k + 1).is_some_and(|t| t.is_keyword("else"))
        {
            k += 1;
        }
        let (alternative, end) = if tokens.get(k).is_some_and(|t| t.is_keyword("else")) {
            let (alternative, end) = self.alternative(tokens, k + 1, indent)?;
            (Some(alternative), end)
        } else {
            (None, then_range.end)
        };

        let node = self.push(
            NodeKind::Conditional {
                condition,
                consequent,
                alternative,
            },
            indent,
        );
        Ok((node, end))
    }

    /// The `else` branch starting at `start`. A chained `else if` is nested
    /// one level deeper.
    fn alternative(
        &mut self,
        tokens: &mut Buffer,
        start: usize,
        indent: usize,
    ) -> Result<(NodeId, usize), ConversionError> {
        let mut start = start;
        if tokens.get(start).is_some_and(|t| t.is("\n")) {
            start += 1;
        }
        if tokens.get(start).is_some_and(|t| t.is_keyword("if")) {
            let (nested, end) = self.conditional(tokens, start, indent + 1)?;
            let wrapper = self.push(
                NodeKind::Block {
                    tag: "Else statement",
                    items: vec![Element::Node(nested)],
                },
                indent + 1,
            );
            return Ok((wrapper, end));
        }
        let (range, end) = clause(tokens, start);
        let node = self.block(tokens[range].to_vec(), indent + 1, "Else statement")?;
        Ok((node, end))
    }

    /// `try expr catch handler` with the keyword at `i`.
    pub(super) fn try_except(
        &mut self,
        tokens: &mut Buffer,
        i: usize,
        indent: usize,
    ) -> Result<(NodeId, usize), ConversionError> {
        let start = skip_newlines(tokens, i + 1);
        let (range, after) = if tokens.get(start).is_some_and(|t| t.is("(")) {
            clause(tokens, start)
        } else {
            let stop = (start..tokens.len())
                .find(|&k| tokens[k].is("\n") || tokens[k].is_keyword("catch"))
                .unwrap_or(tokens.len());
            (start.min(stop)..stop, stop)
        };
        let protected = self.block(tokens[range].to_vec(), indent + 1, "Try statement")?;

        let catch = skip_newlines(tokens, after);
        if !tokens.get(catch).is_some_and(|t| t.is_keyword("catch")) {
            let node = self.push(
                NodeKind::TryExcept {
                    protected,
                    handler: None,
                },
                indent,
            );
            return Ok((node, after));
        }

        let (range, end) = clause(tokens, skip_newlines(tokens, catch + 1));
        let handler = if is_empty_clause(tokens, &range) {
            None
        } else {
            Some(self.block(tokens[range].to_vec(), indent + 1, "Catch statement")?)
        };
        let node = self.push(NodeKind::TryExcept { protected, handler }, indent);
        Ok((node, end))
    }

    /// `for header do body` or `for header collect expr` with the keyword at `i`.
    pub(super) fn for_loop(
        &mut self,
        tokens: &mut Buffer,
        i: usize,
        indent: usize,
    ) -> Result<(NodeId, usize), ConversionError> {
        let mut depth: i64 = 0;
        let mut comprehension = false;
        let mut k = i + 1;
        while k < tokens.len() {
            let token = &tokens[k];
            if token.is("(") {
                depth += 1;
            } else if token.is(")") {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            } else if depth == 0 && (token.is("\n") || token.is_keyword("do")) {
                break;
            } else if depth == 0 && token.is_keyword("collect") {
                comprehension = true;
            }
            k += 1;
        }
        // a comprehension keeps `collect <expr>` in its header
        let header = self.block(tokens[i + 1..k].to_vec(), indent, "For header")?;

        if comprehension {
            let node = self.push(
                NodeKind::ForLoop {
                    header,
                    comprehension: true,
                    body: None,
                },
                indent,
            );
            return Ok((node, k));
        }

        let keyword = skip_newlines(tokens, k);
        let (body, end) = if tokens.get(keyword).is_some_and(|t| t.is_keyword("do")) {
            let (range, end) = clause(tokens, skip_newlines(tokens, keyword + 1));
            let body = self.block(tokens[range].to_vec(), indent + 1, "For body")?;
            (Some(body), end)
        } else {
            (None, k)
        };
        let node = self.push(
            NodeKind::ForLoop {
                header,
                comprehension: false,
                body,
            },
            indent,
        );
        Ok((node, end))
    }
}

fn skip_newlines(tokens: &Buffer, mut k: usize) -> usize {
    while tokens.get(k).is_some_and(|t| t.is("\n")) {
        k += 1;
    }
    k
}

/// A parenthesized group at `start`, or the statement starting there.
fn clause(tokens: &Buffer, start: usize) -> (Range<usize>, usize) {
    let len = tokens.len();
    if start >= len {
        return (len..len, len);
    }
    if tokens[start].is("(") {
        let close = matching_bracket(tokens, start);
        return (start..close + 1, close + 1);
    }
    let stop = statement_end(tokens, start);
    (start..stop, stop)
}

fn is_empty_clause(tokens: &Buffer, range: &Range<usize>) -> bool {
    tokens[range.clone()]
        .iter()
        .all(|t| t.is("(") || t.is(")") || t.is("\n"))
}
