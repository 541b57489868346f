//! Function calls.

use super::block::{BlockReader, Buffer, splice};
use super::normalize::is_word;
use super::scan::group_range;
use super::tables::{is_ligature, is_operator};
use crate::error::ConversionError;
use crate::ir::{Element, NodeId, NodeKind};
use tracing::trace;

const ARGUMENT_STOPS: &[&str] = &["\n", ")", "]", ","];

const ARGUMENT_STOP_KEYWORDS: &[&str] = &[
    "and", "or", "then", "do", "else", "collect", "where", "to", "by", "in", "of", "catch", "as",
];

/// Whether `element` ends the argument list of a call.
fn ends_arguments(element: &Element) -> bool {
    let Some(text) = element.as_token() else {
        return false;
    };
    ARGUMENT_STOPS.contains(&text)
        || is_operator(text)
        || is_ligature(text)
        || ARGUMENT_STOP_KEYWORDS
            .iter()
            .any(|k| k.eq_ignore_ascii_case(text))
}

impl BlockReader<'_> {
    /// Build a call to the known function at `i`.
    ///
    /// Arguments are consumed greedily until a separator, operator or clause
    /// keyword. A synthetic `)` is inserted where the arguments end and
    /// consumed by the returned range, so nothing after the call is lost.
    pub(super) fn function_call(
        &mut self,
        tokens: &mut Buffer,
        i: usize,
        indent: usize,
    ) -> Result<(NodeId, usize), ConversionError> {
        let name = tokens[i].as_token().unwrap_or_default().to_string();
        let builtin = self.is_builtin_call(&name);
        let mut args = Vec::new();
        let mut k = i + 1;

        while k < tokens.len() {
            if tokens[k].is("(") {
                let (inner, next) = group_range(tokens, k);
                if inner.is_empty() {
                    // `foo()` takes no further arguments
                    k = next;
                    break;
                }
                let arg = self.block(tokens[inner].to_vec(), indent, "Argument")?;
                splice(tokens, k..next, arg);
                args.push(Element::Node(arg));
                k += 1;
                continue;
            }
            // `name:` is a keyword argument even when the name is a clause keyword
            let keyword = tokens[k]
                .as_token()
                .filter(|t| is_word(t) && tokens.get(k + 1).is_some_and(|n| n.is(":")))
                .map(str::to_owned);
            if let Some(key) = keyword {
                let node = self.keyword_argument(tokens, k, key, indent)?;
                args.push(Element::Node(node));
                k += 1;
                continue;
            }
            if ends_arguments(&tokens[k]) {
                break;
            }

            self.reduce_operand(tokens, k, indent)?;
            args.push(tokens[k].clone());
            k += 1;
        }

        tokens.insert(k.min(tokens.len()), Element::token(")"));
        trace!(name = %name, args = args.len(), builtin, indent, "function call");
        let node = self.push(
            NodeKind::FunctionCall {
                name,
                args,
                builtin,
            },
            indent,
        );
        Ok((node, k + 1))
    }

    /// `key: value` at `k`, spliced into a Variable node.
    fn keyword_argument(
        &mut self,
        tokens: &mut Buffer,
        k: usize,
        key: String,
        indent: usize,
    ) -> Result<NodeId, ConversionError> {
        let has_value = tokens
            .get(k + 2)
            .is_some_and(|t| !["\n", ")", "]", ","].iter().any(|stop| t.is(stop)));
        let value = if has_value {
            self.reduce_operand(tokens, k + 2, indent)?;
            Some(tokens[k + 2].clone())
        } else {
            None
        };
        let end = if has_value { k + 3 } else { k + 2 };
        let node = self.push(NodeKind::Variable { name: key, value }, indent);
        splice(tokens, k..end, node);
        Ok(node)
    }
}
