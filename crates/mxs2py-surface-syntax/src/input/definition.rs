//! Function and struct definitions.

use super::block::{BlockReader, Buffer};
use super::normalize::is_word;
use super::scan::{group_range, matching_bracket, separator_end, statement_end};
use crate::error::ConversionError;
use crate::ir::{Element, NodeId, NodeKind};
use std::ops::Range;
use tracing::debug;

/// Struct members with no Python counterpart.
const ACCESS_MODIFIERS: &[&str] = &["private", "public"];

impl BlockReader<'_> {
    /// `fn name p1 p2 key:default = body` with the keyword at `i`.
    pub(super) fn function_def(
        &mut self,
        tokens: &mut Buffer,
        i: usize,
        indent: usize,
    ) -> Result<(NodeId, usize), ConversionError> {
        let name = token_at(tokens, i + 1);
        let mut params = Vec::new();
        let mut named = Vec::new();
        let mut k = i + 2;

        while k < tokens.len() && !tokens[k].is("=") {
            // newlines and by-reference markers carry nothing
            let Some(param) = tokens[k].as_token().filter(|t| is_word(t)).map(str::to_owned)
            else {
                k += 1;
                continue;
            };
            if !tokens.get(k + 1).is_some_and(|t| t.is(":")) {
                params.push(self.push(NodeKind::Variable { name: param, value: None }, indent));
                k += 1;
                continue;
            }
            let has_default = tokens
                .get(k + 2)
                .is_some_and(|t| !["\n", "=", ")"].iter().any(|stop| t.is(stop)));
            let value = if has_default {
                self.reduce_operand(tokens, k + 2, indent)?;
                Some(tokens[k + 2].clone())
            } else {
                None
            };
            named.push(self.push(NodeKind::Variable { name: param, value }, indent));
            k += if has_default { 3 } else { 2 };
        }

        let (range, end) = definition_body(tokens, k);
        let body = self.block(tokens[range].to_vec(), indent + 1, "Function body")?;
        debug!(name = %name, params = params.len() + named.len(), indent, "function definition");
        let node = self.push(
            NodeKind::FunctionDef {
                name,
                params,
                named,
                body,
            },
            indent,
        );
        Ok((node, end))
    }

    /// `struct Name ( members )` with the keyword at `i`.
    pub(super) fn struct_def(
        &mut self,
        tokens: &mut Buffer,
        i: usize,
        indent: usize,
    ) -> Result<(NodeId, usize), ConversionError> {
        let name = token_at(tokens, i + 1);
        let mut open = i + 2;
        while tokens.get(open).is_some_and(|t| t.is("\n")) {
            open += 1;
        }
        if !tokens.get(open).is_some_and(|t| t.is("(")) {
            let node = self.push(
                NodeKind::StructDef {
                    name,
                    properties: Vec::new(),
                    methods: Vec::new(),
                },
                indent,
            );
            return Ok((node, (i + 2).min(tokens.len())));
        }

        let (inner, end) = group_range(tokens, open);
        let mut members = tokens[inner].to_vec();
        let mut properties = Vec::new();
        let mut methods = Vec::new();
        let mut k = 0;

        while k < members.len() {
            let Some(text) = members[k].as_token().map(str::to_owned) else {
                k += 1;
                continue;
            };
            if text.eq_ignore_ascii_case("fn") || text.eq_ignore_ascii_case("function") {
                let (method, next) = self.function_def(&mut members, k, indent + 1)?;
                methods.push(method);
                k = next;
                continue;
            }
            if text.eq_ignore_ascii_case("on") {
                // event handlers are not translated
                k = skip_handler(&members, k);
                continue;
            }
            if text == "(" {
                k = group_range(&members, k).1;
                continue;
            }
            if !is_word(&text) || ACCESS_MODIFIERS.iter().any(|m| m.eq_ignore_ascii_case(&text)) {
                k += 1;
                continue;
            }

            if members.get(k + 1).is_some_and(|t| t.is("=")) {
                let start = k + 2;
                let stop = separator_end(&members, start);
                let value = self.block(members[start..stop].to_vec(), indent + 2, "Property")?;
                properties.push(self.push(
                    NodeKind::Variable {
                        name: text,
                        value: Some(Element::Node(value)),
                    },
                    indent + 2,
                ));
                k = stop;
            } else {
                properties.push(self.push(NodeKind::Variable { name: text, value: None }, indent + 2));
                k += 1;
            }
        }

        debug!(
            name = %name,
            properties = properties.len(),
            methods = methods.len(),
            "struct definition"
        );
        let node = self.push(
            NodeKind::StructDef {
                name,
                properties,
                methods,
            },
            indent,
        );
        Ok((node, end))
    }
}

fn token_at(tokens: &Buffer, k: usize) -> String {
    tokens
        .get(k)
        .and_then(Element::as_token)
        .unwrap_or_default()
        .to_string()
}

/// Body range of a definition whose `=` is at `eq`, and the index past it.
///
/// A parenthesized body spans the group, including both parens; otherwise the
/// body is the single statement after the `=`, cut short by a top-level comma.
fn definition_body(tokens: &Buffer, eq: usize) -> (Range<usize>, usize) {
    let len = tokens.len();
    if eq >= len {
        return (len..len, len);
    }
    let mut start = eq + 1;
    while tokens.get(start).is_some_and(|t| t.is("\n")) {
        start += 1;
    }
    if tokens.get(start).is_some_and(|t| t.is("(")) {
        let close = matching_bracket(tokens, start);
        return (start..close + 1, close + 1);
    }
    let start = start.min(len);
    let stop = statement_end(tokens, start).min(separator_end(tokens, start));
    (start..stop, stop)
}

/// Index past an `on <event> do ( ... )` handler starting at `k`.
fn skip_handler(members: &Buffer, k: usize) -> usize {
    let mut j = k + 1;
    while j < members.len() && !members[j].is("(") && !members[j].is("\n") {
        j += 1;
    }
    if members.get(j).is_some_and(|t| t.is("(")) {
        group_range(members, j).1
    } else {
        j
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Tree;
    use crate::registry::IdentifierRegistry;

    fn parse(src: &str) -> (Tree, Vec<Element>) {
        let registry = IdentifierRegistry::new();
        let tokens = src.split(' ').map(Element::token).collect();
        let mut reader = BlockReader::new(&registry);
        let block = reader.block(tokens, 0, "Block").unwrap();
        let tree = reader.finish(block);
        let items = tree.block_items(block).to_vec();
        (tree, items)
    }

    #[test]
    fn test_function_with_named_params() {
        let (tree, items) = parse("fn add a & b step : 1 = ( a + b \n ) \n z");
        assert_eq!(items.len(), 3);
        let NodeKind::FunctionDef {
            name,
            params,
            named,
            body,
        } = tree.kind(items[0].as_node().unwrap())
        else {
            panic!("expected function definition");
        };
        assert_eq!(name, "add");
        assert_eq!(params.len(), 2);
        assert_eq!(
            tree.kind(named[0]),
            &NodeKind::Variable {
                name: "step".into(),
                value: Some(Element::token("1"))
            }
        );
        assert_eq!(tree.node(*body).indent, 1);
        assert_eq!(tree.block_items(*body).len(), 3);
    }

    #[test]
    fn test_function_single_statement_body() {
        let (tree, items) = parse("fn f x = x * 2 \n y");
        assert_eq!(items.len(), 3);
        let NodeKind::FunctionDef { body, .. } = tree.kind(items[0].as_node().unwrap()) else {
            panic!("expected function definition");
        };
        assert_eq!(tree.block_items(*body).len(), 1);
    }

    #[test]
    fn test_struct_members() {
        let (tree, items) =
            parse("struct Foo ( private a = 1 , b , fn get = a , on create do ( x ) )");
        assert_eq!(items.len(), 1);
        let NodeKind::StructDef {
            name,
            properties,
            methods,
        } = tree.kind(items[0].as_node().unwrap())
        else {
            panic!("expected struct definition");
        };
        assert_eq!(name, "Foo");
        let names: Vec<_> = properties.iter().map(|p| tree.kind(*p).name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(methods.len(), 1);
        assert_eq!(tree.node(methods[0]).indent, 1);
    }
}
