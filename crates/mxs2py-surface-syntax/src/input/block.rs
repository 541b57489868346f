//! The Block engine.
//!
//! A Block is reduced by one left-to-right scan over an owned buffer. Each
//! dispatch rule either advances the cursor or splices a range of the buffer
//! into a single node and says where scanning resumes:
//!
//! ```text
//!           i
//!           v
//! [ x , = , foo , 1 , \n , y , = , a , * , b ]
//! [ x , = , Call#4 , \n , y , = , a , * , b ]       known function: splice, resume at i + 1
//! [ x , = , Call#4 , \n , y , = , Stmt#5 ]          operator: fuse a * b, resume at i
//! ```
//!
//! Every splice replaces at least as many entries as the cursor moves back,
//! so the scan always terminates.

use super::normalize::is_word;
use super::scan::{group_range, matching_bracket};
use super::tables::{RUNTIME_PREFIX, cast_type, is_ligature, is_reserved};
use crate::error::ConversionError;
use crate::ir::{Element, GROUP_TAG, NodeId, NodeKind, Tree};
use crate::registry::IdentifierRegistry;
use std::ops::Range;
use tracing::trace;

pub(super) type Buffer = Vec<Element>;

/// Builds the node arena for one conversion.
pub(crate) struct BlockReader<'r> {
    registry: &'r IdentifierRegistry,
    tree: Tree,
}

impl<'r> BlockReader<'r> {
    pub(crate) fn new(registry: &'r IdentifierRegistry) -> Self {
        Self {
            registry,
            tree: Tree::new(),
        }
    }

    /// Attach `body` under the root and hand the arena over.
    pub(crate) fn finish(mut self, body: NodeId) -> Tree {
        self.tree.set_body(body);
        self.tree
    }

    pub(super) fn push(&mut self, kind: NodeKind, indent: usize) -> NodeId {
        trace!(node = kind.name(), indent, "built node");
        self.tree.push(kind, indent)
    }

    /// Reduce `tokens` into a dense Block node.
    pub(crate) fn block(
        &mut self,
        tokens: Buffer,
        indent: usize,
        tag: &'static str,
    ) -> Result<NodeId, ConversionError> {
        let mut tokens = trim(tokens);
        let mut i = 0;
        while i < tokens.len() && !tokens[i].is(")") {
            i = self.dispatch(&mut tokens, i, indent)?;
        }
        Ok(self.push(NodeKind::Block { tag, items: tokens }, indent))
    }

    /// Handle the entry at `i` and return the next cursor position.
    fn dispatch(
        &mut self,
        tokens: &mut Buffer,
        i: usize,
        indent: usize,
    ) -> Result<usize, ConversionError> {
        let Some(text) = tokens[i].as_token().map(str::to_owned) else {
            return Ok(i + 1);
        };
        let keyword = text.to_ascii_lowercase();

        match keyword.as_str() {
            "struct" => {
                let (node, end) = self.struct_def(tokens, i, indent)?;
                splice(tokens, i..end, node);
                return Ok(i + 1);
            }
            "fn" | "function" => {
                let (node, end) = self.function_def(tokens, i, indent)?;
                splice(tokens, i..end, node);
                return Ok(i + 1);
            }
            "mapped"
                if tokens
                    .get(i + 1)
                    .is_some_and(|t| t.is_keyword("fn") || t.is_keyword("function")) =>
            {
                tokens.remove(i);
                return Ok(i);
            }
            "if" => {
                let (node, end) = self.conditional(tokens, i, indent)?;
                splice(tokens, i..end, node);
                return Ok(i + 1);
            }
            "try" => {
                let (node, end) = self.try_except(tokens, i, indent)?;
                splice(tokens, i..end, node);
                return Ok(i + 1);
            }
            _ => {}
        }

        if self.starts_call(tokens, i) {
            let (node, end) = self.function_call(tokens, i, indent)?;
            splice(tokens, i..end, node);
            return Ok(i + 1);
        }

        if keyword == "as" && i > 0 && i + 1 < tokens.len() && is_operand(&tokens[i - 1]) {
            let (node, range) = self.cast(tokens, i, indent)?;
            let start = range.start;
            splice(tokens, range, node);
            return Ok(start + 1);
        }

        match text.as_str() {
            "[" => {
                let base = (i > 0 && is_operand(&tokens[i - 1])).then(|| i - 1);
                let base_element = base.map(|b| tokens[b].clone());
                let (node, end) = self.indexed_access(tokens, i, base_element, indent)?;
                let start = base.unwrap_or(i);
                splice(tokens, start..end, node);
                Ok(start + 1)
            }
            "#" => {
                self.sentinel(tokens, i, indent)?;
                Ok(i + 1)
            }
            "(" => {
                let (inner, end) = group_range(tokens, i);
                let node = self.block(tokens[inner].to_vec(), indent, GROUP_TAG)?;
                splice(tokens, i..end, node);
                Ok(i + 1)
            }
            _ if keyword == "for" => {
                let (node, end) = self.for_loop(tokens, i, indent)?;
                splice(tokens, i..end, node);
                Ok(i + 1)
            }
            "*" | "/" | "%"
                if i > 0
                    && i + 1 < tokens.len()
                    && !tokens[i - 1].is("\n")
                    && !tokens[i + 1].is("\n") =>
            {
                self.reduce_element(tokens, i + 1, indent)?;
                let parts = tokens[i - 1..i + 2].to_vec();
                let node = self.push(NodeKind::Statement { parts }, indent);
                splice(tokens, i - 1..i + 2, node);
                Ok(i)
            }
            "," => {
                tokens.remove(i);
                Ok(i)
            }
            "." => Ok(self.fuse_chain(tokens, i).unwrap_or(i + 1)),
            _ => Ok(i + 1),
        }
    }

    /// Whether `text`, or the last segment of a dotted chain, names a known function.
    fn is_known_call(&self, text: &str) -> bool {
        is_word(text)
            && (self.registry.is_known_function(text)
                || last_segment(text).is_some_and(|s| self.registry.is_known_function(s)))
    }

    /// A known function name not followed by a member access.
    fn starts_call(&self, tokens: &Buffer, k: usize) -> bool {
        tokens[k].as_token().is_some_and(|t| self.is_known_call(t))
            && !tokens.get(k + 1).is_some_and(|t| t.is("."))
    }

    pub(super) fn is_builtin_call(&self, name: &str) -> bool {
        self.registry.is_builtin(name)
            || last_segment(name).is_some_and(|s| self.registry.is_builtin(s))
    }

    /// `#(` starts an array literal; `#name` becomes a named-symbol constructor.
    pub(super) fn sentinel(
        &mut self,
        tokens: &mut Buffer,
        i: usize,
        indent: usize,
    ) -> Result<(), ConversionError> {
        let Some(next) = tokens.get(i + 1) else {
            return Ok(());
        };
        if next.is("(") {
            let (node, end) = self.array_literal(tokens, i, indent)?;
            splice(tokens, i..end, node);
        } else if let Some(name) = next.as_token().filter(|t| is_symbol_name(t)) {
            let symbol = name_literal(name);
            tokens.splice(i..i + 2, [Element::Token(symbol)]);
        }
        Ok(())
    }

    /// Reduce the single operand starting at `k` in place, including any
    /// member chain and index postfixes that follow it.
    pub(super) fn reduce_operand(
        &mut self,
        tokens: &mut Buffer,
        k: usize,
        indent: usize,
    ) -> Result<(), ConversionError> {
        if k >= tokens.len() {
            return Ok(());
        }
        if tokens[k].is("(") {
            let (inner, end) = group_range(tokens, k);
            let node = self.block(tokens[inner].to_vec(), indent, GROUP_TAG)?;
            splice(tokens, k..end, node);
        } else if tokens[k].is("[") {
            let (node, end) = self.indexed_access(tokens, k, None, indent)?;
            splice(tokens, k..end, node);
        } else if tokens[k].is("#") {
            self.sentinel(tokens, k, indent)?;
        } else if tokens[k].is("-") {
            let number = tokens
                .get(k + 1)
                .and_then(Element::as_token)
                .filter(|t| t.starts_with(|c: char| c.is_ascii_digit()))
                .map(|t| format!("-{t}"));
            if let Some(number) = number {
                tokens.splice(k..k + 2, [Element::Token(number)]);
            }
        }

        loop {
            if tokens.get(k + 1).is_some_and(|t| t.is("."))
                && self.fuse_chain(tokens, k + 1).is_some()
            {
                continue;
            }
            if tokens.get(k + 1).is_some_and(|t| t.is("[")) {
                let base = tokens[k].clone();
                let (node, end) = self.indexed_access(tokens, k + 1, Some(base), indent)?;
                splice(tokens, k..end, node);
                continue;
            }
            return Ok(());
        }
    }

    /// Like [`reduce_operand`](Self::reduce_operand), but a known function
    /// name starts a call and a trailing `as type` becomes a cast.
    pub(super) fn reduce_element(
        &mut self,
        tokens: &mut Buffer,
        k: usize,
        indent: usize,
    ) -> Result<(), ConversionError> {
        if k >= tokens.len() {
            return Ok(());
        }
        if self.starts_call(tokens, k) {
            let (node, end) = self.function_call(tokens, k, indent)?;
            splice(tokens, k..end, node);
        } else {
            self.reduce_operand(tokens, k, indent)?;
        }
        if tokens.get(k + 1).is_some_and(|t| t.is_keyword("as")) && k + 2 < tokens.len() {
            let node = self.cast_node(tokens[k].clone(), &tokens[k + 2], indent)?;
            splice(tokens, k..k + 3, node);
        }
        Ok(())
    }

    /// Rewrite `operand as type` ending at the `as` keyword at `i`.
    ///
    /// When the operand is preceded by a ligature operator (`x += y as float`),
    /// the whole comparison or assignment becomes one Statement.
    fn cast(
        &mut self,
        tokens: &Buffer,
        i: usize,
        indent: usize,
    ) -> Result<(NodeId, Range<usize>), ConversionError> {
        let cast = self.cast_node(tokens[i - 1].clone(), &tokens[i + 1], indent)?;
        let prefixed = i >= 3
            && tokens[i - 2].as_token().is_some_and(is_ligature)
            && is_operand(&tokens[i - 3]);
        if prefixed {
            let parts = vec![
                tokens[i - 3].clone(),
                tokens[i - 2].clone(),
                Element::Node(cast),
            ];
            let statement = self.push(NodeKind::Statement { parts }, indent);
            return Ok((statement, i - 3..i + 2));
        }
        Ok((cast, i - 1..i + 2))
    }

    fn cast_node(
        &mut self,
        operand: Element,
        type_token: &Element,
        indent: usize,
    ) -> Result<NodeId, ConversionError> {
        let type_name = type_token.as_token().unwrap_or("<expression>");
        let target = cast_type(type_name).ok_or_else(|| ConversionError::UnsupportedCast {
            type_name: type_name.to_string(),
        })?;
        Ok(self.push(NodeKind::Cast { target, operand }, indent))
    }

    /// Fuse `base (.ident)+` around the dot at `dot` into one entry.
    ///
    /// Returns the position of the fused entry so the caller can re-examine
    /// it, or `None` when there is nothing to fuse.
    pub(super) fn fuse_chain(&mut self, tokens: &mut Buffer, dot: usize) -> Option<usize> {
        if dot == 0 || !is_operand(&tokens[dot - 1]) {
            return None;
        }
        let mut end = dot;
        while tokens.get(end).is_some_and(|t| t.is("."))
            && tokens
                .get(end + 1)
                .and_then(Element::as_token)
                .is_some_and(is_word)
        {
            end += 2;
        }
        if end == dot {
            return None;
        }
        let start = dot - 1;
        let fused = self.fuse_members(tokens[start..end].to_vec());
        tokens.splice(start..end, [fused]);
        Some(start)
    }

    fn fuse_members(&mut self, parts: Vec<Element>) -> Element {
        let n = parts.len();
        if n == 1 {
            return parts.into_iter().next().unwrap_or_else(|| Element::token(""));
        }
        if n >= 3 && parts[n - 1].is_keyword("count") {
            let base = self.fuse_members(parts[..n - 2].to_vec());
            let call = self.push(
                NodeKind::FunctionCall {
                    name: "len".to_string(),
                    args: vec![base],
                    builtin: false,
                },
                0,
            );
            return Element::Node(call);
        }
        if parts.iter().all(|p| p.as_token().is_some()) {
            Element::Token(parts.iter().filter_map(Element::as_token).collect())
        } else {
            Element::Node(self.push(NodeKind::Chain { parts }, 0))
        }
    }

    pub(super) fn tree_len(&self) -> usize {
        self.tree.len()
    }
}

/// Replace `range` with a single node entry.
pub(super) fn splice(tokens: &mut Buffer, range: Range<usize>, node: NodeId) {
    let end = range.end.min(tokens.len());
    tokens.splice(range.start..end, [Element::Node(node)]);
}

/// Drop separators at both ends and redundant enclosing parens, to a fixed point.
fn trim(mut tokens: Buffer) -> Buffer {
    loop {
        let before = tokens.len();
        while tokens.first().is_some_and(|t| t.is("\n") || t.is(",")) {
            tokens.remove(0);
        }
        while tokens.len() > 1 && tokens.last().is_some_and(|t| t.is("\n") || t.is(",")) {
            tokens.pop();
        }
        let len = tokens.len();
        if len > 1
            && tokens[0].is("(")
            && tokens[len - 1].is(")")
            && matching_bracket(&tokens, 0) == len - 1
        {
            tokens.pop();
            tokens.remove(0);
        }
        if tokens.len() == before {
            return tokens;
        }
    }
}

/// Entries that can stand on the left of `.`, `[` or `as`.
pub(super) fn is_operand(element: &Element) -> bool {
    match element.as_token() {
        None => true,
        Some(t) => {
            (is_word(t) && !is_reserved(t))
                || t.starts_with(['"', '\''])
                || t == ")"
                || t == "]"
        }
    }
}

fn is_symbol_name(token: &str) -> bool {
    is_word(token) || token.starts_with('\'') || token.starts_with('"')
}

/// `#name` as a named-symbol constructor call.
fn name_literal(name: &str) -> String {
    if name.starts_with('\'') || name.starts_with('"') {
        format!("{RUNTIME_PREFIX}Name({name})")
    } else {
        format!("{RUNTIME_PREFIX}Name('{name}')")
    }
}

fn last_segment(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, last)| last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Classification;

    fn buffer(src: &str) -> Buffer {
        src.split(' ').map(Element::token).collect()
    }

    #[test]
    fn test_trim_strips_separators_and_enclosing_parens() {
        let trimmed = trim(buffer("\n , ( ( a b ) ) , \n"));
        assert_eq!(trimmed, buffer("a b"));
    }

    #[test]
    fn test_trim_keeps_non_enclosing_parens() {
        let trimmed = trim(buffer("( a ) + ( b )"));
        assert_eq!(trimmed, buffer("( a ) + ( b )"));
    }

    #[test]
    fn test_name_literal() {
        assert_eq!(name_literal("box"), "rt.Name('box')");
        assert_eq!(name_literal("'my obj'"), "rt.Name('my obj')");
    }

    #[test]
    fn test_member_chain_fuses_into_token() {
        let registry = IdentifierRegistry::new();
        let mut reader = BlockReader::new(&registry);
        let block = reader.block(buffer("x = a . b . c"), 0, "Block").unwrap();
        let tree = reader.finish(block);
        assert_eq!(tree.block_items(block), &buffer("x = a.b.c")[..]);
    }

    #[test]
    fn test_fused_chain_is_rescanned_for_calls() {
        let registry = IdentifierRegistry::new().with("foo", Classification::BuiltinFunction);
        let mut reader = BlockReader::new(&registry);
        let block = reader.block(buffer("obj . foo 1"), 0, "Block").unwrap();
        let tree = reader.finish(block);
        let items = tree.block_items(block);
        assert_eq!(items.len(), 1);
        let call = items[0].as_node().unwrap();
        assert!(matches!(
            tree.kind(call),
            NodeKind::FunctionCall { name, builtin: true, .. } if name == "obj.foo"
        ));
    }

    #[test]
    fn test_unknown_cast_type_fails() {
        let registry = IdentifierRegistry::new();
        let mut reader = BlockReader::new(&registry);
        let err = reader
            .block(buffer("x as point3"), 0, "Block")
            .unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnsupportedCast {
                type_name: "point3".into()
            }
        );
    }

    #[test]
    fn test_unbalanced_group_terminates() {
        let registry = IdentifierRegistry::new();
        let mut reader = BlockReader::new(&registry);
        let block = reader.block(buffer("x = ( ( a"), 0, "Block").unwrap();
        let tree = reader.finish(block);
        assert_eq!(tree.block_items(block).len(), 3);
    }
}
