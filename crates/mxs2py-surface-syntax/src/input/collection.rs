//! Array literals and indexed access.

use super::block::{BlockReader, Buffer};
use crate::error::ConversionError;
use crate::ir::{Element, NodeId, NodeKind};

impl BlockReader<'_> {
    /// `#( a, b, ... )` starting at the `#` at `i`.
    pub(super) fn array_literal(
        &mut self,
        tokens: &mut Buffer,
        i: usize,
        indent: usize,
    ) -> Result<(NodeId, usize), ConversionError> {
        let (elements, end) = self.collect_until(tokens, i + 2, ")", indent)?;
        let node = self.push(NodeKind::ArrayLiteral { elements }, indent);
        Ok((node, end))
    }

    /// `base[ ... ]` with the `[` at `open`. `base` is `None` when nothing
    /// indexable precedes the bracket.
    pub(super) fn indexed_access(
        &mut self,
        tokens: &mut Buffer,
        open: usize,
        base: Option<Element>,
        indent: usize,
    ) -> Result<(NodeId, usize), ConversionError> {
        let (indices, end) = self.collect_until(tokens, open + 1, "]", indent)?;
        let node = self.push(NodeKind::IndexedAccess { base, indices }, indent);
        Ok((node, end))
    }

    /// Reduce entries from `start` up to `close`, skipping separators.
    /// Returns them with the index just past `close`.
    fn collect_until(
        &mut self,
        tokens: &mut Buffer,
        start: usize,
        close: &str,
        indent: usize,
    ) -> Result<(Vec<Element>, usize), ConversionError> {
        let mut collected = Vec::new();
        let mut k = start;
        while k < tokens.len() && !tokens[k].is(close) {
            if tokens[k].is(",") || tokens[k].is("\n") {
                k += 1;
                continue;
            }
            self.reduce_element(tokens, k, indent)?;
            collected.push(tokens[k].clone());
            k += 1;
        }
        Ok((collected, (k + 1).min(tokens.len())))
    }
}
