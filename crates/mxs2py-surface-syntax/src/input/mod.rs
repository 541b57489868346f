//! MAXScript reader: source text into a node arena.
//!
//! ```text
//! source ─lexer─> tokens ─normalize─> tokens ─renames─> Block engine ─> Tree
//! ```

pub mod lexer;
pub mod normalize;
pub mod scan;
pub mod tables;

mod block;
mod call;
mod collection;
mod control;
mod definition;

use crate::error::ConversionError;
use crate::ir::{Element, Tree};
use crate::registry::IdentifierRegistry;
use block::BlockReader;
use tracing::debug;

/// Parse MAXScript source into a [`Tree`] whose body is the top-level Block.
///
/// The registry decides which identifiers start function calls and which of
/// those are host built-ins.
pub fn read_maxscript(
    source: &str,
    registry: &IdentifierRegistry,
) -> Result<Tree, ConversionError> {
    let mut tokens = normalize::normalize(lexer::lex(source));
    normalize::apply_renames(&mut tokens, registry);
    debug!(tokens = tokens.len(), "lexed MAXScript");

    let mut reader = BlockReader::new(registry);
    let buffer = tokens.into_iter().map(Element::Token).collect();
    let body = reader.block(buffer, 0, "Root")?;
    debug!(nodes = reader.tree_len(), "built node tree");
    Ok(reader.finish(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeKind;
    use crate::registry::Classification;

    #[test]
    fn test_body_is_attached_to_root() {
        let tree = read_maxscript("x = 1\ny = 2", &IdentifierRegistry::new()).unwrap();
        assert_eq!(tree.parent(tree.body()), Some(tree.root()));
        assert_eq!(tree.node(tree.body()).indent, 0);
        assert_eq!(tree.block_items(tree.body()).len(), 7);
    }

    #[test]
    fn test_every_node_has_a_parent_except_root() {
        let registry = IdentifierRegistry::new().with("print", Classification::BuiltinFunction);
        let tree = read_maxscript(
            "fn f a = (\n if a then print a else print 0\n)\nf 1",
            &registry,
        )
        .unwrap();
        for (id, node) in tree.iter() {
            if id == tree.root() {
                assert!(node.parent.is_none());
            } else {
                assert!(node.parent.is_some(), "orphan {:?}", node.kind);
            }
        }
    }

    #[test]
    fn test_renames_apply_before_parsing() {
        let mut registry = IdentifierRegistry::new();
        registry.add_rename("myHelper", "helper");
        registry.classify("helper", Classification::UserFunction);
        let tree = read_maxscript("myHelper 1", &registry).unwrap();
        let items = tree.block_items(tree.body());
        assert!(matches!(
            tree.kind(items[0].as_node().unwrap()),
            NodeKind::FunctionCall { name, builtin: false, .. } if name == "helper"
        ));
    }
}
