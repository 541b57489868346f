//! Syntax node arena.
//!
//! The Block engine rewrites a flat buffer of [`Element`]s in place. An
//! element is either a raw token or a reference to a node already built in
//! the [`Tree`]. Nodes are stored in a flat arena and refer to each other by
//! [`NodeId`], so splicing a range of the buffer is just replacing it with a
//! single `Element::Node`.
//!
//! ```text
//! buffer:  [ "x", "=", "foo", "1", "\n", ... ]
//!                       └─ splice ─┘
//! buffer:  [ "x", "=", Node(7), "\n", ... ]      tree.nodes[7] = FunctionCall
//! ```

use serde::Serialize;

/// Tag of a Block built from a bare parenthesized group.
pub const GROUP_TAG: &str = "Group";

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One entry of a token buffer: a raw token or a built node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Token(String),
    Node(NodeId),
}

impl Element {
    pub fn token(text: impl Into<String>) -> Self {
        Element::Token(text.into())
    }

    /// Token text, or `None` for a node.
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Element::Token(text) => Some(text),
            Element::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Element::Token(_) => None,
            Element::Node(id) => Some(*id),
        }
    }

    /// Exact token comparison (punctuation, operators).
    pub fn is(&self, text: &str) -> bool {
        self.as_token() == Some(text)
    }

    /// Case-insensitive keyword comparison.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.as_token()
            .is_some_and(|text| text.eq_ignore_ascii_case(keyword))
    }
}

/// Target of an `as` cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CastType {
    Str,
    StringStream,
    Int,
    Float,
    Name,
}

impl CastType {
    /// Python constructor the cast renders as.
    pub fn constructor(self) -> &'static str {
        match self {
            CastType::Str => "str",
            CastType::StringStream => "stringstream",
            CastType::Int => "int",
            CastType::Float => "float",
            CastType::Name => "rt.Name",
        }
    }
}

/// Node payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Top-level parent of the program body.
    Root,
    /// Parameter or struct property.
    Variable {
        name: String,
        value: Option<Element>,
    },
    /// Space-joined expression fragment.
    Statement { parts: Vec<Element> },
    /// Newline-separated statements.
    Block {
        tag: &'static str,
        items: Vec<Element>,
    },
    ArrayLiteral { elements: Vec<Element> },
    IndexedAccess {
        base: Option<Element>,
        indices: Vec<Element>,
    },
    FunctionDef {
        name: String,
        params: Vec<NodeId>,
        named: Vec<NodeId>,
        body: NodeId,
    },
    FunctionCall {
        name: String,
        args: Vec<Element>,
        builtin: bool,
    },
    StructDef {
        name: String,
        properties: Vec<NodeId>,
        methods: Vec<NodeId>,
    },
    Conditional {
        condition: NodeId,
        consequent: NodeId,
        alternative: Option<NodeId>,
    },
    TryExcept {
        protected: NodeId,
        /// `None` when the handler group was empty.
        handler: Option<NodeId>,
    },
    ForLoop {
        header: NodeId,
        comprehension: bool,
        body: Option<NodeId>,
    },
    Cast { target: CastType, operand: Element },
    /// Member access on an already-built node, e.g. `(foo x).bar`.
    Chain { parts: Vec<Element> },
}

impl NodeKind {
    /// Source identifier for named nodes, a fixed tag otherwise.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::Variable { name, .. }
            | NodeKind::FunctionDef { name, .. }
            | NodeKind::FunctionCall { name, .. }
            | NodeKind::StructDef { name, .. } => name.as_str(),
            NodeKind::Statement { .. } => "Statement",
            NodeKind::Block { tag, .. } => *tag,
            NodeKind::ArrayLiteral { .. } => "Array",
            NodeKind::IndexedAccess { .. } => "Index",
            NodeKind::Conditional { .. } => "If",
            NodeKind::TryExcept { .. } => "Try",
            NodeKind::ForLoop { .. } => "For",
            NodeKind::Cast { .. } => "Cast",
            NodeKind::Chain { .. } => "Member",
        }
    }

    /// Direct children, in source order.
    pub fn children(&self) -> Vec<NodeId> {
        fn nodes(elements: &[Element]) -> impl Iterator<Item = NodeId> + '_ {
            elements.iter().filter_map(Element::as_node)
        }

        match self {
            NodeKind::Root => Vec::new(),
            NodeKind::Variable { value, .. } => value.iter().filter_map(Element::as_node).collect(),
            NodeKind::Statement { parts } | NodeKind::Chain { parts } => nodes(parts).collect(),
            NodeKind::Block { items, .. } => nodes(items).collect(),
            NodeKind::ArrayLiteral { elements } => nodes(elements).collect(),
            NodeKind::IndexedAccess { base, indices } => base
                .iter()
                .filter_map(Element::as_node)
                .chain(nodes(indices))
                .collect(),
            NodeKind::FunctionDef {
                params,
                named,
                body,
                ..
            } => params
                .iter()
                .chain(named)
                .copied()
                .chain(Some(*body))
                .collect(),
            NodeKind::FunctionCall { args, .. } => nodes(args).collect(),
            NodeKind::StructDef {
                properties,
                methods,
                ..
            } => properties.iter().chain(methods).copied().collect(),
            NodeKind::Conditional {
                condition,
                consequent,
                alternative,
            } => [Some(*condition), Some(*consequent), *alternative]
                .into_iter()
                .flatten()
                .collect(),
            NodeKind::TryExcept { protected, handler } => {
                [Some(*protected), *handler].into_iter().flatten().collect()
            }
            NodeKind::ForLoop { header, body, .. } => {
                [Some(*header), *body].into_iter().flatten().collect()
            }
            NodeKind::Cast { operand, .. } => operand.as_node().into_iter().collect(),
        }
    }
}

/// A node with its bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Indentation level of the line the node starts on.
    pub indent: usize,
    /// Enclosing node; diagnostic context only.
    pub parent: Option<NodeId>,
}

/// Arena of nodes produced by one conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
}

impl Tree {
    pub(crate) fn new() -> Self {
        let root = NodeId(0);
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                indent: 0,
                parent: None,
            }],
            root,
            body: root,
        }
    }

    /// Append a node and adopt its children.
    pub(crate) fn push(&mut self, kind: NodeKind, indent: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        for child in kind.children() {
            self.nodes[child.0].parent = Some(id);
        }
        self.nodes.push(Node {
            kind,
            indent,
            parent: None,
        });
        id
    }

    /// Attach the program body under the root.
    pub(crate) fn set_body(&mut self, body: NodeId) {
        self.nodes[body.0].parent = Some(self.root);
        self.body = body;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Top-level Block.
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Items of a Block node; empty for any other kind.
    pub fn block_items(&self, id: NodeId) -> &[Element] {
        match self.kind(id) {
            NodeKind::Block { items, .. } => items,
            _ => &[],
        }
    }
}
