//! Python writer for the node arena.
//!
//! Every node writes its first line without indentation; any further lines it
//! produces carry their full indentation. A Block in statement position (a
//! body) additionally indents its own first line.

use crate::input::tables::RUNTIME_PREFIX;
use crate::ir::{Element, GROUP_TAG, NodeId, NodeKind, Tree};

/// Rendering knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// One indentation unit.
    pub indent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }
}

/// Emits a [`Tree`] as Python source code.
pub struct PythonWriter<'t> {
    tree: &'t Tree,
    options: &'t RenderOptions,
    output: String,
}

impl<'t> PythonWriter<'t> {
    pub fn new(tree: &'t Tree, options: &'t RenderOptions) -> Self {
        Self {
            tree,
            options,
            output: String::new(),
        }
    }

    /// Emit the tree's body.
    pub fn emit(tree: &Tree, options: &RenderOptions) -> String {
        let mut writer = PythonWriter::new(tree, options);
        writer.write_body(tree.body());
        writer.output
    }

    fn write_indent(&mut self, level: usize) {
        for _ in 0..level {
            self.output.push_str(&self.options.indent);
        }
    }

    fn newline(&mut self, level: usize) {
        self.output.push('\n');
        self.write_indent(level);
    }

    /// Run `write` against an empty buffer and return what it produced.
    fn capture(&mut self, write: impl FnOnce(&mut Self)) -> String {
        let saved = std::mem::take(&mut self.output);
        write(self);
        std::mem::replace(&mut self.output, saved)
    }

    fn write_element(&mut self, element: &Element) {
        match element {
            Element::Token(text) => self.output.push_str(text),
            Element::Node(id) => self.write_node(*id),
        }
    }

    fn write_elements(&mut self, elements: &[Element], separator: &str) {
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                self.output.push_str(separator);
            }
            self.write_element(element);
        }
    }

    /// A Block in statement position; `pass` when it holds nothing.
    fn write_body(&mut self, id: NodeId) {
        let indent = self.tree.node(id).indent;
        self.write_indent(indent);
        if is_blank(self.tree.block_items(id)) {
            self.output.push_str("pass");
        } else {
            self.write_lines(id, indent);
        }
    }

    /// Optional body, `pass` one level below `indent` when absent.
    fn write_optional_body(&mut self, body: Option<NodeId>, indent: usize) {
        match body {
            Some(body) => self.write_body(body),
            None => {
                self.write_indent(indent + 1);
                self.output.push_str("pass");
            }
        }
    }

    /// The logical lines of a Block, space-joined, first line unindented.
    fn write_lines(&mut self, id: NodeId, indent: usize) {
        let tree = self.tree;
        let mut at_line_start = true;
        let mut first_line = true;
        for item in tree.block_items(id) {
            if item.is("\n") {
                at_line_start = true;
                continue;
            }
            if at_line_start {
                if !first_line {
                    self.newline(indent);
                }
                first_line = false;
                at_line_start = false;
            } else {
                self.output.push(' ');
            }
            self.write_element(item);
        }
    }

    fn write_node(&mut self, id: NodeId) {
        let tree = self.tree;
        let node = tree.node(id);
        let indent = node.indent;
        match &node.kind {
            NodeKind::Root => self.write_body(tree.body()),

            NodeKind::Block { tag, items } => {
                if is_blank(items) {
                    if *tag == GROUP_TAG {
                        self.output.push_str("None");
                    }
                    return;
                }
                let text = self.capture(|w| w.write_lines(id, indent));
                if *tag == GROUP_TAG && !text.contains('\n') {
                    self.output.push('(');
                    self.output.push_str(&text);
                    self.output.push(')');
                } else {
                    self.output.push_str(&text);
                }
            }

            NodeKind::Statement { parts } => self.write_elements(parts, " "),

            NodeKind::Chain { parts } => self.write_elements(parts, ""),

            NodeKind::Variable { name, value } => {
                self.output.push_str(name);
                if let Some(value) = value {
                    self.output.push('=');
                    self.write_element(value);
                }
            }

            NodeKind::Cast { target, operand } => {
                self.output.push_str(target.constructor());
                self.output.push('(');
                self.write_element(operand);
                self.output.push(')');
            }

            NodeKind::ArrayLiteral { elements } => {
                self.output.push('[');
                self.write_elements(elements, ", ");
                self.output.push(']');
            }

            NodeKind::IndexedAccess { base, indices } => {
                if let Some(base) = base {
                    self.write_element(base);
                }
                self.output.push('[');
                // more than one captured index entry renders empty
                if let [index] = indices.as_slice() {
                    self.write_element(index);
                }
                self.output.push(']');
            }

            NodeKind::FunctionCall {
                name,
                args,
                builtin,
            } => {
                if *builtin {
                    self.output.push_str(RUNTIME_PREFIX);
                }
                self.output.push_str(name);
                self.output.push('(');
                self.write_elements(args, ", ");
                self.output.push(')');
            }

            NodeKind::FunctionDef {
                name,
                params,
                named,
                body,
            } => {
                self.output.push_str("def ");
                self.output.push_str(name);
                self.output.push('(');
                let all: Vec<Element> = params
                    .iter()
                    .chain(named)
                    .map(|p| Element::Node(*p))
                    .collect();
                self.write_elements(&all, ", ");
                self.output.push_str("):\n");
                self.write_body(*body);
            }

            NodeKind::StructDef {
                name,
                properties,
                methods,
            } => self.write_struct(name, properties, methods, indent),

            NodeKind::Conditional {
                condition,
                consequent,
                alternative,
            } => {
                self.output.push_str("if ");
                self.write_node(*condition);
                self.output.push_str(":\n");
                self.write_body(*consequent);
                if let Some(alternative) = alternative {
                    self.newline(indent);
                    self.output.push_str("else:\n");
                    self.write_body(*alternative);
                }
            }

            NodeKind::TryExcept { protected, handler } => {
                self.output.push_str("try:");
                self.write_clause(*protected);
                self.newline(indent);
                self.output.push_str("except:");
                match handler {
                    Some(handler) => self.write_clause(*handler),
                    None => self.output.push_str(" pass"),
                }
            }

            NodeKind::ForLoop {
                header,
                comprehension,
                body,
            } => {
                self.output.push_str("for ");
                self.write_node(*header);
                if !*comprehension {
                    self.output.push_str(":\n");
                    self.write_optional_body(*body, indent);
                }
            }
        }
    }

    /// A try/except clause: on the same line when it is one line long.
    fn write_clause(&mut self, id: NodeId) {
        let text = self.capture(|w| w.write_body(id));
        let trimmed = text.trim_start();
        if trimmed.is_empty() || trimmed.contains('\n') {
            self.output.push('\n');
            self.output.push_str(&text);
        } else {
            self.output.push(' ');
            self.output.push_str(trimmed);
        }
    }

    /// A class whose constructor assigns every property, with the `=` signs
    /// aligned on tab stops.
    fn write_struct(
        &mut self,
        name: &str,
        properties: &[NodeId],
        methods: &[NodeId],
        indent: usize,
    ) {
        let tree = self.tree;
        self.output.push_str("class ");
        self.output.push_str(name);
        self.output.push(':');
        self.newline(indent + 1);
        self.output.push_str("def __init__(self):");

        let fields: Vec<(&str, Option<&Element>)> = properties
            .iter()
            .filter_map(|p| match tree.kind(*p) {
                NodeKind::Variable { name, value } => Some((name.as_str(), value.as_ref())),
                _ => None,
            })
            .collect();
        let widest = fields.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        let stops = tab_stops(widest) + 1;

        if fields.is_empty() {
            self.newline(indent + 2);
            self.output.push_str("pass");
        }
        for (field, value) in fields {
            self.newline(indent + 2);
            self.output.push_str("self.");
            self.output.push_str(field);
            for _ in 0..stops.saturating_sub(tab_stops(field.len())) {
                self.output.push('\t');
            }
            self.output.push_str("= ");
            match value {
                Some(value) => self.write_element(value),
                None => self.output.push_str("None"),
            }
        }

        for method in methods {
            self.newline(indent + 1);
            self.write_node(*method);
        }
    }
}

/// Tab stops spanned by `self.<name> ` followed by a tab.
fn tab_stops(name_len: usize) -> usize {
    (name_len + 6).div_ceil(4)
}

fn is_blank(items: &[Element]) -> bool {
    items.iter().all(|item| item.is("\n"))
}
