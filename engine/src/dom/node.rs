// Document tree, stored as an arena: a flat vector of nodes addressed
// by index, with owning child lists and non-owning parent back-links.
// Built once per parse, read-only afterwards.

use crate::parser::html::scanner::is_space_char;

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub enum NodeType {
    Element(ElementData),
    /// Raw character data, unnormalized. `collapse_whitespace` gives
    /// the rendered view.
    Text(String),
}

#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag_name: String,
    /// Attribute map in first-seen order; duplicates from the token
    /// stream are folded so the last value wins.
    pub attributes: Vec<(String, String)>,
}

impl ElementData {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub node_type: NodeType,
}

/// Collapse every run of whitespace (space, newline, tab, form feed)
/// to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if is_space_char(ch) {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

#[derive(Debug)]
pub struct Dom {
    pub nodes: Vec<Node>,
}

impl Dom {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a new element under `parent`, folding duplicate attribute
    /// names left-to-right (later value overwrites earlier).
    pub fn create_element(
        &mut self,
        tag_name: &str,
        attrs: Vec<(String, String)>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let mut attributes: Vec<(String, String)> = Vec::with_capacity(attrs.len());
        for (name, value) in attrs {
            if let Some(existing) = attributes.iter_mut().find(|(k, _)| *k == name) {
                existing.1 = value;
            } else {
                attributes.push((name, value));
            }
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            children: vec![],
            parent,
            node_type: NodeType::Element(ElementData {
                tag_name: tag_name.to_string(),
                attributes,
            }),
        });
        if let Some(pid) = parent {
            self.nodes[pid].children.push(id);
        }
        id
    }

    pub fn create_text(&mut self, text: &str, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            children: vec![],
            parent,
            node_type: NodeType::Text(text.to_string()),
        });
        if let Some(pid) = parent {
            self.nodes[pid].children.push(id);
        }
        id
    }

    /// The synthetic root (tag name `""`), created first by the tree
    /// builder and never rendered as a tag itself.
    pub fn root(&self) -> NodeId {
        0
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id].node_type {
            NodeType::Element(el) => Some(el),
            NodeType::Text(_) => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> &str {
        self.element(id).map(|el| el.tag_name.as_str()).unwrap_or("")
    }

    /// True when `ancestor` is `id` itself or on its parent chain.
    pub fn has_ancestor(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.nodes[node].parent;
        }
        false
    }

    /// All elements with the given tag name, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if self.tag_name(id) == tag {
                found.push(id);
            }
            for &child in self.nodes[id].children.iter().rev() {
                stack.push(child);
            }
        }
        found
    }

    pub fn find_element(&self, tag: &str) -> Option<NodeId> {
        self.elements_by_tag(tag).into_iter().next()
    }

    /// Serialize the tree back to indented markup; a debug view, not a
    /// round-trip format. Text is printed in its collapsed form.
    pub fn to_markup(&self) -> String {
        self.markup_node(self.root(), 0)
    }

    fn markup_node(&self, id: NodeId, indent: usize) -> String {
        let node = &self.nodes[id];
        match &node.node_type {
            NodeType::Text(text) => {
                format!("{}{}", " ".repeat(indent), collapse_whitespace(text))
            }
            NodeType::Element(el) => {
                let child_indent = if el.tag_name.is_empty() {
                    indent
                } else {
                    indent + 2
                };
                let children = node
                    .children
                    .iter()
                    .map(|&child| self.markup_node(child, child_indent))
                    .collect::<Vec<_>>()
                    .join("\n");
                if el.tag_name.is_empty() {
                    return children;
                }
                let mut attributes = String::new();
                for (key, value) in &el.attributes {
                    attributes.push(' ');
                    attributes.push_str(&format!("{}=\"{}\"", key, value));
                }
                let indentation = " ".repeat(indent);
                format!(
                    "{}<{}{}>\n{}\n{}</{}>",
                    indentation, el.tag_name, attributes, children, indentation, el.tag_name
                )
            }
        }
    }

    pub fn pretty_print(&self, id: NodeId, indent: usize) {
        let node = &self.nodes[id];
        println!("{}{:?}", "  ".repeat(indent), node.node_type);
        for &child in &node.children {
            self.pretty_print(child, indent + 1);
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
