pub mod node;

pub use node::{collapse_whitespace, Dom, ElementData, Node, NodeId, NodeType};
