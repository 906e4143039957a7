//! Core node and link types for a parsed workflow graph.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Unique identifier for a node. Always a string, even when the source
/// document used a bare integer key — identifiers are normalized to their
/// string form during parsing.
pub type NodeId = String;

/// A single input value on a node: either a literal JSON value or a link
/// to another node's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeInput {
    /// A literal scalar, array, or object value, retained verbatim.
    Literal(serde_json::Value),
    /// A link to another node's output slot.
    Link(Link),
}

impl NodeInput {
    /// Get the literal value, if this input is not a link.
    pub fn as_literal(&self) -> Option<&serde_json::Value> {
        match self {
            NodeInput::Literal(v) => Some(v),
            NodeInput::Link(_) => None,
        }
    }

    /// Get the link, if this input is a link.
    pub fn as_link(&self) -> Option<&Link> {
        match self {
            NodeInput::Link(l) => Some(l),
            NodeInput::Literal(_) => None,
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, NodeInput::Link(_))
    }
}

/// A link from a downstream input to an upstream node's output slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source_node: NodeId,
    pub source_output: i64,
}

/// An outgoing connection recorded on the source node: which downstream
/// node and input slot consume one of this node's outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub target_node: NodeId,
    pub target_input: String,
    pub source_output: i64,
}

/// A single node in the workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub class_type: String,
    pub inputs: HashMap<String, NodeInput>,
    /// Populated during link resolution: outgoing edges from this node.
    #[serde(default)]
    pub output_connections: Vec<Connection>,
    /// Position in the computed execution order, or -1 if the node was
    /// left out of the topological sort (e.g. it sits in a cycle).
    #[serde(default = "default_execution_order")]
    pub execution_order: i64,
}

fn default_execution_order() -> i64 {
    -1
}

impl Node {
    pub fn new(id: impl Into<NodeId>, class_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class_type: class_type.into(),
            inputs: HashMap::new(),
            output_connections: Vec::new(),
            execution_order: -1,
        }
    }

    /// True iff none of this node's inputs is a link (a "root" node).
    pub fn has_no_linked_inputs(&self) -> bool {
        !self.inputs.values().any(NodeInput::is_link)
    }

    /// Look up a literal input value by name, falling back to `default`
    /// when the input is absent or is itself a link.
    pub fn literal_or<'a>(
        &'a self,
        name: &str,
        default: &'a serde_json::Value,
    ) -> &'a serde_json::Value {
        self.inputs
            .get(name)
            .and_then(NodeInput::as_literal)
            .unwrap_or(default)
    }

    /// Look up a literal input value by name, with no fallback.
    pub fn literal(&self, name: &str) -> Option<&serde_json::Value> {
        self.inputs.get(name).and_then(NodeInput::as_literal)
    }

    /// Look up a link input by name.
    pub fn link(&self, name: &str) -> Option<&Link> {
        self.inputs.get(name).and_then(NodeInput::as_link)
    }
}
