//! The parsed workflow graph and the raw document shape it is built from.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeId};

/// The raw input document: a mapping from node identifier (string or
/// integer key in the source JSON) to a `{class_type, inputs}` record.
/// Parsing normalizes keys to strings before this type is ever touched
/// downstream, so by the time a `WorkflowDocument` is built every key is
/// already a `String`.
pub type WorkflowDocument = serde_json::Map<String, serde_json::Value>;

/// A fully parsed workflow graph: nodes plus the structural analysis
/// (roots, terminals, execution order) derived from their links.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub nodes: HashMap<NodeId, Node>,
    /// Nodes with no linked inputs.
    pub root_nodes: Vec<NodeId>,
    /// Nodes with no outgoing connections, or whose class is a known
    /// output class.
    pub terminal_nodes: Vec<NodeId>,
    /// Deterministic topological order, excluding any node left in a
    /// cycle (such nodes keep `execution_order == -1`).
    pub execution_order: Vec<NodeId>,
}

impl WorkflowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Follow a node's named input one hop, returning the upstream node
    /// if that input is a link and its source exists in the graph.
    pub fn follow_link<'a>(&'a self, node: &Node, input_name: &str) -> Option<&'a Node> {
        let link = node.link(input_name)?;
        self.nodes.get(&link.source_node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Link, NodeInput};

    #[test]
    fn follow_link_one_hop() {
        let mut graph = WorkflowGraph::new();
        let mut upstream = Node::new("1", "CLIPTextEncode");
        upstream
            .inputs
            .insert("text".to_string(), NodeInput::Literal(serde_json::json!("a cat")));
        graph.nodes.insert("1".to_string(), upstream);

        let mut downstream = Node::new("2", "KSampler");
        downstream.inputs.insert(
            "positive".to_string(),
            NodeInput::Link(Link {
                source_node: "1".to_string(),
                source_output: 0,
            }),
        );

        let found = graph.follow_link(&downstream, "positive").unwrap();
        assert_eq!(found.class_type, "CLIPTextEncode");
    }

    #[test]
    fn follow_link_missing_source_is_none() {
        let graph = WorkflowGraph::new();
        let mut downstream = Node::new("2", "KSampler");
        downstream.inputs.insert(
            "positive".to_string(),
            NodeInput::Link(Link {
                source_node: "missing".to_string(),
                source_output: 0,
            }),
        );
        assert!(graph.follow_link(&downstream, "positive").is_none());
    }
}
