//! Kahn's algorithm with an ascending-identifier tie-break.
//!
//! This is the sole source of output-order stability in the whole
//! translator: every downstream component (recognizer, generator) that
//! needs a deterministic pass over the graph iterates in this order, or
//! over a collection keyed by it. Never substitute hash-order iteration
//! here.

use std::collections::HashMap;

use dgc_contracts::{Node, NodeId};

/// Compute the topological execution order over `nodes`, breaking ties
/// between simultaneously-ready nodes by ascending node identifier.
///
/// Returns the ordered sequence of node ids. Nodes that remain with a
/// non-zero link-input count after the sort (i.e. nodes inside or only
/// reachable through a cycle) are simply omitted — the caller is
/// responsible for setting their `execution_order` back to `-1`.
pub fn topological_order(nodes: &HashMap<NodeId, Node>) -> Vec<NodeId> {
    let mut in_degree: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for node in nodes.values() {
        let linked = node.inputs.values().filter(|i| i.is_link()).count();
        in_degree.insert(node.id.as_str(), linked);
    }

    let mut queue: Vec<&str> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut order = Vec::with_capacity(nodes.len());

    while !queue.is_empty() {
        queue.sort_unstable();
        let node_id = queue.remove(0);
        order.push(node_id.to_string());

        let node = &nodes[node_id];
        for conn in &node.output_connections {
            if let Some(deg) = in_degree.get_mut(conn.target_node.as_str()) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push(conn.target_node.as_str());
                }
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use dgc_contracts::{Connection, Link, NodeInput};

    fn linked(id: &str, class: &str, upstream: &str) -> Node {
        let mut n = Node::new(id, class);
        n.inputs.insert(
            "in".to_string(),
            NodeInput::Link(Link {
                source_node: upstream.to_string(),
                source_output: 0,
            }),
        );
        n
    }

    #[test]
    fn linear_chain_orders_by_dependency() {
        let mut a = Node::new("a", "Loader");
        a.output_connections.push(Connection {
            target_node: "b".to_string(),
            target_input: "in".to_string(),
            source_output: 0,
        });
        let mut b = linked("b", "Sampler", "a");
        b.output_connections.push(Connection {
            target_node: "c".to_string(),
            target_input: "in".to_string(),
            source_output: 0,
        });
        let c = linked("c", "Save", "b");

        let mut nodes = HashMap::new();
        nodes.insert("a".to_string(), a);
        nodes.insert("b".to_string(), b);
        nodes.insert("c".to_string(), c);

        assert_eq!(topological_order(&nodes), vec!["a", "b", "c"]);
    }

    #[test]
    fn ties_broken_lexicographically() {
        // b and c both depend only on a, and have no deps on each other.
        let mut a = Node::new("a", "Loader");
        a.output_connections.push(Connection {
            target_node: "c".to_string(),
            target_input: "in".to_string(),
            source_output: 0,
        });
        a.output_connections.push(Connection {
            target_node: "b".to_string(),
            target_input: "in".to_string(),
            source_output: 0,
        });
        let b = linked("b", "X", "a");
        let c = linked("c", "X", "a");

        let mut nodes = HashMap::new();
        nodes.insert("a".to_string(), a);
        nodes.insert("b".to_string(), b);
        nodes.insert("c".to_string(), c);

        assert_eq!(topological_order(&nodes), vec!["a", "b", "c"]);
    }

    #[test]
    fn cycle_omits_both_nodes() {
        let mut a = linked("a", "X", "b");
        a.output_connections.push(Connection {
            target_node: "b".to_string(),
            target_input: "in".to_string(),
            source_output: 0,
        });
        let mut b = linked("b", "X", "a");
        b.output_connections.push(Connection {
            target_node: "a".to_string(),
            target_input: "in".to_string(),
            source_output: 0,
        });

        let mut nodes = HashMap::new();
        nodes.insert("a".to_string(), a);
        nodes.insert("b".to_string(), b);

        assert!(topological_order(&nodes).is_empty());
    }
}
