//! Input-value classification: distinguishing a link from a literal.

use dgc_contracts::{Link, NodeInput};

/// Classify a raw JSON input value as a link or a literal.
///
/// A two-element array is a link iff its first element is a string or an
/// integer (the upstream node id) and its second element is a
/// non-negative integer (the output slot index). Any other shape —
/// including a two-element array that merely looks like one but fails
/// either check — is retained verbatim as a literal.
pub fn classify(value: &serde_json::Value) -> NodeInput {
    if let Some(link) = try_as_link(value) {
        return NodeInput::Link(link);
    }
    NodeInput::Literal(value.clone())
}

fn try_as_link(value: &serde_json::Value) -> Option<Link> {
    let arr = value.as_array()?;
    if arr.len() != 2 {
        return None;
    }
    let source_node = node_id_of(&arr[0])?;
    let source_output = arr[1].as_i64()?;
    if source_output < 0 {
        return None;
    }
    Some(Link {
        source_node,
        source_output,
    })
}

/// Normalize a would-be source node identifier to its string form,
/// accepting either a JSON string or an integer.
fn node_id_of(value: &serde_json::Value) -> Option<String> {
    if let Some(s) = value.as_str() {
        return Some(s.to_string());
    }
    if let Some(n) = value.as_i64() {
        return Some(n.to_string());
    }
    None
}
