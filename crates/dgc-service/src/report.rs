//! The structured report returned by `analyze_json`.

use dgc_contracts::NodeId;
use dgc_recognizer::PatternMatch;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternReport {
    #[serde(rename = "type")]
    pub pattern_type: String,
    pub config: Map<String, Value>,
    pub nodes: Vec<NodeId>,
}

impl From<&PatternMatch> for PatternReport {
    fn from(pattern: &PatternMatch) -> Self {
        Self {
            pattern_type: pattern.pattern_type.as_str().to_string(),
            config: pattern.config.clone(),
            nodes: pattern.nodes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub node_count: usize,
    pub execution_order: Vec<NodeId>,
    pub root_nodes: Vec<NodeId>,
    pub terminal_nodes: Vec<NodeId>,
    pub patterns: Vec<PatternReport>,
    pub summary: String,
}
