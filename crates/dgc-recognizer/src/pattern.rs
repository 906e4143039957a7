//! The recognized-pattern value type shared by every detector.

use dgc_contracts::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The kind of pattern a detector recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Txt2img,
    Img2img,
    SdxlRefiner,
    Controlnet,
    Ipadapter,
    Lora,
    Upscale,
    Inpaint,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Txt2img => "txt2img",
            PatternType::Img2img => "img2img",
            PatternType::SdxlRefiner => "sdxl_refiner",
            PatternType::Controlnet => "controlnet",
            PatternType::Ipadapter => "ipadapter",
            PatternType::Lora => "lora",
            PatternType::Upscale => "upscale",
            PatternType::Inpaint => "inpaint",
        }
    }
}

/// A single recognized pattern: which nodes took part, and the
/// configuration extracted from their literal inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternMatch {
    pub pattern_type: PatternType,
    pub nodes: Vec<NodeId>,
    #[serde(default)]
    pub config: Map<String, Value>,
    #[serde(default)]
    pub sub_patterns: Vec<PatternMatch>,
}

impl PatternMatch {
    pub fn new(pattern_type: PatternType, nodes: Vec<NodeId>, config: Map<String, Value>) -> Self {
        Self {
            pattern_type,
            nodes,
            config,
            sub_patterns: Vec::new(),
        }
    }

    /// Fetch a config value, falling back to a supplied default when the
    /// key is absent. Base-pattern config is populated with literal JSON
    /// values pulled straight from node inputs, so callers that know the
    /// expected shape typically go through [`config_str`], [`config_f64`],
    /// etc. instead of matching on `Value` themselves.
    pub fn config_get(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }

    pub fn config_f64(&self, key: &str) -> Option<f64> {
        self.config.get(key).and_then(Value::as_f64)
    }

    pub fn config_i64(&self, key: &str) -> Option<i64> {
        self.config.get(key).and_then(Value::as_i64)
    }

    pub fn config_bool(&self, key: &str) -> Option<bool> {
        self.config.get(key).and_then(Value::as_bool)
    }
}
