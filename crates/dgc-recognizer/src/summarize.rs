//! Human-readable rendering of a pattern list, used by the CLI's
//! `--analyze` mode.

use serde_json::Value;

use crate::pattern::{PatternMatch, PatternType};

pub fn summarize(patterns: &[PatternMatch]) -> String {
    if patterns.is_empty() {
        return "No recognizable patterns detected".to_string();
    }

    let mut lines = vec!["Detected patterns:".to_string()];

    for p in patterns {
        match p.pattern_type {
            PatternType::Txt2img => {
                lines.push("  - Text-to-Image generation".to_string());
                lines.push(format!("    Model: {}", display(p.config_get("checkpoint"))));
                lines.push(format!(
                    "    Steps: {}, CFG: {}",
                    display(p.config_get("steps")),
                    display(p.config_get("cfg"))
                ));
            }
            PatternType::Img2img => {
                lines.push("  - Image-to-Image generation".to_string());
                lines.push(format!("    Denoise: {}", display(p.config_get("denoise"))));
            }
            PatternType::SdxlRefiner => {
                lines.push("  - SDXL base+refiner generation".to_string());
                lines.push(format!("    Model: {}", display(p.config_get("checkpoint"))));
            }
            PatternType::Controlnet => {
                lines.push(format!(
                    "  - ControlNet: {}",
                    p.config_str("preprocessor").unwrap_or("unknown")
                ));
                lines.push(format!("    Strength: {}", display(p.config_get("strength"))));
            }
            PatternType::Ipadapter => {
                lines.push(format!("  - IPAdapter: {}", display(p.config_get("type"))));
                lines.push(format!("    Weight: {}", display(p.config_get("weight"))));
            }
            PatternType::Lora => {
                lines.push(format!("  - LoRA: {}", display(p.config_get("name"))));
                lines.push(format!("    Strength: {}", display(p.config_get("strength_model"))));
            }
            PatternType::Upscale => {
                lines.push(format!("  - Upscale: {}", display(p.config_get("method"))));
            }
            PatternType::Inpaint => {
                lines.push("  - Inpainting".to_string());
            }
        }
    }

    lines.join("\n")
}

fn display(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "None".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patterns_message() {
        assert_eq!(summarize(&[]), "No recognizable patterns detected");
    }

    #[test]
    fn txt2img_summary_lines() {
        let mut config = serde_json::Map::new();
        config.insert("checkpoint".to_string(), Value::String("sd15.safetensors".to_string()));
        config.insert("steps".to_string(), Value::from(20));
        config.insert("cfg".to_string(), Value::from(7.5));
        let pattern = PatternMatch::new(PatternType::Txt2img, vec!["1".to_string()], config);

        let summary = summarize(&[pattern]);
        assert!(summary.contains("Text-to-Image generation"));
        assert!(summary.contains("sd15.safetensors"));
        assert!(summary.contains("Steps: 20, CFG: 7.5"));
    }
}
