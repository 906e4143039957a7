//! Configuration section: the constants a generated script exposes for
//! the user to tweak before running it.

use dgc_recognizer::{PatternMatch, PatternType};

use crate::render::{plain_str, py_literal, py_str};

pub fn generate(patterns: &[PatternMatch]) -> String {
    let mut lines = vec!["# Configuration".to_string()];

    let base = patterns
        .iter()
        .find(|p| matches!(p.pattern_type, PatternType::Txt2img | PatternType::Img2img | PatternType::SdxlRefiner));

    if let Some(base) = base {
        lines.push(format!(
            "MODEL_PATH = {}",
            py_str(base.config_get("checkpoint"), "model.safetensors")
        ));

        let pos = plain_str(base.config_get("positive_prompt"), "a beautiful landscape");
        let neg = plain_str(base.config_get("negative_prompt"), "blurry, low quality");
        lines.push(format!("PROMPT = \"\"\"{}\"\"\"", pos));
        lines.push(format!("NEGATIVE_PROMPT = \"\"\"{}\"\"\"", neg));

        lines.push(format!("STEPS = {}", py_literal(base.config_get("steps"), "20")));
        lines.push(format!("CFG_SCALE = {}", py_literal(base.config_get("cfg"), "7.5")));
        lines.push(format!("SEED = {}", py_literal(base.config_get("seed"), "0")));
        lines.push(format!("WIDTH = {}", py_literal(base.config_get("width"), "512")));
        lines.push(format!("HEIGHT = {}", py_literal(base.config_get("height"), "512")));

        if base.pattern_type == PatternType::Img2img {
            lines.push(format!("DENOISE = {}", py_literal(base.config_get("denoise"), "0.75")));
        }
    }

    let loras: Vec<&PatternMatch> = patterns.iter().filter(|p| p.pattern_type == PatternType::Lora).collect();
    if !loras.is_empty() {
        lines.push(String::new());
        lines.push("# LoRA Configuration".to_string());
        lines.push("LORAS = [".to_string());
        for lora in &loras {
            let name = py_str(lora.config_get("name"), "lora.safetensors");
            let strength = py_literal(lora.config_get("strength_model"), "1.0");
            lines.push(format!("    ({}, {}),", name, strength));
        }
        lines.push("]".to_string());
    }

    let controlnets: Vec<&PatternMatch> =
        patterns.iter().filter(|p| p.pattern_type == PatternType::Controlnet).collect();
    if !controlnets.is_empty() {
        lines.push(String::new());
        lines.push("# ControlNet Configuration".to_string());
        for (i, cn) in controlnets.iter().enumerate() {
            lines.push(format!(
                "CONTROLNET_{}_MODEL = {}",
                i,
                py_str(cn.config_get("model"), "controlnet")
            ));
            lines.push(format!(
                "CONTROLNET_{}_STRENGTH = {}",
                i,
                py_literal(cn.config_get("strength"), "1.0")
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dgc_contracts::WorkflowGraph;
    use serde_json::json;

    fn patterns_from(doc: serde_json::Value) -> Vec<PatternMatch> {
        let wd: dgc_contracts::WorkflowDocument = doc.as_object().unwrap().clone();
        let graph: WorkflowGraph = dgc_parser::parse(&wd);
        dgc_recognizer::analyze(&graph)
    }

    #[test]
    fn img2img_adds_denoise_constant() {
        let patterns = patterns_from(json!({
            "1": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sd15.safetensors" } },
            "2": { "class_type": "LoadImage", "inputs": { "image": "in.png" } },
            "3": { "class_type": "VAEEncode", "inputs": { "pixels": ["2", 0] } },
            "4": { "class_type": "KSampler", "inputs": { "model": ["1", 0], "latent_image": ["3", 0], "denoise": 0.5 } }
        }));
        let out = generate(&patterns);
        assert!(out.contains("DENOISE = 0.5"));
    }

    #[test]
    fn lora_list_renders_tuples() {
        let patterns = patterns_from(json!({
            "1": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sd15.safetensors" } },
            "2": { "class_type": "KSampler", "inputs": { "model": ["1", 0] } },
            "3": { "class_type": "LoraLoader", "inputs": { "lora_name": "style.safetensors", "strength_model": 0.8 } }
        }));
        let out = generate(&patterns);
        assert!(out.contains("LORAS = ["));
        assert!(out.contains("(\"style.safetensors\", 0.8),"));
    }
}
