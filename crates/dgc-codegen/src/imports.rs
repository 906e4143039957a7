//! Import-statement generation: the pipeline class, plus whatever each
//! modifier and preprocessor needs, deduplicated and sorted so that
//! `import ...` lines sort ahead of `from ... import ...` lines.

use std::collections::BTreeSet;

use dgc_recognizer::{PatternMatch, PatternType};

pub fn generate(patterns: &[PatternMatch]) -> String {
    let mut imports: BTreeSet<String> = BTreeSet::new();
    imports.insert("import torch".to_string());
    imports.insert("from pathlib import Path".to_string());

    let base = patterns
        .iter()
        .find(|p| matches!(p.pattern_type, PatternType::Txt2img | PatternType::Img2img | PatternType::SdxlRefiner));

    if let Some(base) = base {
        let checkpoint_is_xl = base
            .config_str("checkpoint")
            .map(|c| c.to_lowercase().contains("xl"))
            .unwrap_or(false);

        if base.pattern_type == PatternType::SdxlRefiner {
            imports.insert(
                "from diffusers import StableDiffusionXLPipeline, StableDiffusionXLImg2ImgPipeline".to_string(),
            );
        } else if checkpoint_is_xl {
            imports.insert("from diffusers import StableDiffusionXLPipeline".to_string());
        } else {
            imports.insert("from diffusers import StableDiffusionPipeline".to_string());
        }
    }

    if patterns.iter().any(|p| p.pattern_type == PatternType::Controlnet) {
        imports.insert("from diffusers import ControlNetModel".to_string());
        for p in patterns.iter().filter(|p| p.pattern_type == PatternType::Controlnet) {
            match p.config_str("preprocessor") {
                Some("canny") => {
                    imports.insert("import cv2".to_string());
                    imports.insert("import numpy as np".to_string());
                }
                Some("depth") => {
                    imports.insert("from transformers import DPTForDepthEstimation, DPTImageProcessor".to_string());
                }
                Some("openpose") => {
                    imports.insert("from controlnet_aux import OpenposeDetector".to_string());
                }
                _ => {}
            }
        }
    }

    if patterns.iter().any(|p| p.pattern_type == PatternType::Ipadapter) {
        imports.insert("from diffusers import IPAdapterMixin".to_string());
    }

    if patterns.iter().any(|p| {
        matches!(
            p.pattern_type,
            PatternType::Img2img | PatternType::Controlnet | PatternType::Ipadapter | PatternType::Upscale
        )
    }) {
        imports.insert("from PIL import Image".to_string());
    }

    let mut sorted: Vec<String> = imports.into_iter().collect();
    sorted.sort_by_key(|line| (!line.starts_with("import"), line.clone()));

    sorted.join("\n")
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
    fn plain_txt2img_imports_standard_pipeline() {
        let patterns = patterns_from(json!({
            "1": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sd15.safetensors" } },
            "2": { "class_type": "KSampler", "inputs": { "model": ["1", 0] } }
        }));
        let out = generate(&patterns);
        assert!(out.contains("from diffusers import StableDiffusionPipeline"));
        assert!(!out.contains("XL"));
    }

    #[test]
    fn xl_checkpoint_name_selects_xl_pipeline() {
        let patterns = patterns_from(json!({
            "1": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sd_xl_base_1.0.safetensors" } },
            "2": { "class_type": "KSampler", "inputs": { "model": ["1", 0] } }
        }));
        let out = generate(&patterns);
        assert!(out.contains("StableDiffusionXLPipeline"));
    }

    #[test]
    fn import_lines_sort_bare_imports_before_from_imports() {
        let patterns = patterns_from(json!({
            "1": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sd15.safetensors" } },
            "2": { "class_type": "KSampler", "inputs": { "model": ["1", 0] } }
        }));
        let out = generate(&patterns);
        let lines: Vec<&str> = out.lines().collect();
        let first_from = lines.iter().position(|l| l.starts_with("from")).unwrap();
        assert!(lines[..first_from].iter().all(|l| l.starts_with("import")));
    }
}
