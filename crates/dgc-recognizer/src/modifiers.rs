//! Modifier pattern detection: ControlNet, IPAdapter, LoRA, upscaling,
//! and inpainting. Each is independent of the base pattern and of each
//! other — a single graph can carry any combination.

use dgc_contracts::WorkflowGraph;
use serde_json::{Map, Value};

use crate::pattern::{PatternMatch, PatternType};

const IPADAPTER_CLASSES: [&str; 5] = [
    "IPAdapterApply",
    "IPAdapterAdvanced",
    "IPAdapterFaceID",
    "IPAdapterStyleComposition",
    "IPAdapterBatch",
];

/// Node ids are iterated in sorted order everywhere in this module so
/// that two runs over the same document always emit patterns in the
/// same sequence.
fn sorted_ids(graph: &WorkflowGraph) -> Vec<&String> {
    let mut ids: Vec<&String> = graph.nodes.keys().collect();
    ids.sort();
    ids
}

pub fn detect_controlnet(graph: &WorkflowGraph) -> Vec<PatternMatch> {
    let mut patterns = Vec::new();

    for id in sorted_ids(graph) {
        let node = &graph.nodes[id];
        if !matches!(
            node.class_type.as_str(),
            "ControlNetApply" | "ControlNetApplyAdvanced" | "ControlNetApplySD3"
        ) {
            continue;
        }

        let controlnet_model = node
            .link("control_net")
            .and_then(|l| graph.get(&l.source_node))
            .filter(|loader| loader.class_type == "ControlNetLoader")
            .and_then(|loader| loader.literal("control_net_name"))
            .cloned();

        let preprocessor = node
            .link("image")
            .and_then(|l| graph.get(&l.source_node))
            .and_then(|prep| infer_preprocessor(&prep.class_type));

        let mut config = Map::new();
        config.insert("model".to_string(), controlnet_model.unwrap_or(Value::Null));
        config.insert(
            "preprocessor".to_string(),
            preprocessor.map(Value::from).unwrap_or(Value::Null),
        );
        config.insert("strength".to_string(), node.literal_or("strength", &Value::from(1.0)).clone());
        config.insert(
            "start_percent".to_string(),
            node.literal_or("start_percent", &Value::from(0.0)).clone(),
        );
        config.insert(
            "end_percent".to_string(),
            node.literal_or("end_percent", &Value::from(1.0)).clone(),
        );

        patterns.push(PatternMatch::new(PatternType::Controlnet, vec![id.clone()], config));
    }

    patterns
}

/// ControlNet preprocessors aren't a fixed class registry in practice —
/// the ecosystem grows new ones constantly — so detection falls back to
/// a substring match on the class name rather than an exhaustive list.
fn infer_preprocessor(class_type: &str) -> Option<&'static str> {
    if class_type.contains("Canny") {
        Some("canny")
    } else if class_type.contains("Depth") {
        Some("depth")
    } else if class_type.contains("OpenPose") || class_type.contains("DW") {
        Some("openpose")
    } else if class_type.contains("Lineart") {
        Some("lineart")
    } else {
        None
    }
}

pub fn detect_ipadapter(graph: &WorkflowGraph) -> Vec<PatternMatch> {
    let mut patterns = Vec::new();

    for id in sorted_ids(graph) {
        let node = &graph.nodes[id];
        if !IPADAPTER_CLASSES.contains(&node.class_type.as_str()) {
            continue;
        }

        let mut config = Map::new();
        config.insert("type".to_string(), Value::String(node.class_type.clone()));
        config.insert("weight".to_string(), node.literal_or("weight", &Value::from(1.0)).clone());
        config.insert(
            "weight_type".to_string(),
            node.literal_or("weight_type", &Value::String("standard".to_string())).clone(),
        );
        config.insert("start_at".to_string(), node.literal_or("start_at", &Value::from(0.0)).clone());
        config.insert("end_at".to_string(), node.literal_or("end_at", &Value::from(1.0)).clone());

        patterns.push(PatternMatch::new(PatternType::Ipadapter, vec![id.clone()], config));
    }

    patterns
}

pub fn detect_lora(graph: &WorkflowGraph) -> Vec<PatternMatch> {
    let mut patterns = Vec::new();

    for id in sorted_ids(graph) {
        let node = &graph.nodes[id];
        if !matches!(node.class_type.as_str(), "LoraLoader" | "LoraLoaderModelOnly") {
            continue;
        }

        let mut config = Map::new();
        config.insert(
            "name".to_string(),
            node.literal("lora_name").cloned().unwrap_or(Value::Null),
        );
        config.insert(
            "strength_model".to_string(),
            node.literal_or("strength_model", &Value::from(1.0)).clone(),
        );
        config.insert(
            "strength_clip".to_string(),
            node.literal_or("strength_clip", &Value::from(1.0)).clone(),
        );

        patterns.push(PatternMatch::new(PatternType::Lora, vec![id.clone()], config));
    }

    patterns
}

pub fn detect_upscale(graph: &WorkflowGraph) -> Vec<PatternMatch> {
    let mut patterns = Vec::new();

    for id in sorted_ids(graph) {
        let node = &graph.nodes[id];
        if matches!(node.class_type.as_str(), "LatentUpscale" | "LatentUpscaleBy") {
            let mut config = Map::new();
            config.insert("method".to_string(), Value::String("latent".to_string()));
            config.insert("scale".to_string(), node.literal_or("scale_by", &Value::from(1.5)).clone());
            config.insert(
                "upscale_method".to_string(),
                node.literal_or("upscale_method", &Value::String("nearest-exact".to_string())).clone(),
            );
            patterns.push(PatternMatch::new(PatternType::Upscale, vec![id.clone()], config));
        }
    }

    for id in sorted_ids(graph) {
        let node = &graph.nodes[id];
        if node.class_type != "ImageUpscaleWithModel" {
            continue;
        }
        let model_name = node
            .link("upscale_model")
            .and_then(|l| graph.get(&l.source_node))
            .and_then(|loader| loader.literal("model_name"))
            .cloned();

        let mut config = Map::new();
        config.insert("method".to_string(), Value::String("model".to_string()));
        config.insert("model".to_string(), model_name.unwrap_or(Value::Null));
        patterns.push(PatternMatch::new(PatternType::Upscale, vec![id.clone()], config));
    }

    patterns
}

pub fn detect_inpaint(graph: &WorkflowGraph) -> Vec<PatternMatch> {
    let mut patterns = Vec::new();

    for id in sorted_ids(graph) {
        let node = &graph.nodes[id];
        if !matches!(node.class_type.as_str(), "VAEEncodeForInpaint" | "InpaintModelConditioning") {
            continue;
        }

        let mut config = Map::new();
        config.insert("type".to_string(), Value::String("inpaint".to_string()));
        config.insert("grow_mask".to_string(), node.literal_or("grow_mask_by", &Value::from(0)).clone());

        patterns.push(PatternMatch::new(PatternType::Inpaint, vec![id.clone()], config));
    }

    patterns
}
