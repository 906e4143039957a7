//! Base generation pattern detection: txt2img, img2img, and the
//! sdxl_refiner cascade promotion.

use dgc_contracts::{Node, WorkflowGraph};
use serde_json::{Map, Value};

use crate::pattern::{PatternMatch, PatternType};

const CHECKPOINT_TRIGGER_CLASSES: [&str; 3] = [
    "CheckpointLoaderSimple",
    "CheckpointLoader",
    "unCLIPCheckpointLoader",
];

const SAMPLER_TRIGGER_CLASSES: [&str; 3] = ["KSampler", "KSamplerAdvanced", "SamplerCustom"];

/// Detect the single base generation pattern in a graph, if any.
///
/// Requires both a checkpoint loader and a sampler to be present;
/// either missing means the workflow has no recognizable base pattern at
/// all (it may still carry modifier patterns detected independently).
pub fn detect(graph: &WorkflowGraph) -> Option<PatternMatch> {
    let checkpoint_node = find_by_class(graph, &CHECKPOINT_TRIGGER_CLASSES)?;
    let sampler_node = find_by_class(graph, &SAMPLER_TRIGGER_CLASSES)?;

    let latent_link = sampler_node.link("latent_image");
    let latent_source = latent_link.and_then(|l| graph.get(&l.source_node));

    let mut is_img2img = false;
    if let Some(source) = latent_source {
        if matches!(source.class_type.as_str(), "VAEEncode" | "VAEEncodeForInpaint") {
            is_img2img = true;
        }
    }

    let mut config = Map::new();
    config.insert(
        "checkpoint".to_string(),
        literal_value(checkpoint_node, "ckpt_name", Value::Null),
    );
    config.insert("steps".to_string(), literal_value(sampler_node, "steps", json_num(20)));
    config.insert("cfg".to_string(), literal_value(sampler_node, "cfg", json_f64(7.5)));
    config.insert(
        "sampler".to_string(),
        literal_value(sampler_node, "sampler_name", Value::String("euler".to_string())),
    );
    config.insert(
        "scheduler".to_string(),
        literal_value(sampler_node, "scheduler", Value::String("normal".to_string())),
    );
    config.insert("seed".to_string(), literal_value(sampler_node, "seed", json_num(0)));
    config.insert("denoise".to_string(), literal_value(sampler_node, "denoise", json_f64(1.0)));

    if let Some(pos) = sampler_node.link("positive").and_then(|l| graph.get(&l.source_node)) {
        if pos.class_type == "CLIPTextEncode" {
            config.insert(
                "positive_prompt".to_string(),
                literal_value(pos, "text", Value::String(String::new())),
            );
        }
    }
    if let Some(neg) = sampler_node.link("negative").and_then(|l| graph.get(&l.source_node)) {
        if neg.class_type == "CLIPTextEncode" {
            config.insert(
                "negative_prompt".to_string(),
                literal_value(neg, "text", Value::String(String::new())),
            );
        }
    }

    if !is_img2img {
        if let Some(source) = latent_source {
            if source.class_type == "EmptyLatentImage" {
                config.insert("width".to_string(), literal_value(source, "width", json_num(512)));
                config.insert("height".to_string(), literal_value(source, "height", json_num(512)));
                config.insert(
                    "batch_size".to_string(),
                    literal_value(source, "batch_size", json_num(1)),
                );
            }
        }
    }

    let nodes = vec![checkpoint_node.id.clone(), sampler_node.id.clone()];

    let mut pattern_type = if is_img2img { PatternType::Img2img } else { PatternType::Txt2img };

    if has_refiner(graph) {
        pattern_type = PatternType::SdxlRefiner;
        config.insert("has_refiner".to_string(), Value::Bool(true));
    }

    log::debug!("dgc-recognizer: detected base pattern {:?}", pattern_type);

    Some(PatternMatch::new(pattern_type, nodes, config))
}

/// SDXL refiner cascades present as either two checkpoint loaders feeding
/// two samplers, or a single `KSamplerAdvanced` whose `start_at_step` is
/// nonzero (it is picking up mid-denoise from a base pass).
fn has_refiner(graph: &WorkflowGraph) -> bool {
    let checkpoint_count = graph
        .nodes
        .values()
        .filter(|n| matches!(n.class_type.as_str(), "CheckpointLoaderSimple" | "CheckpointLoader"))
        .count();

    if checkpoint_count >= 2 {
        return true;
    }

    graph.nodes.values().any(|n| {
        n.class_type == "KSamplerAdvanced"
            && n.literal("start_at_step").and_then(Value::as_f64).unwrap_or(0.0) > 0.0
    })
}

fn find_by_class<'a>(graph: &'a WorkflowGraph, classes: &[&str]) -> Option<&'a Node> {
    let mut ids: Vec<&String> = graph.nodes.keys().collect();
    ids.sort();
    ids.into_iter()
        .map(|id| &graph.nodes[id])
        .find(|node| classes.contains(&node.class_type.as_str()))
}

fn literal_value(node: &Node, name: &str, default: Value) -> Value {
    node.literal(name).cloned().unwrap_or(default)
}

fn json_num(n: i64) -> Value {
    Value::from(n)
}

fn json_f64(n: f64) -> Value {
    Value::from(n)
}
