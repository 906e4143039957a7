//! Pattern recognition over a parsed workflow graph.
//!
//! Identifies the base generation pattern (txt2img / img2img /
//! sdxl_refiner) plus any number of independent modifier patterns
//! (ControlNet, IPAdapter, LoRA, upscaling, inpainting). See
//! `SPEC_FULL.md` §4.3 for the recognition rules each detector follows.

mod base;
mod modifiers;
mod pattern;
mod summarize;

use dgc_contracts::WorkflowGraph;

pub use pattern::{PatternMatch, PatternType};
pub use summarize::summarize;

/// Run every detector over `graph` and return the patterns found.
///
/// At most one base pattern is returned (first element, when present);
/// modifier patterns follow in a fixed detector order — controlnet,
/// ipadapter, lora, upscale, inpaint — each internally sorted by node
/// id, so the result is stable across repeated runs on the same graph.
pub fn analyze(graph: &WorkflowGraph) -> Vec<PatternMatch> {
    let mut patterns = Vec::new();

    if let Some(base) = base::detect(graph) {
        patterns.push(base);
    }

    patterns.extend(modifiers::detect_controlnet(graph));
    patterns.extend(modifiers::detect_ipadapter(graph));
    patterns.extend(modifiers::detect_lora(graph));
    patterns.extend(modifiers::detect_upscale(graph));
    patterns.extend(modifiers::detect_inpaint(graph));

    log::debug!("dgc-recognizer: found {} pattern(s)", patterns.len());

    patterns
}
