//! Python `diffusers` program generator.
//!
//! Assembles a complete script from recognized patterns as five
//! sections — header, imports, configuration, main, save — joined by
//! blank lines. See `SPEC_FULL.md` §4.4 for the section contract.

mod config;
mod header;
mod imports;
mod main_section;
mod render;
mod save;

use dgc_recognizer::PatternMatch;

/// Generate a complete Python program from the patterns recognized in a
/// workflow graph. Never fails: a graph with no recognizable base
/// pattern still produces a runnable-looking script whose main body is
/// a single explanatory comment.
pub fn generate(patterns: &[PatternMatch]) -> String {
    let sections = [
        header::generate(patterns),
        imports::generate(patterns),
        config::generate(patterns),
        main_section::generate(patterns),
        save::generate(),
    ];

    log::debug!("dgc-codegen: generated program from {} pattern(s)", patterns.len());

    sections.join("\n\n")
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
    fn basic_txt2img_program_has_five_sections() {
        let patterns = patterns_from(json!({
            "1": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sd15.safetensors" } },
            "2": { "class_type": "CLIPTextEncode", "inputs": { "text": "a cat" } },
            "3": { "class_type": "EmptyLatentImage", "inputs": { "width": 512, "height": 512 } },
            "4": {
                "class_type": "KSampler",
                "inputs": { "model": ["1", 0], "positive": ["2", 0], "latent_image": ["3", 0] }
            }
        }));

        let program = generate(&patterns);
        let sections: Vec<&str> = program.split("\n\n").collect();
        assert!(sections.len() >= 5);
        assert!(sections[0].starts_with("# Workflow Translation"));
        assert!(program.contains("MODEL_PATH ="));
        assert!(program.contains("pipe = StableDiffusionPipeline.from_single_file("));
        assert!(program.ends_with("print(\"Saved to output.png\")"));
    }

    #[test]
    fn no_patterns_still_produces_five_joined_sections_with_placeholder_main() {
        let patterns: Vec<PatternMatch> = Vec::new();
        let program = generate(&patterns);
        assert!(program.contains("# Could not detect base generation pattern"));
        assert!(program.contains("# Save output"));
        assert!(program.contains("# Workflow Translation"));
    }

    #[test]
    fn generation_is_deterministic() {
        let patterns = patterns_from(json!({
            "1": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sd15.safetensors" } },
            "2": { "class_type": "KSampler", "inputs": { "model": ["1", 0] } },
            "3": { "class_type": "LoraLoader", "inputs": { "lora_name": "style.safetensors" } }
        }));
        assert_eq!(generate(&patterns), generate(&patterns));
    }
}
