//! Header comment section: what kind of workflow this is and which
//! modifiers it carries.

use dgc_recognizer::{PatternMatch, PatternType};

use crate::render::plain_str;

pub fn generate(patterns: &[PatternMatch]) -> String {
    let base = patterns.iter().find(|p| is_base(p.pattern_type));

    let mut lines = vec![
        "# Workflow Translation".to_string(),
        "# Converted from a ComfyUI-style node graph".to_string(),
        "#".to_string(),
    ];

    if let Some(base) = base {
        lines.push(format!("# Type: {}", base.pattern_type.as_str()));
        if let Some(checkpoint) = base.config_get("checkpoint").filter(|v| !v.is_null()) {
            lines.push(format!("# Model: {}", plain_str(Some(checkpoint), "")));
        }
    }

    let modifiers: Vec<&PatternMatch> = patterns.iter().filter(|p| is_modifier(p.pattern_type)).collect();
    if !modifiers.is_empty() {
        lines.push("#".to_string());
        lines.push("# Modifiers:".to_string());
        for m in modifiers {
            match m.pattern_type {
                PatternType::Controlnet => {
                    lines.push(format!(
                        "#   - ControlNet ({})",
                        m.config_str("preprocessor").unwrap_or("unknown")
                    ));
                }
                PatternType::Ipadapter => lines.push("#   - IPAdapter".to_string()),
                PatternType::Lora => {
                    lines.push(format!("#   - LoRA: {}", plain_str(m.config_get("name"), "unknown")));
                }
                PatternType::Upscale => {
                    lines.push(format!("#   - Upscale ({})", plain_str(m.config_get("method"), "unknown")));
                }
                _ => {}
            }
        }
    }

    lines.join("\n")
}

fn is_base(t: PatternType) -> bool {
    matches!(t, PatternType::Txt2img | PatternType::Img2img | PatternType::SdxlRefiner)
}

fn is_modifier(t: PatternType) -> bool {
    matches!(
        t,
        PatternType::Controlnet | PatternType::Ipadapter | PatternType::Lora | PatternType::Upscale
    )
}
