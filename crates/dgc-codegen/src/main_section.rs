//! Main execution section: device setup, model loading, modifier setup,
//! the inference call, post-processing, and the save step.

use dgc_recognizer::{PatternMatch, PatternType};

use crate::render::plain_str;

pub fn generate(patterns: &[PatternMatch]) -> String {
    let base = match patterns
        .iter()
        .find(|p| matches!(p.pattern_type, PatternType::Txt2img | PatternType::Img2img | PatternType::SdxlRefiner))
    {
        Some(base) => base,
        None => return "# Could not detect base generation pattern".to_string(),
    };

    let mut lines = vec![
        "# Setup".to_string(),
        "device = \"cuda\" if torch.cuda.is_available() else \"cpu\"".to_string(),
        "dtype = torch.float16 if device == \"cuda\" else torch.float32".to_string(),
        String::new(),
    ];

    lines.extend(model_loading(patterns, base));
    lines.push(String::new());

    let loras: Vec<&PatternMatch> = patterns.iter().filter(|p| p.pattern_type == PatternType::Lora).collect();
    if !loras.is_empty() {
        lines.extend(lora_loading());
        lines.push(String::new());
    }

    let controlnets: Vec<&PatternMatch> =
        patterns.iter().filter(|p| p.pattern_type == PatternType::Controlnet).collect();
    if !controlnets.is_empty() {
        lines.extend(controlnet_setup(&controlnets));
        lines.push(String::new());
    }

    let ipadapters: Vec<&PatternMatch> =
        patterns.iter().filter(|p| p.pattern_type == PatternType::Ipadapter).collect();
    if !ipadapters.is_empty() {
        lines.extend(ipadapter_setup());
        lines.push(String::new());
    }

    lines.extend(inference(base, &controlnets, &ipadapters));
    lines.push(String::new());

    let upscales: Vec<&PatternMatch> = patterns.iter().filter(|p| p.pattern_type == PatternType::Upscale).collect();
    if !upscales.is_empty() {
        lines.extend(upscaling(&upscales));
    }

    // Trailing blank line from the extend() above a pushed-upscale block is
    // trimmed by the join; the save section is emitted separately.
    while lines.last().map(String::is_empty).unwrap_or(false) {
        lines.pop();
    }

    lines.join("\n")
}

fn model_loading(patterns: &[PatternMatch], base: &PatternMatch) -> Vec<String> {
    let mut lines = vec!["# Load model".to_string()];

    let checkpoint = plain_str(base.config_get("checkpoint"), "model.safetensors");
    let is_xl = checkpoint.to_lowercase().contains("xl") || base.pattern_type == PatternType::SdxlRefiner;

    let controlnets: Vec<&PatternMatch> =
        patterns.iter().filter(|p| p.pattern_type == PatternType::Controlnet).collect();

    if !controlnets.is_empty() {
        lines.push("# Load ControlNet".to_string());
        for (i, cn) in controlnets.iter().enumerate() {
            let model = plain_str(cn.config_get("model"), "lllyasviel/control_v11p_sd15_canny");
            lines.push(format!(
                "controlnet_{} = ControlNetModel.from_pretrained(\"{}\", torch_dtype=dtype)",
                i, model
            ));
        }

        lines.push(String::new());
        if is_xl {
            lines.push("pipe = StableDiffusionXLControlNetPipeline.from_single_file(".to_string());
        } else {
            lines.push("from diffusers import StableDiffusionControlNetPipeline".to_string());
            lines.push("pipe = StableDiffusionControlNetPipeline.from_single_file(".to_string());
        }

        lines.push("    MODEL_PATH,".to_string());
        if controlnets.len() == 1 {
            lines.push("    controlnet=controlnet_0,".to_string());
        } else {
            let cn_list = (0..controlnets.len()).map(|i| format!("controlnet_{i}")).collect::<Vec<_>>().join(", ");
            lines.push(format!("    controlnet=[{}],", cn_list));
        }
        lines.push("    torch_dtype=dtype,".to_string());
        lines.push(")".to_string());
    } else if is_xl {
        lines.push("pipe = StableDiffusionXLPipeline.from_single_file(".to_string());
        lines.push("    MODEL_PATH,".to_string());
        lines.push("    torch_dtype=dtype,".to_string());
        lines.push(")".to_string());
    } else {
        lines.push("pipe = StableDiffusionPipeline.from_single_file(".to_string());
        lines.push("    MODEL_PATH,".to_string());
        lines.push("    torch_dtype=dtype,".to_string());
        lines.push(")".to_string());
    }

    lines.push("pipe.to(device)".to_string());
    lines.push(String::new());
    lines.push("# Memory optimization".to_string());
    lines.push("pipe.enable_model_cpu_offload()".to_string());

    lines
}

fn lora_loading() -> Vec<String> {
    vec![
        "# Load LoRAs".to_string(),
        "for lora_name, lora_weight in LORAS:".to_string(),
        "    pipe.load_lora_weights(lora_name)".to_string(),
        "    pipe.fuse_lora(lora_scale=lora_weight)".to_string(),
    ]
}

fn controlnet_setup(controlnets: &[&PatternMatch]) -> Vec<String> {
    let mut lines = vec![
        "# Prepare ControlNet inputs".to_string(),
        "control_image = Image.open(\"input_image.png\")  # Your control image".to_string(),
    ];

    for (i, cn) in controlnets.iter().enumerate() {
        let prep = cn.config_str("preprocessor").unwrap_or("canny");
        match prep {
            "canny" => {
                lines.push(String::new());
                lines.push(format!("# Canny edge detection for ControlNet {}", i));
                lines.push("control_array = np.array(control_image)".to_string());
                lines.push("control_array = cv2.Canny(control_array, 100, 200)".to_string());
                lines.push("control_array = np.stack([control_array] * 3, axis=-1)".to_string());
                lines.push(format!("control_image_{} = Image.fromarray(control_array)", i));
            }
            "depth" => {
                lines.push(String::new());
                lines.push(format!("# Depth estimation for ControlNet {}", i));
                lines.push("depth_estimator = DPTForDepthEstimation.from_pretrained(\"Intel/dpt-large\")".to_string());
                lines.push("processor = DPTImageProcessor.from_pretrained(\"Intel/dpt-large\")".to_string());
                lines.push("inputs = processor(control_image, return_tensors='pt')".to_string());
                lines.push("with torch.no_grad():".to_string());
                lines.push("    depth = depth_estimator(**inputs).predicted_depth".to_string());
                lines.push(format!("control_image_{} = depth  # Process as needed", i));
            }
            "openpose" => {
                lines.push(String::new());
                lines.push(format!("# OpenPose detection for ControlNet {}", i));
                lines.push("openpose = OpenposeDetector.from_pretrained('lllyasviel/Annotators')".to_string());
                lines.push(format!("control_image_{} = openpose(control_image)", i));
            }
            other => {
                lines.push(format!("control_image_{} = control_image  # Preprocessor: {}", i, other));
            }
        }
    }

    lines
}

fn ipadapter_setup() -> Vec<String> {
    vec![
        "# Setup IPAdapter".to_string(),
        "pipe.load_ip_adapter(\"h94/IP-Adapter\", subfolder=\"models\", weight_name=\"ip-adapter_sd15.bin\")"
            .to_string(),
        "ip_image = Image.open(\"reference_image.png\")  # Your reference image".to_string(),
    ]
}

fn inference(base: &PatternMatch, controlnets: &[&PatternMatch], ipadapters: &[&PatternMatch]) -> Vec<String> {
    let mut lines = vec![
        "# Generate image".to_string(),
        "generator = torch.Generator(device).manual_seed(SEED)".to_string(),
        String::new(),
        "image = pipe(".to_string(),
        "    prompt=PROMPT,".to_string(),
        "    negative_prompt=NEGATIVE_PROMPT,".to_string(),
    ];

    if base.pattern_type != PatternType::Img2img {
        lines.push("    width=WIDTH,".to_string());
        lines.push("    height=HEIGHT,".to_string());
    } else {
        lines.push("    image=Image.open(\"input.png\"),".to_string());
        lines.push("    strength=DENOISE,".to_string());
    }

    lines.push("    num_inference_steps=STEPS,".to_string());
    lines.push("    guidance_scale=CFG_SCALE,".to_string());
    lines.push("    generator=generator,".to_string());

    if !controlnets.is_empty() {
        if controlnets.len() == 1 {
            lines.push("    image=control_image_0,".to_string());
            lines.push("    controlnet_conditioning_scale=CONTROLNET_0_STRENGTH,".to_string());
        } else {
            let images = (0..controlnets.len()).map(|i| format!("control_image_{i}")).collect::<Vec<_>>().join(", ");
            let scales = (0..controlnets.len())
                .map(|i| format!("CONTROLNET_{i}_STRENGTH"))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("    image=[{}],", images));
            lines.push(format!("    controlnet_conditioning_scale=[{}],", scales));
        }
    }

    if !ipadapters.is_empty() {
        lines.push("    ip_adapter_image=ip_image,".to_string());
    }

    lines.push(").images[0]".to_string());

    lines
}

fn upscaling(upscales: &[&PatternMatch]) -> Vec<String> {
    let mut lines = vec!["# Upscale".to_string()];

    for up in upscales {
        if up.config_str("method") == Some("model") {
            let model = plain_str(up.config_get("model"), "RealESRGAN_x4plus");
            lines.push(format!("# Using upscale model: {}", model));
            lines.push("from basicsr.archs.rrdbnet_arch import RRDBNet".to_string());
            lines.push("from realesrgan import RealESRGANer".to_string());
            lines.push(String::new());
            lines.push("upsampler = RealESRGANer(".to_string());
            lines.push(format!("    model_path=\"{}\",", model));
            lines.push("    scale=4,".to_string());
            lines.push(")".to_string());
            lines.push("image, _ = upsampler.enhance(np.array(image))".to_string());
            lines.push("image = Image.fromarray(image)".to_string());
        } else {
            let scale = up.config_f64("scale").unwrap_or(2.0);
            lines.push(format!("# Simple upscale by {}x", scale));
            lines.push(format!("new_size = (int(image.width * {}), int(image.height * {}))", scale, scale));
            lines.push("image = image.resize(new_size, Image.LANCZOS)".to_string());
        }
    }

    lines
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
    fn no_base_pattern_yields_placeholder() {
        let patterns = patterns_from(json!({
            "1": { "class_type": "LoraLoader", "inputs": { "lora_name": "style.safetensors" } }
        }));
        assert_eq!(generate(&patterns), "# Could not detect base generation pattern");
    }

    #[test]
    fn single_controlnet_uses_scalar_image_and_scale() {
        let patterns = patterns_from(json!({
            "1": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sd15.safetensors" } },
            "2": { "class_type": "ControlNetLoader", "inputs": { "control_net_name": "canny.safetensors" } },
            "3": { "class_type": "CannyEdgePreprocessor", "inputs": {} },
            "4": { "class_type": "ControlNetApply", "inputs": { "control_net": ["2", 0], "image": ["3", 0] } },
            "5": { "class_type": "KSampler", "inputs": { "model": ["1", 0] } }
        }));
        let out = generate(&patterns);
        assert!(out.contains("image=control_image_0,"));
        assert!(out.contains("controlnet_conditioning_scale=CONTROLNET_0_STRENGTH,"));
    }

    #[test]
    fn img2img_inference_uses_strength_not_dimensions() {
        let patterns = patterns_from(json!({
            "1": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sd15.safetensors" } },
            "2": { "class_type": "LoadImage", "inputs": { "image": "in.png" } },
            "3": { "class_type": "VAEEncode", "inputs": { "pixels": ["2", 0] } },
            "4": { "class_type": "KSampler", "inputs": { "model": ["1", 0], "latent_image": ["3", 0] } }
        }));
        let out = generate(&patterns);
        assert!(out.contains("strength=DENOISE,"));
        assert!(!out.contains("width=WIDTH,"));
    }
}
