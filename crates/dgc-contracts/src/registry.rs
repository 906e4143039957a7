//! Class registries: table-driven classification of `class_type` strings.
//!
//! These sets are read-only constants, built once and shared across
//! translations — the same no-shared-mutable-state posture the teacher
//! uses for its node-type tables. New node families (video, 3D, audio)
//! extend these sets; no trait dispatch is needed.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The diagnostic category a `class_type` falls into. Drives root/terminal
/// analysis and the `categorize` helper; orthogonal to pattern detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Loader,
    Output,
    Sampler,
    Conditioning,
    Latent,
    Image,
    Other,
}

/// Loader node classes. Broader than the checkpoint-loader set used for
/// base-pattern detection (see `dgc-recognizer`) — this registry only
/// feeds diagnostic categorization.
pub static LOADER_CLASSES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "CheckpointLoaderSimple",
        "CheckpointLoader",
        "VAELoader",
        "LoraLoader",
        "LoraLoaderModelOnly",
        "ControlNetLoader",
        "CLIPLoader",
        "UNETLoader",
        "CLIPVisionLoader",
        "StyleModelLoader",
        "UpscaleModelLoader",
        "GLIGENLoader",
        "unCLIPCheckpointLoader",
        "DiffusersLoader",
        "IPAdapterModelLoader",
        "IPAdapterUnifiedLoader",
        "AnimateDiffLoaderWithContext",
    ]
    .into_iter()
    .collect()
});

/// Output node classes. A node whose class is in this set is terminal
/// even if it happens to have outgoing connections recorded.
pub static OUTPUT_CLASSES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "SaveImage",
        "PreviewImage",
        "SaveLatent",
        "PreviewLatent",
        "VHS_VideoCombine",
        "SaveAnimatedWEBP",
        "SaveAnimatedPNG",
    ]
    .into_iter()
    .collect()
});

/// Sampler node classes, for diagnostic categorization. Includes
/// `SamplerCustomAdvanced`, which the narrower base-pattern trigger set in
/// `dgc-recognizer` does not.
pub static SAMPLER_CLASSES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "KSampler",
        "KSamplerAdvanced",
        "SamplerCustom",
        "SamplerCustomAdvanced",
    ]
    .into_iter()
    .collect()
});

pub static CONDITIONING_CLASSES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "CLIPTextEncode",
        "CLIPTextEncodeSDXL",
        "ConditioningCombine",
        "ConditioningConcat",
        "ConditioningAverage",
        "ConditioningSetArea",
        "ConditioningSetMask",
        "ConditioningZeroOut",
        "ControlNetApply",
        "ControlNetApplyAdvanced",
        "unCLIPConditioning",
        "GLIGENTextBoxApply",
        "IPAdapterApply",
        "IPAdapterAdvanced",
    ]
    .into_iter()
    .collect()
});

pub static LATENT_CLASSES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "EmptyLatentImage",
        "VAEEncode",
        "VAEEncodeForInpaint",
        "LatentUpscale",
        "LatentUpscaleBy",
        "LatentComposite",
        "LatentBlend",
        "SetLatentNoiseMask",
    ]
    .into_iter()
    .collect()
});

pub static IMAGE_CLASSES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "LoadImage",
        "LoadImageMask",
        "VAEDecode",
        "VAEDecodeTiled",
        "ImageScale",
        "ImageScaleBy",
        "ImageUpscaleWithModel",
        "ImageInvert",
        "ImageBatch",
    ]
    .into_iter()
    .collect()
});

/// Classify a `class_type` string into one of the six known categories,
/// or `Other` if it appears in none of the registries.
pub fn categorize(class_type: &str) -> NodeCategory {
    if LOADER_CLASSES.contains(class_type) {
        NodeCategory::Loader
    } else if OUTPUT_CLASSES.contains(class_type) {
        NodeCategory::Output
    } else if SAMPLER_CLASSES.contains(class_type) {
        NodeCategory::Sampler
    } else if CONDITIONING_CLASSES.contains(class_type) {
        NodeCategory::Conditioning
    } else if LATENT_CLASSES.contains(class_type) {
        NodeCategory::Latent
    } else if IMAGE_CLASSES.contains(class_type) {
        NodeCategory::Image
    } else {
        NodeCategory::Other
    }
}
