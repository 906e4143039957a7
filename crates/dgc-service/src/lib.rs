//! Host-agnostic façade over the translation pipeline: parse, recognize,
//! generate, wrapped with the error handling and image-metadata
//! extraction a CLI or service frontend needs but the core pipeline does
//! not.

mod error;
mod facade;
mod image_metadata;
mod report;

pub use error::{Result, TranslatorError};
pub use facade::{analyze_json, translate_document, translate_json};
pub use image_metadata::extract_workflow;
pub use report::{AnalysisReport, PatternReport};
