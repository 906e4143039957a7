//! The one place in this workspace a hard error can originate: parsing
//! raw bytes that never even reach the document model.

/// Errors surfaced by the façade's byte-oriented entry points.
///
/// The core parser/recognizer/generator pipeline never fails (see
/// `dgc-parser`'s module doc) — malformed *documents* degrade
/// gracefully. This type exists only for malformed *bytes*: JSON that
/// doesn't parse, or that parses to something other than an object.
#[derive(Debug, thiserror::Error)]
pub enum TranslatorError {
    #[error("Invalid JSON - {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("document is not a mapping")]
    NotAMapping,
}

impl TranslatorError {
    /// Render this error the way `analyze_json`'s JSON error payload does:
    /// `"Invalid JSON: <detail>"` (colon), distinct from the `Display` impl's
    /// `"Invalid JSON - <detail>"` (dash) used by `translate_json`'s
    /// `# Error: ...` comment.
    pub fn analyze_message(&self) -> String {
        match self {
            TranslatorError::InvalidJson(e) => format!("Invalid JSON: {e}"),
            TranslatorError::NotAMapping => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TranslatorError>;
