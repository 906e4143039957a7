//! Embedded-workflow extraction from PNG/WebP metadata.
//!
//! ComfyUI-family tools embed the workflow that produced an image in a
//! `prompt` or `workflow` metadata key. This is a façade convenience,
//! not part of the core contract — it performs I/O-adjacent byte
//! parsing and is never invoked by `translate_document`/`translate_json`
//! themselves, only by callers (the CLI) that want to accept an image
//! file directly.

use serde_json::Value;

const KEYS: [&str; 2] = ["prompt", "workflow"];

/// Extract an embedded workflow document from image bytes, given the
/// file's lowercase extension (without the leading dot).
///
/// Returns `None` on any failure: no matching metadata key, metadata
/// that isn't valid JSON, or a format this function doesn't understand.
/// Failures are silent by design — see the open question in
/// `SPEC_FULL.md` about first-wins behavior when both `prompt` and
/// `workflow` are present.
pub fn extract_workflow(bytes: &[u8], extension: &str) -> Option<Value> {
    match extension {
        "png" => extract_from_png(bytes),
        "webp" => extract_from_webp(bytes),
        _ => None,
    }
}

fn extract_from_png(bytes: &[u8]) -> Option<Value> {
    let decoder = png::Decoder::new(bytes);
    let reader = decoder.read_info().ok()?;
    let info = reader.info();

    for key in KEYS {
        if let Some(text) = find_text_chunk(info, key) {
            if let Ok(value) = serde_json::from_str(&text) {
                return Some(value);
            }
        }
    }
    None
}

fn find_text_chunk(info: &png::Info, key: &str) -> Option<String> {
    for chunk in &info.uncompressed_latin1_text {
        if chunk.keyword == key {
            return Some(chunk.text.clone());
        }
    }
    for chunk in &info.utf8_text {
        if chunk.keyword == key {
            return chunk.get_text().ok();
        }
    }
    None
}

/// WebP carries no first-party text-chunk crate in this workspace's
/// dependency stack, so extraction here is a byte-level heuristic: scan
/// for `"<key>"` followed by a balanced-brace JSON object and parse
/// that. Good enough for ComfyUI's own EXIF/XMP embedding convention,
/// not a general WebP metadata reader.
fn extract_from_webp(bytes: &[u8]) -> Option<Value> {
    let haystack = String::from_utf8_lossy(bytes);

    for key in KEYS {
        let marker = format!("\"{key}\"");
        if let Some(key_pos) = haystack.find(&marker) {
            let after_key = &haystack[key_pos + marker.len()..];
            if let Some(brace_start) = after_key.find('{') {
                if let Some(object) = extract_balanced_object(&after_key[brace_start..]) {
                    if let Ok(value) = serde_json::from_str::<Value>(object) {
                        return Some(value);
                    }
                }
            }
        }
    }
    None
}

fn extract_balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0i32;
    for (i, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension_yields_none() {
        assert!(extract_workflow(b"not an image", "json").is_none());
    }

    #[test]
    fn malformed_png_yields_none() {
        assert!(extract_from_png(b"not a png at all").is_none());
    }

    #[test]
    fn webp_heuristic_extracts_embedded_prompt_json() {
        let fake = format!("RIFF....WEBPEXIF\"prompt\":{{\"1\":{{\"class_type\":\"X\"}}}}garbage");
        let value = extract_from_webp(fake.as_bytes()).unwrap();
        assert_eq!(value["1"]["class_type"], "X");
    }

    #[test]
    fn webp_with_no_markers_yields_none() {
        assert!(extract_from_webp(b"RIFF....WEBPVP8 garbagebytes").is_none());
    }
}
