//! Thin CLI wrapper over the translation façade.
//!
//! Not part of the core contract — it exists to give a human a single
//! command that turns a workflow file (JSON, or a PNG/WebP carrying an
//! embedded workflow) into either a generated program or an analysis
//! report.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

/// Translate a ComfyUI-style workflow graph into a standalone diffusers program.
#[derive(Parser)]
#[command(name = "dgc")]
#[command(about = "Diffusion workflow graph translator", version)]
struct Cli {
    /// Path to a workflow JSON file, or a PNG/WebP image with an embedded workflow.
    path: PathBuf,

    /// Print a structured analysis report instead of generating a program.
    #[arg(long)]
    analyze: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let bytes = match fs::read(&cli.path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("Error: could not read {}: {err}", cli.path.display());
            return ExitCode::FAILURE;
        }
    };

    let json_bytes = match resolve_workflow_bytes(&cli.path, &bytes) {
        Ok(bytes) => bytes,
        Err(message) => {
            eprintln!("Error: {message}");
            return ExitCode::FAILURE;
        }
    };

    if cli.analyze {
        match dgc_service::analyze_json(&json_bytes) {
            Ok(report) => {
                match serde_json::to_string_pretty(&report) {
                    Ok(rendered) => println!("{rendered}"),
                    Err(err) => {
                        eprintln!("Error: could not render report: {err}");
                        return ExitCode::FAILURE;
                    }
                }
                ExitCode::SUCCESS
            }
            Err(err) => {
                println!("{{\"error\": \"{}\"}}", err.analyze_message());
                ExitCode::FAILURE
            }
        }
    } else {
        let program = dgc_service::translate_json(&json_bytes);
        let failed = program.starts_with("# Error:");
        println!("{program}");
        if failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Resolve the raw bytes to hand to the façade's JSON-oriented entry
/// points: pass JSON files through untouched, and extract an embedded
/// workflow for image files.
fn resolve_workflow_bytes(path: &Path, bytes: &[u8]) -> Result<Vec<u8>, String> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_lowercase();

    if extension != "png" && extension != "webp" {
        return Ok(bytes.to_vec());
    }

    log::debug!("dgc-cli: extracting embedded workflow from {extension} image");
    match dgc_service::extract_workflow(bytes, &extension) {
        Some(workflow) => serde_json::to_vec(&workflow).map_err(|e| e.to_string()),
        None => Err("No workflow found in image metadata".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn non_image_extension_passes_bytes_through_unchanged() {
        let path = PathBuf::from("workflow.json");
        let bytes = b"{\"1\": {\"class_type\": \"X\"}}";
        assert_eq!(resolve_workflow_bytes(&path, bytes).unwrap(), bytes);
    }

    #[test]
    fn png_with_no_embedded_workflow_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"not actually a png").unwrap();
        let bytes = fs::read(file.path()).unwrap();

        let err = resolve_workflow_bytes(file.path(), &bytes).unwrap_err();
        assert_eq!(err, "No workflow found in image metadata");
    }

    #[test]
    fn webp_with_embedded_prompt_extracts_a_translatable_workflow() {
        let mut file = tempfile::Builder::new().suffix(".webp").tempfile().unwrap();
        let fake = b"RIFF....WEBPEXIF\"prompt\":{\"1\":{\"class_type\":\"X\"}}garbage";
        file.write_all(fake).unwrap();
        let bytes = fs::read(file.path()).unwrap();

        let json = resolve_workflow_bytes(file.path(), &bytes).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["1"]["class_type"], "X");
    }

    #[test]
    fn uppercase_extension_is_still_recognized_as_an_image() {
        let path = PathBuf::from("workflow.PNG");
        let err = resolve_workflow_bytes(&path, b"not a png").unwrap_err();
        assert_eq!(err, "No workflow found in image metadata");
    }
}
