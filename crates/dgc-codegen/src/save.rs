//! Save section: write the result and confirm. Always emitted, even
//! when no base pattern was recognized — it names no pattern-derived
//! identifier that a degenerate `main` section could have left undefined.

pub fn generate() -> String {
    ["# Save output", "image.save(\"output.png\")", "print(\"Saved to output.png\")"].join("\n")
}
