//! Build script for the tunedrop chat bot.
//!
//! Copies the `.env.example` configuration template into the local data
//! directory, next to the `.env` the binary reads at startup:
//! - Linux: `~/.local/share/tunedrop/.env.example`
//! - macOS: `~/Library/Application Support/tunedrop/.env.example`
//! - Windows: `%LOCALAPPDATA%/tunedrop/.env.example`

use std::{env, fs, path::PathBuf};

/// Copies the template, warning instead of failing when it is missing.
///
/// # Errors
///
/// Fails if `CARGO_MANIFEST_DIR` is unset or the data directory cannot be
/// created or written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("tunedrop");
    fs::create_dir_all(&out_dir)?;

    if template.is_file() {
        fs::copy(&template, out_dir.join(".env.example"))?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
    }

    Ok(())
}
