//! Build script for the tubelist CLI.
//!
//! Copies the configuration template to the user's local data directory so a
//! ready-to-edit example sits next to where the application looks for
//! `config.json` after installation.

use std::{env, fs, path::PathBuf};

/// Copies `config.example.json` into the platform data directory.
///
/// # Destination
///
/// - Linux: `~/.local/share/tubelist/config.example.json`
/// - macOS: `~/Library/Application Support/tubelist/config.example.json`
/// - Windows: `%LOCALAPPDATA%/tubelist/config.example.json`
///
/// A missing template only produces a cargo warning. Directory creation and
/// copy failures fail the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=config.example.json");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template_path = manifest_dir.join("config.example.json");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("tubelist");
    fs::create_dir_all(&out_dir)?;

    if template_path.is_file() {
        let contents = fs::read_to_string(&template_path)?;
        fs::write(out_dir.join("config.example.json"), contents)?;
    } else {
        println!(
            "cargo:warning=config.example.json not found at {}",
            template_path.display()
        );
    }

    Ok(())
}
