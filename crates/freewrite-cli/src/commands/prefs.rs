//! Preference command handlers

use anyhow::{Context, Result};

use freewrite_core::{Config, FileStore, FontOption, Preferences};

use super::with_storage_hint;
use crate::output::{Output, OutputFormat};

fn print_prefs(prefs: &Preferences, output: &Output) {
    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "font": prefs.font,
                    "font_size": prefs.font_size,
                    "face": prefs.face_name(),
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{} {}", prefs.font.as_str(), prefs.font_size);
        }
        OutputFormat::Human => {
            println!("Preferences:");
            println!("  font:      {}", prefs.font);
            if prefs.font == FontOption::Random {
                println!("  face:      {}", prefs.face_name());
            }
            println!("  font_size: {}", prefs.font_size);
        }
    }
}

/// Show current preferences
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let store = FileStore::from_config(config);
    print_prefs(&Preferences::load(&store), output);
    Ok(())
}

/// Choose a font
pub fn set_font(config: &Config, name: &str, output: &Output) -> Result<()> {
    let store = FileStore::from_config(config);
    let font: FontOption = name.parse()?;

    let mut prefs = Preferences::load(&store);
    prefs
        .set_font(&store, font)
        .context("Failed to save font preference")
        .map_err(with_storage_hint)?;

    output.success(&format!("Font set to {}", prefs.face_name()));
    Ok(())
}

/// Step to the next font size
pub fn cycle_size(config: &Config, output: &Output) -> Result<()> {
    let store = FileStore::from_config(config);

    let mut prefs = Preferences::load(&store);
    let size = prefs
        .cycle_font_size(&store)
        .context("Failed to save font size")
        .map_err(with_storage_hint)?;

    output.success(&format!("Font size set to {}", size));
    Ok(())
}
