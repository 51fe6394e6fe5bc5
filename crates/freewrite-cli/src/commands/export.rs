//! Export command handler

use std::path::PathBuf;

use anyhow::{Context, Result};

use freewrite_core::Config;

use super::{open_document, with_storage_hint};
use crate::output::{Output, OutputFormat};

/// Write the saved document to a timestamped file
pub fn export(config: &Config, dir: Option<PathBuf>, output: &Output) -> Result<()> {
    let (_, doc) = open_document(config);
    let dir = dir.unwrap_or_else(|| config.export_dir());

    let path = doc
        .export_current_content()
        .write_to_dir(&dir)
        .with_context(|| format!("Failed to export to {}", dir.display()))
        .map_err(with_storage_hint)?;

    match output.format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "path": path }));
        }
        OutputFormat::Quiet => println!("{}", path.display()),
        OutputFormat::Human => output.success(&format!("Exported to {}", path.display())),
    }

    Ok(())
}
