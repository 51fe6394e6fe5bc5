//! Compose command handler

use anyhow::{Context, Result};

use freewrite_core::compose::compose_url;
use freewrite_core::Config;

use super::open_document;
use crate::output::{Output, OutputFormat};

/// Print (and optionally open) the compose URL for the saved document
pub fn compose(config: &Config, open_browser: bool, output: &Output) -> Result<()> {
    let (_, doc) = open_document(config);
    let url = compose_url(&config.compose_url, &doc.content());

    match output.format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "url": url })),
        OutputFormat::Human | OutputFormat::Quiet => println!("{}", url),
    }

    if open_browser {
        open::that(&url).context("Failed to open browser")?;
    }

    Ok(())
}
