//! Show and write the saved document

use std::io::Read;

use anyhow::{bail, Context, Result};

use freewrite_core::Config;

use super::open_document;
use crate::output::Output;

/// Print the saved document
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let (_, doc) = open_document(config);
    output.print_content(&doc.content());
    Ok(())
}

/// Replace the saved document and save it right away
pub async fn write(config: &Config, text: Option<String>, output: &Output) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read document from stdin")?;
            buf
        }
    };

    let (store, doc) = open_document(config);
    doc.set_content(text);
    doc.flush().await;

    let snapshot = doc.snapshot();
    if snapshot.last_save_failed {
        match snapshot.last_save_hint {
            Some(hint) => bail!(
                "Failed to save document to {}\n{}",
                store.path().display(),
                hint
            ),
            None => bail!(
                "Failed to save document to {}. Set FREEWRITE_LOG=warn for details.",
                store.path().display()
            ),
        }
    }

    output.success(&format!(
        "Saved {} characters",
        doc.content().chars().count()
    ));
    Ok(())
}
