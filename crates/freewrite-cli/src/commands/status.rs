//! Status command handler

use anyhow::Result;

use freewrite_core::{Config, Preferences};

use super::open_document;
use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let (store, doc) = open_document(config);
    let prefs = Preferences::load(&*store);
    let content = doc.content();
    let chars = content.chars().count();
    let words = content.split_whitespace().count();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "store": {
                        "path": store.path(),
                        "exists": store.exists(),
                        "size": store.size()
                    },
                    "document": {
                        "characters": chars,
                        "words": words
                    },
                    "preferences": prefs,
                    "autosave": {
                        "delay_ms": config.autosave_delay_ms,
                        "min_save_visible_ms": config.min_save_visible_ms
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", words);
        }
        OutputFormat::Human => {
            println!("Freewrite Status");
            println!("================");
            println!();
            println!("Document:");
            println!("  Words:      {}", words);
            println!("  Characters: {}", chars);
            println!();
            println!("Preferences:");
            println!("  Font:      {}", prefs.font);
            println!("  Font size: {}", prefs.font_size);
            println!();
            println!("Autosave:");
            println!("  Delay:          {} ms", config.autosave_delay_ms);
            println!("  Indicator min:  {} ms", config.min_save_visible_ms);
            println!();
            println!("Storage:");
            println!("  Location: {}", store.path().display());
            if store.exists() {
                println!("  Size:     {} bytes", store.size());
            } else {
                println!("  Size:     (nothing saved yet)");
            }
        }
    }

    Ok(())
}
