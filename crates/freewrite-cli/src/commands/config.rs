//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use freewrite_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "export_dir": config.export_dir,
                    "autosave_delay_ms": config.autosave_delay_ms,
                    "min_save_visible_ms": config.min_save_visible_ms,
                    "compose_url": config.compose_url,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:            {}", config.data_dir.display());
            println!("  export_dir:          {}", display_opt(&config.export_dir));
            println!("  autosave_delay_ms:   {}", config.autosave_delay_ms);
            println!("  min_save_visible_ms: {}", config.min_save_visible_ms);
            println!("  compose_url:         {}", config.compose_url);
            println!("  log_file:            {}", display_opt(&config.log_file));
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

fn display_opt(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "export_dir" => {
            config.export_dir = optional_path(value);
        }
        "autosave_delay_ms" => {
            config.autosave_delay_ms = value
                .parse()
                .context("Invalid value for autosave_delay_ms. Use a number of milliseconds.")?;
        }
        "min_save_visible_ms" => {
            let ms: u64 = value
                .parse()
                .context("Invalid value for min_save_visible_ms. Use a number of milliseconds.")?;
            if ms == 0 {
                bail!("min_save_visible_ms must be at least 1");
            }
            config.min_save_visible_ms = ms;
        }
        "compose_url" => {
            if value.is_empty() {
                bail!("compose_url cannot be empty");
            }
            config.compose_url = value.to_string();
        }
        "log_file" => {
            config.log_file = optional_path(value);
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, export_dir, autosave_delay_ms, min_save_visible_ms, compose_url, log_file",
                key
            );
        }
    }

    Ok(())
}

/// Empty string or "none" clears an optional path
fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value.into())
    }
}
