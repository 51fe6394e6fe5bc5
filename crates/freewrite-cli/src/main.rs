//! Freewrite CLI
//!
//! Command-line front end for Freewrite - write, keep entries, time yourself.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use freewrite_core::Config;

mod commands;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "freewrite")]
#[command(about = "Freewrite - distraction-free writing")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a writing session (default)
    Session,
    /// Show the saved document and preferences
    Status,
    /// Print the saved document
    Show,
    /// Replace the saved document (reads stdin when TEXT is omitted)
    Write {
        /// New document text
        text: Option<String>,
    },
    /// Export the saved document to a timestamped text file
    Export {
        /// Directory to write into (defaults to export_dir, then the temp dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Print the compose-in-browser URL for the saved document
    Compose {
        /// Open the URL in the default browser
        #[arg(long)]
        open: bool,
    },
    /// Run a countdown timer
    Timer {
        /// Minutes to count down from
        minutes: u32,
    },
    /// Show or change font preferences
    Prefs {
        #[command(subcommand)]
        command: Option<PrefsCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum PrefsCommands {
    /// Show current preferences
    Show,
    /// Choose a font (lato, arial, system, serif, random)
    Font {
        /// Font name
        name: String,
    },
    /// Step to the next font size
    CycleSize,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, export_dir, autosave_delay_ms, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config_file.as_ref();

    // Config commands must work even when the current config is unusable
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config);

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Session => commands::session::run(&config, &output).await,
        Commands::Status => commands::status::show(&config, &output),
        Commands::Show => commands::document::show(&config, &output),
        Commands::Write { text } => commands::document::write(&config, text, &output).await,
        Commands::Export { dir } => commands::export::export(&config, dir, &output),
        Commands::Compose { open } => commands::compose::compose(&config, open, &output),
        Commands::Timer { minutes } => commands::timer::run(minutes, &output).await,
        Commands::Prefs { command } => handle_prefs_command(command, &config, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_prefs_command(
    command: Option<PrefsCommands>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        Some(PrefsCommands::Show) | None => commands::prefs::show(config, output),
        Some(PrefsCommands::Font { name }) => commands::prefs::set_font(config, &name, output),
        Some(PrefsCommands::CycleSize) => commands::prefs::cycle_size(config, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
