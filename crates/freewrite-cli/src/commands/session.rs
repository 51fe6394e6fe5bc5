//! Writing session
//!
//! A line-oriented editor on stdin. Plain lines are appended to the
//! document; lines starting with `:` are commands. The document autosaves
//! in the background and the countdown ticks once per second while the
//! session waits for input.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use freewrite_core::compose::compose_url;
use freewrite_core::timer::TIMER_PRESETS;
use freewrite_core::{Config, CountdownTimer, DocumentSnapshot, Tick, WritingDocument};

use super::{open_document, with_storage_hint};
use super::timer::clock;
use crate::output::{Output, OutputFormat};

const HELP: &str = "\
Type to write. Commands:
  :new          start a new entry (current text goes to history)
  :history      list entries, most recent first
  :load <n>     load entry n into the editor
  :show         print the current text
  :export       write the text to a timestamped file
  :compose      print the compose-in-browser URL
  :timer <min>  start the countdown
  :clear-timer  stop the countdown
  :time         show the countdown
  :quit         save and exit
Start a line with '::' to write a line that begins with ':'.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Append(String),
    NewEntry,
    History,
    Load(usize),
    Show,
    Export,
    Compose,
    StartTimer(u32),
    ClearTimer,
    Time,
    Help,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self> {
        if let Some(text) = line.strip_prefix("::") {
            return Ok(SessionCommand::Append(format!(":{}", text)));
        }

        let Some(command) = line.strip_prefix(':') else {
            return Ok(SessionCommand::Append(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or("");
        let arg = parts.next();

        let parsed = match (name, arg) {
            ("new", None) => SessionCommand::NewEntry,
            ("history", None) => SessionCommand::History,
            ("load", Some(n)) => SessionCommand::Load(
                n.parse::<usize>()
                    .with_context(|| format!("Not an entry number: {}", n))?,
            ),
            ("show", None) => SessionCommand::Show,
            ("export", None) => SessionCommand::Export,
            ("compose", None) => SessionCommand::Compose,
            ("timer", Some(n)) => SessionCommand::StartTimer(
                n.parse::<u32>()
                    .with_context(|| format!("Not a number of minutes: {}", n))?,
            ),
            ("clear-timer", None) => SessionCommand::ClearTimer,
            ("time", None) => SessionCommand::Time,
            ("help", None) => SessionCommand::Help,
            ("quit" | "q", None) => SessionCommand::Quit,
            _ => bail!("Unknown command ':{}'. Type :help for commands.", command.trim()),
        };

        if parts.next().is_some() {
            bail!("Too many arguments for ':{}'", name);
        }

        Ok(parsed)
    }
}

/// The document text with `line` added as a new last line
pub fn append_line(current: &str, line: &str) -> String {
    if current.is_empty() {
        line.to_string()
    } else {
        format!("{}\n{}", current, line)
    }
}

/// Something worth telling the writer about the autosave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveEvent {
    Saved,
    Failed(Option<&'static str>),
}

/// Turns published snapshots into save notices
///
/// A failure is reported when `last_save_failed` switches on, so it is seen
/// even when the saving flag came and went between two observations.
#[derive(Debug, Default)]
pub struct SaveWatch {
    was_saving: bool,
    was_failed: bool,
}

impl SaveWatch {
    pub fn observe(&mut self, snapshot: &DocumentSnapshot) -> Option<SaveEvent> {
        let event = if snapshot.last_save_failed && !self.was_failed {
            Some(SaveEvent::Failed(snapshot.last_save_hint))
        } else if self.was_saving && !snapshot.is_saving && !snapshot.last_save_failed {
            Some(SaveEvent::Saved)
        } else {
            None
        };

        self.was_saving = snapshot.is_saving;
        self.was_failed = snapshot.last_save_failed;
        event
    }
}

/// Run an interactive session until `:quit` or end of input
pub async fn run(config: &Config, output: &Output) -> Result<()> {
    let (_, doc) = open_document(config);
    let mut timer = CountdownTimer::new();
    let mut changes = doc.subscribe();
    let mut watch = SaveWatch::default();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let second = Duration::from_secs(1);
    let mut ticks = interval_at(Instant::now() + second, second);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    if output.format == OutputFormat::Human {
        println!("Freewrite. Type :help for commands.");
        if !doc.content().is_empty() {
            println!("(continuing your saved text, :show to see it)");
        }
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                match SessionCommand::parse(&line) {
                    Ok(SessionCommand::Quit) => break,
                    Ok(command) => {
                        if let Err(e) = apply(command, &doc, &mut timer, config, output) {
                            eprintln!("{:#}", e);
                        }
                    }
                    Err(e) => eprintln!("{:#}", e),
                }
            }
            _ = ticks.tick() => {
                if timer.tick() == Tick::Expired {
                    output.message("Time's up.");
                }
            }
            Ok(()) = changes.changed() => {
                let snapshot = changes.borrow_and_update().clone();
                match watch.observe(&snapshot) {
                    Some(SaveEvent::Failed(hint)) => {
                        eprintln!("⚠ Autosave failed");
                        if let Some(hint) = hint {
                            eprintln!("  {}", hint);
                        }
                    }
                    Some(SaveEvent::Saved) if output.format == OutputFormat::Human => {
                        println!("(saved)");
                    }
                    _ => {}
                }
            }
        }
    }

    doc.flush().await;
    let snapshot = doc.snapshot();
    if snapshot.last_save_failed {
        match snapshot.last_save_hint {
            Some(hint) => bail!("Failed to save document on exit\n{}", hint),
            None => bail!("Failed to save document on exit"),
        }
    }
    output.success("Saved");
    Ok(())
}

fn apply(
    command: SessionCommand,
    doc: &WritingDocument,
    timer: &mut CountdownTimer,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        SessionCommand::Append(line) => {
            doc.set_content(append_line(&doc.content(), &line));
        }
        SessionCommand::NewEntry => {
            doc.create_new_entry();
            output.message(&format!(
                "New entry. {} in history.",
                doc.history().len()
            ));
        }
        SessionCommand::History => output.print_history(&doc.history()),
        SessionCommand::Load(index) => {
            doc.select_history(index)?;
            output.message(&format!("Loaded entry {}.", index));
        }
        SessionCommand::Show => output.print_content(&doc.content()),
        SessionCommand::Export => {
            let dir = config.export_dir();
            let path = doc
                .export_current_content()
                .write_to_dir(&dir)
                .with_context(|| format!("Failed to export to {}", dir.display()))
                .map_err(with_storage_hint)?;
            output.success(&format!("Exported to {}", path.display()));
        }
        SessionCommand::Compose => {
            output.message(&compose_url(&config.compose_url, &doc.content()));
        }
        SessionCommand::StartTimer(minutes) => {
            timer.start(minutes)?;
            output.message(&format!("Timer set to {}.", clock(timer)));
        }
        SessionCommand::ClearTimer => {
            timer.clear();
            output.message("Timer cleared.");
        }
        SessionCommand::Time => {
            let state = if timer.is_running() { "running" } else { "stopped" };
            output.message(&format!("{} ({})", clock(timer), state));
        }
        SessionCommand::Help => {
            output.message(HELP);
            let presets: Vec<String> = TIMER_PRESETS.iter().map(u32::to_string).collect();
            output.message(&format!("Timer presets: {} minutes", presets.join(", ")));
        }
        SessionCommand::Quit => {}
    }

    Ok(())
}
