//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the document text
    pub fn print_content(&self, content: &str) {
        match self.format {
            OutputFormat::Human if content.is_empty() => println!("(empty)"),
            OutputFormat::Human | OutputFormat::Quiet => println!("{}", content),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "content": content }));
            }
        }
    }

    /// Print the entry history, most recent first
    pub fn print_history(&self, entries: &[String]) {
        match self.format {
            OutputFormat::Human => {
                if entries.is_empty() {
                    println!("No entries yet.");
                    return;
                }
                for (i, entry) in entries.iter().enumerate() {
                    println!("[{}] {}", i, truncate_line(entry, 60));
                }
                let noun = if entries.len() == 1 { "entry" } else { "entries" };
                println!("\n{} {}", entries.len(), noun);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "history": entries }));
            }
            OutputFormat::Quiet => {
                for entry in entries {
                    println!("{}", truncate_line(entry, 60));
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}
