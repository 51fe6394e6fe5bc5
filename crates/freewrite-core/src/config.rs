//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/freewrite/config.toml)
//! 3. Environment variables (FREEWRITE_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::AutosaveSettings;

/// Environment variable prefix
const ENV_PREFIX: &str = "FREEWRITE";

/// Default quiet period before an edit is saved
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2000;

/// Default minimum time the saving indicator stays visible
pub const DEFAULT_MIN_SAVE_VISIBLE_MS: u64 = 500;

/// Default endpoint for the compose-in-browser action
pub const DEFAULT_COMPOSE_URL: &str = "https://chat.openai.com/?q=";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (the key/value store file)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory exported snapshots are written to (system temp dir if unset)
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Quiet period in milliseconds before an edit is persisted
    #[serde(default = "default_autosave_delay_ms")]
    pub autosave_delay_ms: u64,

    /// Minimum time in milliseconds the saving indicator stays on
    #[serde(default = "default_min_save_visible_ms")]
    pub min_save_visible_ms: u64,

    /// Base URL the compose prompt is appended to
    #[serde(default = "default_compose_url")]
    pub compose_url: String,

    /// Log file path (defaults to {data_dir}/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            export_dir: None,
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            min_save_visible_ms: DEFAULT_MIN_SAVE_VISIBLE_MS,
            compose_url: default_compose_url(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (FREEWRITE_DATA_DIR, FREEWRITE_EXPORT_DIR, ...)
    /// 2. Config file (~/.config/freewrite/config.toml or FREEWRITE_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring an explicit path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // Empty string clears it
        if let Ok(val) = std::env::var(format!("{}_EXPORT_DIR", ENV_PREFIX)) {
            self.export_dir = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        if let Some(ms) = env_millis("AUTOSAVE_DELAY_MS") {
            self.autosave_delay_ms = ms;
        }

        match env_millis("MIN_SAVE_VISIBLE_MS") {
            Some(0) => warn!(
                "Ignoring {}_MIN_SAVE_VISIBLE_MS=0: the saving indicator needs at least 1 ms",
                ENV_PREFIX
            ),
            Some(ms) => self.min_save_visible_ms = ms,
            None => {}
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with FREEWRITE_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("freewrite")
            .join("config.toml")
    }

    /// Get the path to the key/value store file
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }

    /// Get the path to the log file
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }

    /// Directory exported snapshots land in
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Autosave timing derived from this configuration
    ///
    /// The indicator minimum is at least 1 ms, even if the file says 0.
    pub fn autosave(&self) -> AutosaveSettings {
        AutosaveSettings {
            delay: Duration::from_millis(self.autosave_delay_ms),
            min_visible: Duration::from_millis(self.min_save_visible_ms.max(1)),
        }
    }
}

/// Read a FREEWRITE_* millisecond override, ignoring unparsable values
fn env_millis(suffix: &str) -> Option<u64> {
    let name = format!("{}_{}", ENV_PREFIX, suffix);
    let val = std::env::var(&name).ok()?;
    match val.trim().parse() {
        Ok(ms) => Some(ms),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a number of milliseconds", name, val);
            None
        }
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("freewrite")
}

fn default_autosave_delay_ms() -> u64 {
    DEFAULT_AUTOSAVE_DELAY_MS
}

fn default_min_save_visible_ms() -> u64 {
    DEFAULT_MIN_SAVE_VISIBLE_MS
}

fn default_compose_url() -> String {
    DEFAULT_COMPOSE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "FREEWRITE_DATA_DIR",
        "FREEWRITE_EXPORT_DIR",
        "FREEWRITE_AUTOSAVE_DELAY_MS",
        "FREEWRITE_MIN_SAVE_VISIBLE_MS",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.autosave_delay_ms, 2000);
        assert_eq!(config.min_save_visible_ms, 500);
        assert_eq!(config.compose_url, "https://chat.openai.com/?q=");
        assert!(config.export_dir.is_none());
        assert!(config.data_dir.ends_with("freewrite"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config {
            data_dir: PathBuf::from("/data/freewrite"),
            ..Config::default()
        };

        assert_eq!(
            config.store_path(),
            PathBuf::from("/data/freewrite/store.json")
        );
        assert_eq!(config.log_path(), PathBuf::from("/data/freewrite/debug.log"));
        assert_eq!(config.export_dir(), env::temp_dir());
    }

    #[test]
    fn test_autosave_settings() {
        let config = Config {
            autosave_delay_ms: 1500,
            min_save_visible_ms: 250,
            ..Config::default()
        };

        let autosave = config.autosave();
        assert_eq!(autosave.delay, Duration::from_millis(1500));
        assert_eq!(autosave.min_visible, Duration::from_millis(250));
    }

    #[test]
    fn test_zero_min_visible_is_clamped() {
        let config = Config {
            min_save_visible_ms: 0,
            ..Config::default()
        };

        assert_eq!(config.autosave().min_visible, Duration::from_millis(1));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("FREEWRITE_DATA_DIR", "/tmp/freewrite-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/freewrite-test"));
    }

    #[test]
    fn test_env_override_export_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("FREEWRITE_EXPORT_DIR", "/tmp/exports");
        config.apply_env_overrides();
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/exports")));

        env::set_var("FREEWRITE_EXPORT_DIR", "");
        config.apply_env_overrides();
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn test_env_override_timing() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("FREEWRITE_AUTOSAVE_DELAY_MS", "750");
        env::set_var("FREEWRITE_MIN_SAVE_VISIBLE_MS", "not-a-number");
        config.apply_env_overrides();

        assert_eq!(config.autosave_delay_ms, 750);
        assert_eq!(config.min_save_visible_ms, DEFAULT_MIN_SAVE_VISIBLE_MS);

        env::set_var("FREEWRITE_MIN_SAVE_VISIBLE_MS", "0");
        config.apply_env_overrides();
        assert_eq!(config.min_save_visible_ms, DEFAULT_MIN_SAVE_VISIBLE_MS);

        env::set_var("FREEWRITE_MIN_SAVE_VISIBLE_MS", "40");
        config.apply_env_overrides();
        assert_eq!(config.min_save_visible_ms, 40);
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/freewrite"),
            export_dir: Some(PathBuf::from("/exports")),
            autosave_delay_ms: 3000,
            min_save_visible_ms: 100,
            compose_url: "https://example.com/?q=".to_string(),
            log_file: None,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("autosave_delay_ms"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.export_dir, config.export_dir);
        assert_eq!(parsed.autosave_delay_ms, 3000);
        assert_eq!(parsed.min_save_visible_ms, 100);
        assert_eq!(parsed.compose_url, config.compose_url);
    }

    #[test]
    fn test_load_from_str_fills_defaults() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            autosave_delay_ms = 1000
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.autosave_delay_ms, 1000);
        assert_eq!(config.min_save_visible_ms, DEFAULT_MIN_SAVE_VISIBLE_MS);
        assert_eq!(config.compose_url, DEFAULT_COMPOSE_URL);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("FREEWRITE_DATA_DIR", temp_dir.path().join("data"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();

        assert_eq!(config.autosave_delay_ms, DEFAULT_AUTOSAVE_DELAY_MS);
        assert!(config.data_dir.exists());
    }

    #[test]
    fn test_save_to_path_round_trip() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            min_save_visible_ms: 42,
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.min_save_visible_ms, 42);
    }
}
