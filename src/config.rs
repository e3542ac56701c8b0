//! Configuration management for keyterm
//!
//! Provides persistent configuration loaded from a platform-specific config
//! file. Missing sections and fields fall back to their defaults.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/keyterm/config.toml` |
//! | macOS | `~/Library/Application Support/keyterm/config.toml` |
//! | Windows | `%APPDATA%\keyterm\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use keyterm::Config;
//!
//! let mut config = Config::load().unwrap_or_default();
//! config.input.poll_interval_ms = 2;
//! config.save().expect("Failed to save config");
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("keyterm");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Where reports come from
    #[serde(default)]
    pub input: InputConfig,
    /// Where translated bytes go
    #[serde(default)]
    pub output: OutputConfig,
    /// Log level and destination
    #[serde(default)]
    pub logging: LoggingConfig,
    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Report source selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputSource {
    /// evdev on Linux when a keyboard is readable, polling otherwise
    #[default]
    Auto,
    /// Raw Linux input devices
    Evdev,
    /// Global key state polling
    Polling,
}

/// Report source configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    pub source: InputSource,
    /// Delay between source polls in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            source: InputSource::Auto,
            poll_interval_ms: 1,
        }
    }
}

/// How translated output is presented
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Interactive key logger
    #[default]
    Tui,
    /// Raw bytes to stdout or a file
    Pipe,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub mode: OutputMode,
    /// Pipe mode target; stdout when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter, overridden by `RUST_LOG`
    pub level: String,
    /// Log file; required for logging in TUI mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Refresh rate for UI updates (in Hz)
    pub refresh_rate_hz: u32,
    /// Color theme (dark/light)
    pub theme: Theme,
    /// Reports kept in the transcript panel and export
    pub transcript_len: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_hz: 60,
            theme: Theme::Dark,
            transcript_len: 500,
        }
    }
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get UI refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.ui.refresh_rate_hz.max(1) as u64)
    }

    /// Get source poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.input.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path(tag: &str) -> PathBuf {
        env::temp_dir().join(format!("keyterm-test-{}-{}.toml", tag, std::process::id()))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.input.source, InputSource::Auto);
        assert_eq!(config.input.poll_interval_ms, 1);
        assert_eq!(config.output.mode, OutputMode::Tui);
        assert!(config.output.path.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.ui.refresh_rate_hz, 60);
        assert_eq!(config.ui.theme, Theme::Dark);
        assert_eq!(config.ui.transcript_len, 500);
    }

    #[test]
    fn config_refresh_interval() {
        let config = Config::default();
        // 60 Hz = 16666 microseconds per frame
        assert_eq!(config.refresh_interval().as_micros(), 16666);
    }

    #[test]
    fn config_refresh_interval_zero_hz_is_clamped() {
        let mut config = Config::default();
        config.ui.refresh_rate_hz = 0;
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
    }

    #[test]
    fn config_poll_interval() {
        let mut config = Config::default();
        config.input.poll_interval_ms = 5;
        assert_eq!(config.poll_interval(), Duration::from_millis(5));
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path("roundtrip");

        let mut config = Config::default();
        config.input.source = InputSource::Polling;
        config.output.mode = OutputMode::Pipe;
        config.output.path = Some(PathBuf::from("/dev/ttyUSB0"));
        config.ui.theme = Theme::Light;

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_fails() {
        let result = Config::load_from(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn config_serializes_to_toml() {
        let toml_str = toml::to_string_pretty(&Config::default()).expect("Failed to serialize");

        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[logging]"));
        assert!(toml_str.contains("[ui]"));
        assert!(toml_str.contains("source = \"Auto\""));
        assert!(!toml_str.contains("path"));
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml_str = r#"
[input]
source = "Evdev"
poll_interval_ms = 4

[output]
mode = "Pipe"
path = "/tmp/keyterm.out"

[logging]
level = "debug"
file = "/tmp/keyterm.log"

[ui]
refresh_rate_hz = 144
theme = "Light"
transcript_len = 50
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.input.source, InputSource::Evdev);
        assert_eq!(config.input.poll_interval_ms, 4);
        assert_eq!(config.output.mode, OutputMode::Pipe);
        assert_eq!(config.output.path, Some(PathBuf::from("/tmp/keyterm.out")));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/keyterm.log")));
        assert_eq!(config.ui.refresh_rate_hz, 144);
        assert_eq!(config.ui.theme, Theme::Light);
        assert_eq!(config.ui.transcript_len, 50);
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: Config = toml::from_str("[ui]\ntheme = \"Light\"\n").expect("Failed to deserialize");
        assert_eq!(config.ui.theme, Theme::Light);
        assert_eq!(config.ui.refresh_rate_hz, 60);
        assert_eq!(config.input, InputConfig::default());
    }

    #[test]
    fn invalid_config_is_a_parse_error() {
        let path = temp_config_path("invalid");
        fs::write(&path, "[input]\nsource = \"Bluetooth\"\n").unwrap();
        let result = Config::load_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "Could not determine config directory");

        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }
}
