//! Configuration file handling for wifiprint
//!
//! Supports JSON and TOML files. Every section has defaults, so a file only
//! needs the keys it overrides:
//!
//! ```toml
//! [printer]
//! host = "printer.local"
//!
//! [transfer]
//! response_timeout_ms = 60000
//! ```

use crate::error::{SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory name under the platform config directory
pub const APP_DIR: &str = "wifiprint";

/// Default config file name
pub const CONFIG_FILE: &str = "config.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Printer addressing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterSettings {
    /// Hostname or IP address
    pub host: String,
    /// Control service TCP port
    pub port: u16,
    /// SD path prefix for uploads
    pub sd_path: String,
}

impl Default for PrinterSettings {
    fn default() -> Self {
        Self {
            host: "10.1.1.129".to_string(),
            port: 8899,
            sd_path: "0:/user/".to_string(),
        }
    }
}

/// Socket deadlines and buffer sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferSettings {
    /// Deadline for opening the socket
    pub connect_timeout_ms: u64,
    /// Deadline for each response
    pub response_timeout_ms: u64,
    /// Maximum bytes read per response
    pub receive_buffer_size: usize,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            response_timeout_ms: 30_000,
            receive_buffer_size: 1024,
        }
    }
}

/// Log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Complete client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Printer addressing
    pub printer: PrinterSettings,
    /// Transfer tuning
    pub transfer: TransferSettings,
    /// Logging
    pub logging: LoggingSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform default location, e.g. `~/.config/wifiprint/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load the explicit file if given, else the default file if it exists,
    /// else defaults
    pub fn load(explicit: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Ok(path) if path.is_file() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load_from_file(&path)
            }
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::debug!("{}; using defaults", e);
                Ok(Self::default())
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)?,
            other => {
                return Err(SettingsError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.printer.host.trim().is_empty() {
            return Err(invalid("printer.host", "must not be empty"));
        }

        if self.printer.port == 0 {
            return Err(invalid("printer.port", "must be > 0"));
        }

        if !self.printer.sd_path.ends_with('/') {
            return Err(invalid("printer.sd_path", "must end with '/'"));
        }

        if self.transfer.connect_timeout_ms == 0 {
            return Err(invalid("transfer.connect_timeout_ms", "must be > 0"));
        }

        if self.transfer.response_timeout_ms == 0 {
            return Err(invalid("transfer.response_timeout_ms", "must be > 0"));
        }

        if self.transfer.receive_buffer_size == 0 {
            return Err(invalid("transfer.receive_buffer_size", "must be > 0"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(invalid(
                "logging.level",
                "must be one of trace, debug, info, warn, error",
            ));
        }

        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn invalid(key: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
