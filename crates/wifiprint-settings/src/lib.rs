//! wifiprint Settings Crate
//!
//! Handles loading, validating and saving the client configuration.

pub mod config;
pub mod error;

pub use config::{Config, LoggingSettings, PrinterSettings, TransferSettings};
pub use error::{SettingsError, SettingsResult};
