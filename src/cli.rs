//! Command line interface

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use wifiprint_communication::Job;
use wifiprint_settings::Config;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// Send G-code files to WiFi-enabled 3D printers
#[derive(Parser, Debug)]
#[command(
    name = "wifiprint",
    author,
    version,
    long_version = LONG_VERSION,
    about = "Upload G-code to a WiFi 3D printer and optionally start printing"
)]
pub struct Cli {
    /// Filename of file to send to printer
    pub filename: Option<PathBuf>,

    /// Print status of the 3D printer
    #[arg(short = 's', long = "status")]
    pub status: bool,

    /// List the files on the printer SD card
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Print on completion of file upload
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// Hostname or IP address of printer
    #[arg(short = 'a', long = "address", value_name = "HOST")]
    pub host: Option<String>,

    /// Control service port
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Response timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Do not draw the upload progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Load the config file and apply command line overrides
    pub fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Overlay flags onto a loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.printer.host = host.clone();
        }
        if let Some(port) = self.port {
            config.printer.port = port;
        }
        if let Some(timeout) = self.timeout {
            config.transfer.response_timeout_ms = timeout;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }

    /// Work requested on the command line
    pub fn job(&self) -> Job {
        Job {
            status: self.status,
            list_files: self.list,
            upload: self.filename.clone(),
            print_after_upload: self.print && self.filename.is_some(),
        }
    }
}
