//! # wifiprint
//!
//! Command line client for WiFi-enabled 3D printer controller boards:
//! upload G-code to the SD card, start prints, query status.
//!
//! ## Architecture
//!
//! 1. **wifiprint-core** - Error types and session states
//! 2. **wifiprint-communication** - TCP transport, wire protocol, transfer session
//! 3. **wifiprint-settings** - Configuration files
//! 4. **wifiprint** - This binary: CLI, logging, progress output

pub mod app;
pub mod cli;
pub mod progress;

pub use wifiprint_communication::{
    run_job, ConnectionParams, Job, JobOutcome, JobReport, PrintOutcome, Session, SessionOptions,
    TransferListener, UploadReport, UploadStatus,
};
pub use wifiprint_core::{Error, Result, SessionState};
pub use wifiprint_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// `RUST_LOG` takes precedence over `default_level`. Output goes to stderr so
/// that status and file list responses on stdout stay clean.
pub fn init_logging(default_level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Connection parameters from a resolved config
pub fn connection_params(config: &Config) -> ConnectionParams {
    ConnectionParams::new(config.printer.host.clone())
        .with_port(config.printer.port)
        .with_connect_timeout(std::time::Duration::from_millis(
            config.transfer.connect_timeout_ms,
        ))
        .with_response_timeout(std::time::Duration::from_millis(
            config.transfer.response_timeout_ms,
        ))
}

/// Session options from a resolved config
pub fn session_options(config: &Config) -> SessionOptions {
    SessionOptions {
        sd_path: config.printer.sd_path.clone(),
        receive_buffer_size: config.transfer.receive_buffer_size,
    }
}
