//! Upload progress listener interface

use super::report::UploadReport;
use wifiprint_core::Error;

/// Receives progress notifications during an upload
///
/// All methods have empty defaults; implement only what you render.
pub trait TransferListener: Send + Sync {
    /// Called once the printer accepted the start-write command
    fn on_upload_started(&self, _remote_path: &str, _total_bytes: u64) {}

    /// Called after each acknowledged chunk
    fn on_chunk_sent(&self, _sequence: u32, _bytes_sent: u64, _total_bytes: u64) {}

    /// Called after end-write, whatever the upload status
    fn on_upload_finished(&self, _report: &UploadReport) {}

    /// Called instead of `on_upload_finished` when the transfer errors out
    fn on_upload_failed(&self, _error: &Error) {}
}

/// Listener that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpListener;

impl TransferListener for NoOpListener {}
