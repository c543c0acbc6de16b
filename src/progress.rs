//! Terminal progress bar for uploads

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use wifiprint_communication::{TransferListener, UploadReport};
use wifiprint_core::Error;

const TEMPLATE: &str = "Progress: |{bar:25}| {percent}% Complete";

/// Upload progress drawn on stderr
///
/// The bar stays hidden until an upload starts. A bar dropped before the
/// upload finished is abandoned so the terminal line is terminated.
pub struct UploadProgress {
    bar: ProgressBar,
    visible: bool,
}

impl Default for UploadProgress {
    fn default() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            visible: true,
        }
    }
}

impl UploadProgress {
    #[cfg(test)]
    fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            visible: false,
        }
    }
}

impl TransferListener for UploadProgress {
    fn on_upload_started(&self, _remote_path: &str, total_bytes: u64) {
        match ProgressStyle::with_template(TEMPLATE) {
            Ok(style) => self.bar.set_style(style.progress_chars("█-")),
            Err(e) => tracing::debug!("Progress template rejected: {}", e),
        }
        self.bar.set_length(total_bytes);
        self.bar.set_position(0);
        if self.visible {
            self.bar.set_draw_target(ProgressDrawTarget::stderr());
        }
    }

    fn on_chunk_sent(&self, _sequence: u32, bytes_sent: u64, _total_bytes: u64) {
        self.bar.set_position(bytes_sent);
    }

    fn on_upload_finished(&self, report: &UploadReport) {
        self.bar.set_position(report.bytes_sent);
        if report.is_complete() {
            self.bar.finish();
        } else {
            self.bar.abandon();
        }
    }

    fn on_upload_failed(&self, _error: &Error) {
        self.bar.abandon();
    }
}

impl Drop for UploadProgress {
    fn drop(&mut self) {
        if self.bar.length().is_some() && !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}
