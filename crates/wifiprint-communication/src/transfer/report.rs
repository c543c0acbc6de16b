//! Upload and print outcomes

use serde::{Deserialize, Serialize};

/// How an upload ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadStatus {
    /// Every chunk was acknowledged
    Completed,
    /// The printer refused a chunk; later chunks were not sent
    ChunkRejected {
        /// Sequence number of the refused chunk
        sequence: u32,
    },
}

/// Result of an upload, including partial progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReport {
    /// Remote SD path
    pub remote_path: String,
    /// Source file size in bytes
    pub total_bytes: u64,
    /// File bytes (before padding) in acknowledged chunks
    pub bytes_sent: u64,
    /// Number of acknowledged chunks
    pub chunks_sent: u32,
    /// Terminal status
    pub status: UploadStatus,
    /// Wall clock duration in milliseconds
    pub elapsed_ms: u64,
}

impl UploadReport {
    /// Whether the whole file reached the printer
    pub fn is_complete(&self) -> bool {
        self.status == UploadStatus::Completed
    }

    /// Percentage of the file acknowledged
    pub fn percent_sent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        self.bytes_sent as f64 * 100.0 / self.total_bytes as f64
    }
}

/// Result of the select-file / start-print handshake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PrintOutcome {
    /// The print job started
    Started {
        /// SD path being printed
        path: String,
    },
    /// The board refused to select the file
    FileSelectRejected {
        /// SD path that was refused
        path: String,
        /// Raw response text
        response: String,
    },
    /// The file was selected but the print did not start
    StartRejected {
        /// SD path that was selected
        path: String,
        /// Raw response text
        response: String,
    },
}

impl PrintOutcome {
    /// Whether the print job started
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started { .. })
    }
}
