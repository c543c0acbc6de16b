//! Session lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a printer session
///
/// `Disconnected -> Connected -> Uploading -> Idle -> Printing -> Released`.
/// Status and file list queries are allowed from `Connected` and `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No socket open
    Disconnected,
    /// INIT acknowledged, board is in control mode
    Connected,
    /// Start-write acknowledged, chunks in flight
    Uploading,
    /// End-write sent after an upload
    Idle,
    /// Print job started
    Printing,
    /// Release sent, session finished
    Released,
}

impl SessionState {
    /// Whether raw queries (status, file list) may be issued
    pub fn accepts_queries(self) -> bool {
        matches!(self, Self::Connected | Self::Idle)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connected => write!(f, "Connected"),
            Self::Uploading => write!(f, "Uploading"),
            Self::Idle => write!(f, "Idle"),
            Self::Printing => write!(f, "Printing"),
            Self::Released => write!(f, "Released"),
        }
    }
}
