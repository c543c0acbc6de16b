//! Error handling for wifiprint
//!
//! Provides the error types for every layer of the client:
//! - Connection errors (resolution, socket, deadlines)
//! - Protocol errors (commands the printer refused)
//! - Controller errors (session state machine misuse)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Connection error type
///
/// Represents errors related to the TCP channel to the printer board.
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// Failed to resolve hostname
    #[error("Failed to resolve hostname {hostname}")]
    HostnameResolution {
        /// The hostname that failed to resolve.
        hostname: String,
    },

    /// Failed to open the socket
    #[error("Failed to connect to {address}: {reason}")]
    FailedToConnect {
        /// The address that was dialled.
        address: String,
        /// The reason the connection failed.
        reason: String,
    },

    /// Connection or response deadline expired
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Peer closed the connection
    #[error("Connection lost: {reason}")]
    ConnectionLost {
        /// The reason the connection was lost.
        reason: String,
    },

    /// Socket I/O error
    #[error("I/O error: {reason}")]
    IoError {
        /// The reason for the I/O error.
        reason: String,
    },
}

/// Protocol error type
///
/// A command reached the printer but was not acknowledged with the `ok` sentinel.
#[derive(Error, Debug, Clone)]
pub enum ProtocolError {
    /// The board refused to enter control mode
    #[error("Printer rejected control request: {response:?}")]
    InitRejected {
        /// Raw response text.
        response: String,
    },

    /// The board refused to open the target file for writing
    #[error("Printer failed to accept file {path}: {response:?}")]
    StartWriteRejected {
        /// Remote SD path of the upload.
        path: String,
        /// Raw response text.
        response: String,
    },
}

impl ProtocolError {
    /// Whether the failure leaves no usable session (INIT or start-write refused)
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProtocolError::InitRejected { .. } | ProtocolError::StartWriteRejected { .. }
        )
    }
}

/// Controller error type
///
/// Represents misuse of the session state machine.
#[derive(Error, Debug, Clone)]
pub enum ControllerError {
    /// Operation invalid in the current session state
    #[error("Invalid state transition from {current:?} to {requested:?}")]
    InvalidStateTransition {
        /// The current state name.
        current: String,
        /// The requested state name.
        requested: String,
    },

    /// The upload source has no usable file name
    #[error("Invalid upload source: {reason}")]
    InvalidSource {
        /// Why the source was rejected.
        reason: String,
    },
}

/// Main error type for wifiprint
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Protocol error
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Controller error
    #[error(transparent)]
    Controller(#[from] ControllerError),

    /// Standard I/O error (source file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Connection(ConnectionError::ConnectionTimeout { .. })
        )
    }

    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if the printer refused a command that ends the session
    pub fn is_fatal_protocol_error(&self) -> bool {
        matches!(self, Error::Protocol(e) if e.is_fatal())
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
