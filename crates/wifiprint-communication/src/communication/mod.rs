//! Communication layer
//!
//! Defines the `Transport` abstraction the transfer session drives, and the
//! connection parameters used to open a TCP channel to a printer board.

pub mod tcp;

use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use wifiprint_core::Result;

/// Default TCP port of the board's control service
pub const DEFAULT_PORT: u16 = 8899;

/// Default printer address
pub const DEFAULT_HOST: &str = "10.1.1.129";

/// Default size of a single response read
pub const DEFAULT_RECEIVE_BUFFER: usize = 1024;

/// Parameters for opening a channel to a printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Hostname or IP address
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Deadline for establishing the socket
    pub connect_timeout: Duration,
    /// Deadline for each response read
    pub response_timeout: Duration,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: Duration::from_millis(5_000),
            response_timeout: Duration::from_millis(30_000),
        }
    }
}

impl ConnectionParams {
    /// Parameters for a host on the default port
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Override the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the per-response deadline
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Override the connect deadline
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Byte channel to a printer board
///
/// The protocol is strictly request/response, so implementations never see
/// more than one outstanding command.
#[async_trait]
pub trait Transport: Send {
    /// Write the whole buffer to the peer
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read a single response of at most `max_bytes`
    ///
    /// A closed peer is reported as `ConnectionError::ConnectionLost`,
    /// never as an empty buffer.
    async fn receive(&mut self, max_bytes: usize) -> Result<Vec<u8>>;

    /// Resolved address of the peer, if the transport has one
    fn peer_addr(&self) -> Option<SocketAddr> {
        None
    }
}
