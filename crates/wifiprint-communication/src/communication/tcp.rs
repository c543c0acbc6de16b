//! TCP transport
//!
//! Resolves the printer hostname, opens the stream socket and performs
//! deadline-bounded reads and writes on it.

use super::{ConnectionParams, Transport};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use wifiprint_core::{ConnectionError, Result};

/// TCP channel to a printer board
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
    peer: SocketAddr,
    response_timeout: Duration,
}

impl TcpTransport {
    /// Resolve `params.host` and open a socket to it
    pub async fn connect(params: &ConnectionParams) -> Result<Self> {
        let peer = resolve(&params.host, params.port).await?;
        tracing::info!("Connecting to host: {}, IP: {}", params.host, peer.ip());

        let stream = match tokio::time::timeout(params.connect_timeout, TcpStream::connect(peer))
            .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                tracing::warn!("Failed to connect to {}: {}", peer, e);
                return Err(ConnectionError::FailedToConnect {
                    address: peer.to_string(),
                    reason: e.to_string(),
                }
                .into());
            }
            Err(_) => {
                return Err(ConnectionError::ConnectionTimeout {
                    timeout_ms: params.connect_timeout.as_millis() as u64,
                }
                .into())
            }
        };

        if let Err(e) = stream.set_nodelay(true) {
            tracing::debug!("Could not disable Nagle on {}: {}", peer, e);
        }

        Ok(Self {
            stream,
            peer,
            response_timeout: params.response_timeout,
        })
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        match tokio::time::timeout(self.response_timeout, self.stream.write_all(data)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(io_error(&e).into()),
            Err(_) => {
                tracing::error!(
                    "Send of {} bytes to {} stalled for {}ms",
                    data.len(),
                    self.peer,
                    self.response_timeout.as_millis()
                );
                Err(ConnectionError::ConnectionTimeout {
                    timeout_ms: self.response_timeout.as_millis() as u64,
                }
                .into())
            }
        }
    }

    async fn receive(&mut self, max_bytes: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; max_bytes.max(1)];
        let n = match tokio::time::timeout(self.response_timeout, self.stream.read(&mut buf)).await
        {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(io_error(&e).into()),
            Err(_) => {
                tracing::error!(
                    "No response from {} within {}ms",
                    self.peer,
                    self.response_timeout.as_millis()
                );
                return Err(ConnectionError::ConnectionTimeout {
                    timeout_ms: self.response_timeout.as_millis() as u64,
                }
                .into());
            }
        };

        if n == 0 {
            return Err(ConnectionError::ConnectionLost {
                reason: format!("{} closed the connection", self.peer),
            }
            .into());
        }

        buf.truncate(n);
        Ok(buf)
    }

    fn peer_addr(&self) -> Option<SocketAddr> {
        Some(self.peer)
    }
}

/// Resolve a hostname, preferring IPv4 (the boards have no IPv6 stack)
async fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let addrs: Vec<SocketAddr> = lookup_host((host, port))
        .await
        .map_err(|_| ConnectionError::HostnameResolution {
            hostname: host.to_string(),
        })?
        .collect();

    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            ConnectionError::HostnameResolution {
                hostname: host.to_string(),
            }
            .into()
        })
}

fn io_error(e: &std::io::Error) -> ConnectionError {
    match e.kind() {
        std::io::ErrorKind::ConnectionReset
        | std::io::ErrorKind::ConnectionAborted
        | std::io::ErrorKind::BrokenPipe => ConnectionError::ConnectionLost {
            reason: e.to_string(),
        },
        _ => ConnectionError::IoError {
            reason: e.to_string(),
        },
    }
}
