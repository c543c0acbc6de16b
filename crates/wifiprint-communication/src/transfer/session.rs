//! Printer session state machine
//!
//! A `Session` owns the transport and walks the board through
//! `Connected -> Uploading -> Idle -> Printing -> Released`. Every command is
//! sent and its response read before the next one goes out; each transition
//! checks the current state and refuses out-of-order calls.

use crate::communication::tcp::TcpTransport;
use crate::communication::{ConnectionParams, Transport, DEFAULT_RECEIVE_BUFFER};
use crate::protocol::{sd_path, Chunk, Command, Response, CHUNK_CAPACITY, DEFAULT_SD_PATH};
use crate::transfer::listener::TransferListener;
use crate::transfer::report::{PrintOutcome, UploadReport, UploadStatus};
use crate::transfer::source::{read_slice, UploadSource};
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Instant;
use tokio::io::AsyncRead;
use wifiprint_core::{ControllerError, ProtocolError, Result, SessionState};

/// Options that shape a session once the channel is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// SD path prefix for uploaded files
    pub sd_path: String,
    /// Maximum bytes read per response
    pub receive_buffer_size: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            sd_path: DEFAULT_SD_PATH.to_string(),
            receive_buffer_size: DEFAULT_RECEIVE_BUFFER,
        }
    }
}

/// An open control session with a printer board
pub struct Session<T: Transport> {
    transport: T,
    options: SessionOptions,
    state: SessionState,
}

impl Session<TcpTransport> {
    /// Open a TCP channel and request control mode
    pub async fn connect(params: &ConnectionParams, options: SessionOptions) -> Result<Self> {
        let transport = TcpTransport::connect(params).await?;
        Self::handshake(transport, options).await
    }
}

impl<T: Transport> Session<T> {
    /// Send INIT over an open transport
    ///
    /// Fails with `ProtocolError::InitRejected` if the board does not answer
    /// with the `ok` sentinel. The board must then be power-cycled; no retry
    /// is attempted.
    pub async fn handshake(transport: T, options: SessionOptions) -> Result<Self> {
        let mut session = Self {
            transport,
            options,
            state: SessionState::Disconnected,
        };

        let response = session.exchange(&Command::Init).await?;
        if !response.is_ok() {
            tracing::error!("connect: Failed to control printer.");
            return Err(ProtocolError::InitRejected {
                response: response.into_text(),
            }
            .into());
        }

        session.state = SessionState::Connected;
        tracing::info!("Printer accepted control request");
        Ok(session)
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Resolved peer address
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.transport.peer_addr()
    }

    /// Full SD path for a bare file name
    pub fn remote_path(&self, file_name: &str) -> String {
        sd_path(&self.options.sd_path, file_name)
    }

    /// Query machine status; the response is returned verbatim
    pub async fn status(&mut self) -> Result<String> {
        self.expect_query_state("Status")?;
        let response = self.exchange(&Command::Status).await?;
        Ok(response.into_text())
    }

    /// Query the SD file list; the response is returned verbatim
    pub async fn list_files(&mut self) -> Result<String> {
        self.expect_query_state("FileList")?;
        let response = self.exchange(&Command::FileList).await?;
        tracing::info!("Get list of files result: {}", response.text());
        Ok(response.into_text())
    }

    /// Upload a local file under its base name
    pub async fn upload_file(
        &mut self,
        path: &Path,
        listener: &dyn TransferListener,
    ) -> Result<UploadReport> {
        let source = UploadSource::open(path).await?;
        tracing::info!("Filesize is: {}", source.size);
        self.upload(&source.file_name, source.size, source.file, listener)
            .await
    }

    /// Upload `size` bytes from `reader` as `file_name`
    ///
    /// A refused start-write is returned as `ProtocolError::StartWriteRejected`
    /// before any chunk is sent. A refused chunk stops the loop without
    /// retransmission; the report then carries `UploadStatus::ChunkRejected`
    /// and the bytes that were acknowledged. End-write is sent in both cases.
    pub async fn upload<R>(
        &mut self,
        file_name: &str,
        size: u64,
        mut reader: R,
        listener: &dyn TransferListener,
    ) -> Result<UploadReport>
    where
        R: AsyncRead + Unpin + Send,
    {
        self.expect_state(
            &[SessionState::Connected, SessionState::Idle],
            SessionState::Uploading,
        )?;

        let started = Instant::now();
        let remote_path = self.remote_path(file_name);

        let response = self
            .exchange(&Command::StartWrite {
                size,
                path: remote_path.clone(),
            })
            .await?;
        if !response.is_ok() {
            tracing::error!("Printer failed to accept file {}", remote_path);
            return Err(ProtocolError::StartWriteRejected {
                path: remote_path,
                response: response.into_text(),
            }
            .into());
        }

        self.state = SessionState::Uploading;
        tracing::info!("Printer ready to receive file: {}", remote_path);
        listener.on_upload_started(&remote_path, size);

        let sent = match self.send_chunks(&mut reader, size, listener).await {
            Ok(sent) => self.end_write().await.map(|()| sent),
            Err(e) => Err(e),
        };
        let (sequence, bytes_sent, status) = match sent {
            Ok(sent) => sent,
            Err(e) => {
                listener.on_upload_failed(&e);
                return Err(e);
            }
        };

        let report = UploadReport {
            remote_path,
            total_bytes: size,
            bytes_sent,
            chunks_sent: sequence,
            status,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        listener.on_upload_finished(&report);
        Ok(report)
    }

    /// Stream framed chunks until EOF or the first refusal
    ///
    /// Returns the next sequence number, acknowledged file bytes and status.
    async fn send_chunks<R>(
        &mut self,
        reader: &mut R,
        size: u64,
        listener: &dyn TransferListener,
    ) -> Result<(u32, u64, UploadStatus)>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut sequence: u32 = 0;
        let mut bytes_sent: u64 = 0;
        let mut status = UploadStatus::Completed;

        loop {
            let slice = read_slice(reader, CHUNK_CAPACITY).await?;
            let Some(chunk) = Chunk::padded(sequence, slice) else {
                break;
            };
            let Some(packet) = chunk.to_packet() else {
                break;
            };

            self.transport.send(packet.as_bytes()).await?;
            let response = self.read_response().await?;
            if !response.is_ok() {
                tracing::error!(
                    "Failed to get OK from printer for chunk {}: {:?}",
                    sequence,
                    response.text()
                );
                status = UploadStatus::ChunkRejected { sequence };
                break;
            }

            bytes_sent += chunk.data_len() as u64;
            tracing::debug!(
                "Chunk {} acknowledged ({}/{} bytes)",
                sequence,
                bytes_sent,
                size
            );
            listener.on_chunk_sent(sequence, bytes_sent, size);
            sequence += 1;
        }

        Ok((sequence, bytes_sent, status))
    }

    /// Select an SD file and start printing it
    ///
    /// Refusals are soft failures reported through `PrintOutcome`; only I/O
    /// problems are returned as errors.
    pub async fn start_print(&mut self, file_name: &str) -> Result<PrintOutcome> {
        self.expect_state(
            &[SessionState::Connected, SessionState::Idle],
            SessionState::Printing,
        )?;

        let path = self.remote_path(file_name);
        let response = self
            .exchange(&Command::SetSdFile { path: path.clone() })
            .await?;
        if !response.is_ok() {
            tracing::error!("startPrint: failed to set SD card filename: {}", path);
            return Ok(PrintOutcome::FileSelectRejected {
                path,
                response: response.into_text(),
            });
        }
        tracing::debug!("startPrint: set SD card filename: {}", path);

        let response = self.exchange(&Command::StartPrint).await?;
        if !response.is_ok() {
            tracing::error!("startPrint: failed to start print job");
            return Ok(PrintOutcome::StartRejected {
                path,
                response: response.into_text(),
            });
        }

        self.state = SessionState::Printing;
        tracing::info!("startPrint: successfully started print job");
        Ok(PrintOutcome::Started { path })
    }

    /// Leave control mode and close the channel
    ///
    /// Valid from any state. The response is logged but not validated.
    pub async fn release(mut self) -> Result<String> {
        let response = self.exchange(&Command::Release).await?;
        self.state = SessionState::Released;
        tracing::info!("Release result: {:?}", response.text());
        Ok(response.into_text())
    }

    async fn end_write(&mut self) -> Result<()> {
        let response = self.exchange(&Command::EndWrite).await?;
        // No reliable close acknowledgment exists; log and move on.
        tracing::info!("End write to SD result: {:?}", response.text());
        self.state = SessionState::Idle;
        Ok(())
    }

    async fn exchange(&mut self, command: &Command) -> Result<Response> {
        tracing::debug!("{} -> {:?}", command.name(), command.line());
        self.transport.send(&command.to_wire()).await?;
        let response = self.read_response().await?;
        tracing::debug!("{} <- {:?}", command.name(), response.text());
        Ok(response)
    }

    async fn read_response(&mut self) -> Result<Response> {
        let raw = self
            .transport
            .receive(self.options.receive_buffer_size)
            .await?;
        Ok(Response::from_bytes(raw))
    }

    fn expect_query_state(&self, requested: &str) -> Result<()> {
        if self.state.accepts_queries() {
            return Ok(());
        }
        Err(ControllerError::InvalidStateTransition {
            current: self.state.to_string(),
            requested: requested.to_string(),
        }
        .into())
    }

    fn expect_state(&self, allowed: &[SessionState], requested: SessionState) -> Result<()> {
        if allowed.contains(&self.state) {
            return Ok(());
        }
        Err(ControllerError::InvalidStateTransition {
            current: self.state.to_string(),
            requested: requested.to_string(),
        }
        .into())
    }
}

impl<T: Transport> fmt::Display for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peer_addr() {
            Some(addr) => write!(f, "Device addr:{} ({})", addr, self.state),
            None => write!(f, "Device addr:unknown ({})", self.state),
        }
    }
}
