//! # wifiprint Communication
//!
//! TCP transport and file transfer protocol for WiFi-enabled 3D printer
//! controller boards: command handshakes, chunked binary uploads with CRC32
//! framing, and `ok` sentinel validation.

pub mod communication;
pub mod protocol;
pub mod transfer;

pub use communication::{
    tcp::TcpTransport, ConnectionParams, Transport, DEFAULT_HOST, DEFAULT_PORT,
    DEFAULT_RECEIVE_BUFFER,
};

pub use protocol::{Chunk, Command, Packet, Response, CHUNK_CAPACITY, PACKET_LEN};

pub use transfer::{
    run_job, Job, JobOutcome, JobReport, NoOpListener, PrintOutcome, Session, SessionOptions,
    TransferListener, UploadReport, UploadStatus,
};
