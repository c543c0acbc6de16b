//! Printer wire protocol
//!
//! Commands, response validation and upload chunk framing.

pub mod commands;
pub mod framing;
pub mod response;

pub use commands::{sd_path, Command, DEFAULT_SD_PATH, TERMINATOR};
pub use framing::{checksum, frame, Chunk, Packet, CHUNK_CAPACITY, PACKET_LEN};
pub use response::{is_ok, Response, RESPONSE_OK};
