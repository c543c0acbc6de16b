//! Upload chunk framing
//!
//! Each slice of the uploaded file travels as one binary packet:
//!
//! ```text
//! +------------------+
//! | magic A (4)      |  5A 5A A5 A5
//! +------------------+
//! | sequence (4)     |  u32 big-endian, zero-based
//! +------------------+
//! | magic B (4)      |  00 00 10 00
//! +------------------+
//! | crc32 (4)        |  u32 big-endian, over the payload
//! +------------------+
//! | payload          |  CHUNK_CAPACITY bytes, zero-padded
//! +------------------+
//! ```
//!
//! The payload capacity is derived from the board's 4113-byte receive buffer
//! and must stay at 4096 bytes for the boards to accept the packet.

/// Board-side receive buffer size
pub const BUFSIZE: usize = 4113;

/// First magic header field
pub const MAGIC_A: [u8; 4] = [0x5a, 0x5a, 0xa5, 0xa5];

/// Second magic header field
pub const MAGIC_B: [u8; 4] = [0x00, 0x00, 0x10, 0x00];

/// Magic A + sequence + magic B
pub const HEADER_LEN: usize = MAGIC_A.len() + 4 + MAGIC_B.len();

/// Size of the CRC32 field
pub const CRC_LEN: usize = 4;

/// Payload bytes per chunk
pub const CHUNK_CAPACITY: usize = BUFSIZE - HEADER_LEN - 5;

/// Total size of an encoded packet
pub const PACKET_LEN: usize = HEADER_LEN + CRC_LEN + CHUNK_CAPACITY;

/// CRC32 (IEEE) of a buffer
pub fn checksum(data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// One padded slice of the source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    sequence: u32,
    payload: Vec<u8>,
    data_len: usize,
}

impl Chunk {
    /// Zero-pad a slice of file data to `CHUNK_CAPACITY`
    ///
    /// Returns `None` for an empty slice, which marks end of file. Slices
    /// longer than the capacity are refused the same way; the reader never
    /// produces them.
    pub fn padded(sequence: u32, mut data: Vec<u8>) -> Option<Self> {
        if data.is_empty() || data.len() > CHUNK_CAPACITY {
            return None;
        }
        let data_len = data.len();
        if data_len < CHUNK_CAPACITY {
            tracing::debug!(
                "Padding chunk {} with {} zero bytes",
                sequence,
                CHUNK_CAPACITY - data_len
            );
            data.resize(CHUNK_CAPACITY, 0);
        }
        Some(Self {
            sequence,
            payload: data,
            data_len,
        })
    }

    /// Sequence number
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Padded payload
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Number of file bytes before padding
    pub fn data_len(&self) -> usize {
        self.data_len
    }

    /// Encode for the wire
    pub fn to_packet(&self) -> Option<Packet> {
        frame(&self.payload, self.sequence)
    }
}

/// Wire-encoded chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    bytes: Vec<u8>,
}

impl Packet {
    /// Encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encoded length
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; empty payloads never produce a packet
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Sequence number field
    pub fn sequence(&self) -> u32 {
        read_be(&self.bytes[MAGIC_A.len()..MAGIC_A.len() + 4])
    }

    /// CRC32 field
    pub fn crc(&self) -> u32 {
        read_be(&self.bytes[HEADER_LEN..HEADER_LEN + CRC_LEN])
    }

    /// Payload following the CRC field
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_LEN + CRC_LEN..]
    }
}

/// Build a `PACKET_LEN` packet, zero-padding the payload to `CHUNK_CAPACITY`
///
/// An empty payload is the end-of-file sentinel and yields no packet, as
/// does a payload larger than the capacity. The CRC covers the padded payload.
pub fn frame(payload: &[u8], sequence: u32) -> Option<Packet> {
    if payload.is_empty() || payload.len() > CHUNK_CAPACITY {
        return None;
    }

    let mut body = Vec::with_capacity(CHUNK_CAPACITY);
    body.extend_from_slice(payload);
    body.resize(CHUNK_CAPACITY, 0);

    let mut bytes = Vec::with_capacity(PACKET_LEN);
    bytes.extend_from_slice(&MAGIC_A);
    bytes.extend_from_slice(&sequence.to_be_bytes());
    bytes.extend_from_slice(&MAGIC_B);
    bytes.extend_from_slice(&checksum(&body).to_be_bytes());
    bytes.extend_from_slice(&body);
    Some(Packet { bytes })
}

fn read_be(field: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(field);
    u32::from_be_bytes(word)
}
