#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use wifiprint_communication::Transport;
use wifiprint_core::{ConnectionError, Result};

pub const OK: &[u8] = b"CMD Received.\r\nok\r\n";

/// Transport that records every write and replays scripted responses
pub struct MockTransport {
    pub sent: Arc<Mutex<Vec<Vec<u8>>>>,
    responses: VecDeque<Vec<u8>>,
}

impl MockTransport {
    pub fn new(responses: Vec<&[u8]>) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            responses: responses.into_iter().map(|r| r.to_vec()).collect(),
        }
    }

    /// Answer every request with `ok`
    pub fn always_ok(count: usize) -> Self {
        Self::new(vec![OK; count])
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.sent.lock().push(data.to_vec());
        Ok(())
    }

    async fn receive(&mut self, max_bytes: usize) -> Result<Vec<u8>> {
        match self.responses.pop_front() {
            Some(mut response) => {
                response.truncate(max_bytes);
                Ok(response)
            }
            None => Err(ConnectionError::ConnectionLost {
                reason: "script exhausted".to_string(),
            }
            .into()),
        }
    }
}

/// Binary chunk packets among the recorded writes
pub fn packets(sent: &[Vec<u8>]) -> Vec<Vec<u8>> {
    sent.iter()
        .filter(|w| w.starts_with(&[0x5a, 0x5a, 0xa5, 0xa5]))
        .cloned()
        .collect()
}

/// Text commands among the recorded writes
pub fn commands(sent: &[Vec<u8>]) -> Vec<String> {
    sent.iter()
        .filter(|w| !w.starts_with(&[0x5a, 0x5a, 0xa5, 0xa5]))
        .map(|w| String::from_utf8_lossy(w).into_owned())
        .collect()
}

pub fn sequence_of(packet: &[u8]) -> u32 {
    u32::from_be_bytes([packet[4], packet[5], packet[6], packet[7]])
}
