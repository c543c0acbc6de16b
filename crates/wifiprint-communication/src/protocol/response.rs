//! Response validation
//!
//! The protocol has no structured result codes. A command succeeded iff the
//! decoded response ends with the `ok\r\n` sentinel.

/// Success sentinel
pub const RESPONSE_OK: &str = "ok\r\n";

/// A response read from the printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    raw: Vec<u8>,
    text: String,
}

impl Response {
    /// Decode raw bytes, replacing invalid UTF-8 sequences
    pub fn from_bytes(raw: Vec<u8>) -> Self {
        let text = String::from_utf8_lossy(&raw).into_owned();
        Self { raw, text }
    }

    /// Raw bytes as received
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Decoded text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume into the decoded text
    pub fn into_text(self) -> String {
        self.text
    }

    /// Whether the response carries the `ok` sentinel
    pub fn is_ok(&self) -> bool {
        is_ok(&self.text)
    }
}

/// Suffix check against the `ok\r\n` sentinel
pub fn is_ok(response: &str) -> bool {
    let ok = response.ends_with(RESPONSE_OK);
    if !ok {
        tracing::debug!("Server response not OK: {:?}", response);
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_sentinel() {
        assert!(is_ok("ok\r\n"));
        assert!(is_ok("CMD M28 Received.\r\nWriting to file: 0:/user/a.gcode\r\nok\r\n"));
    }

    #[test]
    fn test_not_ok() {
        assert!(!is_ok(""));
        assert!(!is_ok("ok"));
        assert!(!is_ok("ok\r"));
        assert!(!is_ok("ok\n"));
        assert!(!is_ok("ERROR\r\n"));
        assert!(!is_ok("ok\r\n "));
        assert!(!is_ok("OK\r\n"));
    }

    #[test]
    fn test_lossy_decoding() {
        let response = Response::from_bytes(vec![0xff, 0xfe, b'o', b'k', b'\r', b'\n']);
        assert!(response.is_ok());
        assert!(response.text().starts_with('\u{fffd}'));
        assert_eq!(response.raw().len(), 6);
    }
}
