//! Printer command set
//!
//! The boards speak a small dialect of tilde-prefixed M-codes. Every command
//! is a single CR-LF terminated ASCII line.

use std::fmt;

/// Line terminator for every command
pub const TERMINATOR: &str = "\r\n";

/// Default SD path prefix for uploaded files
pub const DEFAULT_SD_PATH: &str = "0:/user/";

/// A command sent to the printer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Request control mode (`~M601 S1`)
    Init,
    /// Open a file on the SD card for writing (`M28 <size> <path>`)
    StartWrite {
        /// File size in bytes
        size: u64,
        /// Full SD path including prefix
        path: String,
    },
    /// Close the file being written (`~M29`)
    EndWrite,
    /// Select an SD file for printing (`~M23 <path>`)
    SetSdFile {
        /// Full SD path including prefix
        path: String,
    },
    /// Start printing the selected file (`~M27`)
    StartPrint,
    /// Query machine status (`~M115`)
    Status,
    /// Query the SD file list (`~M20 `)
    FileList,
    /// Leave control mode (`~M602`)
    Release,
}

impl Command {
    /// Command line without terminator
    pub fn line(&self) -> String {
        match self {
            Self::Init => "~M601 S1".to_string(),
            Self::StartWrite { size, path } => format!("M28 {} {}", size, path),
            Self::EndWrite => "~M29".to_string(),
            Self::SetSdFile { path } => format!("~M23 {}", path),
            Self::StartPrint => "~M27".to_string(),
            Self::Status => "~M115".to_string(),
            // Trailing space is part of the board's expected syntax
            Self::FileList => "~M20 ".to_string(),
            Self::Release => "~M602".to_string(),
        }
    }

    /// Bytes as written to the socket
    pub fn to_wire(&self) -> Vec<u8> {
        let mut line = self.line();
        line.push_str(TERMINATOR);
        line.into_bytes()
    }

    /// Whether the response must end with the `ok` sentinel
    ///
    /// End-write and release responses are read but carry no reliable
    /// acknowledgment; status and file list are raw passthrough.
    pub fn expects_ok(&self) -> bool {
        matches!(
            self,
            Self::Init
                | Self::StartWrite { .. }
                | Self::SetSdFile { .. }
                | Self::StartPrint
        )
    }

    /// Short name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::StartWrite { .. } => "START-WRITE",
            Self::EndWrite => "END-WRITE",
            Self::SetSdFile { .. } => "SET-SD-FILE",
            Self::StartPrint => "START-PRINT",
            Self::Status => "STATUS",
            Self::FileList => "FILE-LIST",
            Self::Release => "RELEASE",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line())
    }
}

/// Join the SD prefix and a bare file name
pub fn sd_path(prefix: &str, file_name: &str) -> String {
    format!("{}{}", prefix, file_name)
}
