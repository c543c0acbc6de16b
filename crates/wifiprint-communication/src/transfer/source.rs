//! Upload source files

use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};
use wifiprint_core::{ControllerError, Result};

/// An opened local file ready to be streamed to the printer
#[derive(Debug)]
pub struct UploadSource {
    /// Base file name, used as the remote name
    pub file_name: String,
    /// Size in bytes
    pub size: u64,
    /// Open handle positioned at the start
    pub file: File,
}

impl UploadSource {
    /// Open a local file and derive its remote name
    pub async fn open(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ControllerError::InvalidSource {
                reason: format!("{} has no file name", path.display()),
            })?;

        let path = tokio::fs::canonicalize(path).await?;
        let file = File::open(&path).await?;
        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(ControllerError::InvalidSource {
                reason: format!("{} is not a regular file", path.display()),
            }
            .into());
        }

        Ok(Self {
            file_name,
            size: metadata.len(),
            file,
        })
    }
}

/// Read up to `capacity` bytes, looping over short reads
///
/// Returns fewer bytes only at end of input; an empty buffer means EOF.
pub async fn read_slice<R>(reader: &mut R, capacity: usize) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buf = vec![0u8; capacity];
    let mut filled = 0;
    while filled < capacity {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    buf.truncate(filled);
    Ok(buf)
}
