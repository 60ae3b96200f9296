//! Log file handle with a bounded tail read.
//!
//! The file is truncated when the service starts and then only appended to
//! by the tracing file layer. `tail` walks backwards from the end of the
//! file in fixed-size chunks, so reading the last N lines costs memory
//! proportional to those lines, not to the whole log.

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Size of each backwards read.
const CHUNK_SIZE: u64 = 8 * 1024;

/// The service's log file.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create (or truncate) the file and return a handle for the log writer.
    pub fn open_truncated(&self) -> io::Result<File> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
    }

    /// The last `n` lines of the file, oldest first. A missing file has no lines.
    pub async fn tail(&self, n: usize) -> io::Result<Vec<String>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || match tail_lines(&path, n) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            other => other,
        })
        .await
        .map_err(io::Error::other)?
    }
}

/// Read the last `n` lines of `path` without loading the whole file.
pub fn tail_lines(path: &Path, n: usize) -> io::Result<Vec<String>> {
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut file = File::open(path)?;
    let mut pos = file.metadata()?.len();
    let mut buf: Vec<u8> = Vec::new();

    while pos > 0 {
        let read = CHUNK_SIZE.min(pos);
        pos -= read;
        file.seek(SeekFrom::Start(pos))?;
        let mut chunk = vec![0u8; read as usize];
        file.read_exact(&mut chunk)?;
        chunk.extend_from_slice(&buf);
        buf = chunk;

        // A trailing newline terminates the last line rather than starting a new one.
        let body = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);
        if body.iter().filter(|&&b| b == b'\n').count() >= n {
            break;
        }
    }

    let text = String::from_utf8_lossy(&buf);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    Ok(lines[start..].iter().map(|l| l.to_string()).collect())
}
