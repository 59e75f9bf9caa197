//! Append-only per-instance log files.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append-only log file for one instance.
///
/// Opened once for the owning worker's lifetime and closed on drop,
/// whatever the exit path. Existing file content is preserved and
/// extended, so logs survive process restarts.
pub struct LogSink {
    file: File,
    path: PathBuf,
    total_bytes: u64,
}

impl LogSink {
    /// Opens `<folder>/<alias>.log` in append-create mode.
    pub fn open(folder: &Path, alias: &str) -> io::Result<Self> {
        let path = folder.join(format!("{alias}.log"));
        let file = OpenOptions::new().append(true).create(true).open(&path)?;
        Ok(Self {
            file,
            path,
            total_bytes: 0,
        })
    }

    /// Appends one fragment followed by a newline record separator.
    ///
    /// Returns the running total of content bytes written by this sink,
    /// separators excluded.
    pub fn append(&mut self, data: &[u8]) -> io::Result<u64> {
        self.file.write_all(data)?;
        self.file.write_all(b"\n")?;
        self.file.flush()?;
        self.total_bytes += data.len() as u64;
        Ok(self.total_bytes)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}
