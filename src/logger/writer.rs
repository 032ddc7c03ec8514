//! Append-only file sink for the logger

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::error::LoggerError;

/// File writer that falls back to stderr once a write fails
#[derive(Debug, Clone)]
pub struct FileSink {
    state: Arc<Mutex<SinkState>>,
    path: PathBuf,
}

#[derive(Debug)]
struct SinkState {
    file: File,
    /// Set after the first failed write, from then on lines go to stderr
    fallback_mode: bool,
}

impl FileSink {
    /// Open `path` for appending, creating parent directories as needed
    pub fn open(path: &Path) -> Result<Self, LoggerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| LoggerError::file_sink(path, e))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| LoggerError::file_sink(path, e))?;

        Ok(Self {
            state: Arc::new(Mutex::new(SinkState {
                file,
                fallback_mode: false,
            })),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the sink gave up on the file and writes to stderr
    pub fn is_in_fallback_mode(&self) -> bool {
        self.state.lock().map(|s| s.fallback_mode).unwrap_or(false)
    }
}

impl<'a> MakeWriter<'a> for FileSink {
    type Writer = FileSinkGuard;

    fn make_writer(&'a self) -> Self::Writer {
        FileSinkGuard {
            state: Arc::clone(&self.state),
        }
    }
}

pub struct FileSinkGuard {
    state: Arc<Mutex<SinkState>>,
}

impl Write for FileSinkGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("Failed to acquire writer lock"))?;

        if state.fallback_mode {
            return io::stderr().write(buf);
        }

        match state.file.write(buf) {
            Ok(written) => Ok(written),
            Err(e) => {
                state.fallback_mode = true;
                eprintln!("[Logger] File write failed, falling back to stderr: {}", e);
                io::stderr().write(buf)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("Failed to acquire writer lock"))?;

        if state.fallback_mode {
            return io::stderr().flush();
        }

        state.file.flush()
    }
}
