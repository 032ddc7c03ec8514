//! Error types for the logger

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while installing the logger
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to open log file {}: {source}", path.display())]
    FileSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install global logger: {message}")]
    Init { message: String },
}

impl LoggerError {
    pub fn file_sink(path: &Path, source: std::io::Error) -> Self {
        Self::FileSink {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn init(message: impl Into<String>) -> Self {
        Self::Init {
            message: message.into(),
        }
    }
}
