use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("binary not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read binary '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no module format registered for '{path}'")]
    UnknownFormat { path: PathBuf },

    #[error("malformed module manifest '{path}': {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("failed to scan directory at {path}: {source}")]
    DirectoryScan {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl LoadError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn unknown_format(path: impl Into<PathBuf>) -> Self {
        Self::UnknownFormat { path: path.into() }
    }

    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }
}
