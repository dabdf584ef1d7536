use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Malformed sidecar {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid sidecar {}: {message}", .path.display())]
    Schema { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not write tags to {}: {detail}", .path.display())]
    TagWrite { path: PathBuf, detail: String },
}

/// Coarse classification of a [`TransferError`], handy for reporting and matching in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Schema,
    Io,
    TagWrite,
}

impl TransferError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Schema { .. } => ErrorKind::Schema,
            Self::Io { .. } => ErrorKind::Io,
            Self::TagWrite { .. } => ErrorKind::TagWrite,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransferError>;
