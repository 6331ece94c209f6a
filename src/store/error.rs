//! Error types for store operations

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found in store: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Path is a directory: {}", path.display())]
    IsDirectory { path: PathBuf },

    #[error("Invalid store key: {key}")]
    InvalidKey { key: String },
}

impl StoreError {
    /// Whether the error means "nothing usable at this key".
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::NotFound { .. } | StoreError::InvalidKey { .. } => true,
            StoreError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            StoreError::IsDirectory { .. } => false,
        }
    }
}
