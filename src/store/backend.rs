//! Backend trait for filesystem operations

use super::error::StoreError;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Metadata the store needs about a filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    pub len: u64,
    pub modified: SystemTime,
    pub is_dir: bool,
}

/// Abstraction over filesystem operations so the store can run against
/// the real filesystem or an in-memory double
#[async_trait]
pub trait StoreBackend: Send + Sync {
    /// Read entire file contents
    async fn read_file(&self, path: &Path) -> Result<Bytes, StoreError>;

    /// Write file contents, replacing any previous file (temp file + rename)
    async fn write_file_atomic(&self, path: &Path, data: Bytes) -> Result<(), StoreError>;

    /// Delete a file
    async fn delete_file(&self, path: &Path) -> Result<(), StoreError>;

    /// Create directory and all parent directories
    async fn create_dir_all(&self, path: &Path) -> Result<(), StoreError>;

    /// Size, modification time and kind; `None` when nothing exists at `path`
    async fn metadata(&self, path: &Path) -> Result<Option<FileMeta>, StoreError>;

    /// List the direct children of a directory
    async fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, StoreError>;
}
