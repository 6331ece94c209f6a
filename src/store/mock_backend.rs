//! Mock store backend for testing (in-memory HashMap storage)

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use super::backend::{FileMeta, StoreBackend};
use super::error::StoreError;
use crate::gateway::clock::Clock;

/// Mock backend that stores files in memory, stamping writes with `clock`
#[derive(Clone)]
pub struct MockStoreBackend {
    files: Arc<RwLock<HashMap<PathBuf, (Bytes, SystemTime)>>>,
    directories: Arc<RwLock<HashSet<PathBuf>>>,
    clock: Arc<dyn Clock>,
    writes: Arc<AtomicUsize>,
    /// Simulate write errors if true
    simulate_write_failure: Arc<RwLock<bool>>,
    /// Paths whose deletion fails
    undeletable: Arc<RwLock<HashSet<PathBuf>>>,
}

impl MockStoreBackend {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
            directories: Arc::new(RwLock::new(HashSet::new())),
            clock,
            writes: Arc::new(AtomicUsize::new(0)),
            simulate_write_failure: Arc::new(RwLock::new(false)),
            undeletable: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Make every subsequent write fail with a permission error
    pub fn set_write_failure(&self, enabled: bool) {
        *self.simulate_write_failure.write() = enabled;
    }

    /// Make deleting `path` fail with a permission error
    pub fn fail_delete_of(&self, path: impl Into<PathBuf>) {
        self.undeletable.write().insert(path.into());
    }

    /// Put a file in place without going through the write path
    pub fn insert_file(&self, path: impl Into<PathBuf>, data: &'static [u8], modified: SystemTime) {
        let path = path.into();
        self.add_parents(&path);
        self.files
            .write()
            .insert(path, (Bytes::from_static(data), modified));
    }

    pub fn insert_dir(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.add_parents(&path);
        self.directories.write().insert(path);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.read().contains_key(path)
    }

    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn add_parents(&self, path: &Path) {
        let mut dirs = self.directories.write();
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }
            dirs.insert(dir.to_path_buf());
            current = dir.parent();
        }
    }
}

#[async_trait]
impl StoreBackend for MockStoreBackend {
    async fn read_file(&self, path: &Path) -> Result<Bytes, StoreError> {
        if self.directories.read().contains(path) {
            return Err(StoreError::IsDirectory {
                path: path.to_path_buf(),
            });
        }

        self.files
            .read()
            .get(path)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| StoreError::NotFound {
                path: path.to_path_buf(),
            })
    }

    async fn write_file_atomic(&self, path: &Path, data: Bytes) -> Result<(), StoreError> {
        if *self.simulate_write_failure.read() {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "Simulated permission denied",
            )));
        }

        self.add_parents(path);
        self.files
            .write()
            .insert(path.to_path_buf(), (data, self.clock.now()));
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_file(&self, path: &Path) -> Result<(), StoreError> {
        if self.undeletable.read().contains(path) {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "Simulated permission denied",
            )));
        }
        self.files.write().remove(path);
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), StoreError> {
        self.insert_dir(path);
        Ok(())
    }

    async fn metadata(&self, path: &Path) -> Result<Option<FileMeta>, StoreError> {
        if let Some((data, modified)) = self.files.read().get(path) {
            return Ok(Some(FileMeta {
                len: data.len() as u64,
                modified: *modified,
                is_dir: false,
            }));
        }

        if self.directories.read().contains(path) {
            return Ok(Some(FileMeta {
                len: 0,
                modified: SystemTime::UNIX_EPOCH,
                is_dir: true,
            }));
        }

        Ok(None)
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, StoreError> {
        let mut entries: Vec<PathBuf> = self
            .files
            .read()
            .keys()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();

        entries.extend(
            self.directories
                .read()
                .iter()
                .filter(|p| p.parent() == Some(path))
                .cloned(),
        );

        entries.sort();
        Ok(entries)
    }
}
