//! Local byte store for fetched registry files
//!
//! Entries are plain files mirroring the request path under one of two
//! roots (see [`StoreLayout`]). There is no separate metadata file: an entry's
//! age is the file's own modification time.
//!
//! Backends:
//! - **tokio::fs backend**: the real filesystem
//! - **mock backend** (tests only): in-memory map with a controllable clock

use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::gateway::classifier::ResourceKey;

pub use self::backend::{FileMeta, StoreBackend};
pub use self::error::StoreError;
pub use self::layout::StoreLayout;
pub use self::tokio_backend::TokioFsBackend;

pub mod backend;
mod error;
pub mod layout;
pub mod tokio_backend;

#[cfg(test)]
pub(crate) mod mock_backend;

/// What currently sits at a key's filesystem path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Missing,
    Directory,
    File { len: u64, modified: SystemTime },
}

/// Filesystem-backed key/value byte store
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn StoreBackend>,
    layout: StoreLayout,
}

impl Store {
    pub fn new(backend: Arc<dyn StoreBackend>, layout: StoreLayout) -> Self {
        Self { backend, layout }
    }

    /// Store on the real filesystem
    pub fn on_disk(layout: StoreLayout) -> Self {
        Self::new(Arc::new(TokioFsBackend::new()), layout)
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn path_for(&self, key: &ResourceKey) -> Result<PathBuf, StoreError> {
        self.layout.path_for(key)
    }

    /// Inspect the entry for `key`. Keys that cannot map to a path are `Missing`.
    pub async fn entry(&self, key: &ResourceKey) -> Result<EntryState, StoreError> {
        let path = match self.layout.path_for(key) {
            Ok(path) => path,
            Err(e) if e.is_not_found() => {
                tracing::debug!(key = %key, error = %e, "Key has no store path");
                return Ok(EntryState::Missing);
            }
            Err(e) => return Err(e),
        };

        Ok(match self.backend.metadata(&path).await? {
            None => EntryState::Missing,
            Some(meta) if meta.is_dir => EntryState::Directory,
            Some(meta) => EntryState::File {
                len: meta.len,
                modified: meta.modified,
            },
        })
    }

    pub async fn exists(&self, key: &ResourceKey) -> bool {
        matches!(self.entry(key).await, Ok(EntryState::File { .. }))
    }

    pub async fn last_modified(&self, key: &ResourceKey) -> Option<SystemTime> {
        match self.entry(key).await {
            Ok(EntryState::File { modified, .. }) => Some(modified),
            _ => None,
        }
    }

    pub async fn read(&self, key: &ResourceKey) -> Result<Bytes, StoreError> {
        let path = self.layout.path_for(key)?;
        self.backend.read_file(&path).await
    }

    /// Replace the entry for `key` with `data`, creating parent directories.
    pub async fn write(&self, key: &ResourceKey, data: Bytes) -> Result<(), StoreError> {
        let path = self.layout.path_for(key)?;
        if let Some(parent) = path.parent() {
            self.backend.create_dir_all(parent).await?;
        }
        self.backend.write_file_atomic(&path, data).await
    }

    /// Delete every file under the spec index root, fresh or not.
    ///
    /// Returns the number of files removed. Directories are left in place, and
    /// the cache root is never entered even when it sits below the specs root.
    /// A file that cannot be deleted is logged and skipped.
    pub async fn purge_spec_index_files(&self) -> Result<usize, StoreError> {
        let cache_root = normalized(&self.layout.cache_root);
        let files = self
            .walk_files(&self.layout.specs_root, |dir| normalized(dir) == cache_root)
            .await?;

        let mut removed = 0;
        for path in files {
            match self.backend.delete_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to delete spec index file"
                    );
                }
            }
        }
        Ok(removed)
    }

    /// Basenames of every `*.gem` file below the artifacts directory, sorted.
    pub async fn list_artifacts(&self) -> Result<Vec<String>, StoreError> {
        let mut names: Vec<String> = self
            .walk_files(&self.layout.artifacts_dir(), |_| false)
            .await?
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str()))
            .filter(|name| name.ends_with(".gem"))
            .map(str::to_string)
            .collect();
        names.sort();
        Ok(names)
    }

    /// All regular files below `root`, depth first, not descending into
    /// directories for which `skip` holds. A missing root has none.
    async fn walk_files<F>(&self, root: &Path, skip: F) -> Result<Vec<PathBuf>, StoreError>
    where
        F: Fn(&Path) -> bool,
    {
        let mut files = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            for child in self.backend.read_dir(&dir).await? {
                match self.backend.metadata(&child).await? {
                    Some(meta) if meta.is_dir => {
                        if skip(&child) {
                            tracing::debug!(dir = %child.display(), "Skipping nested directory");
                        } else {
                            pending.push(child);
                        }
                    }
                    Some(_) => files.push(child),
                    None => {}
                }
            }
        }

        Ok(files)
    }
}

/// `path` without `.` components, so `./public` and `public` compare equal
pub fn normalized(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
