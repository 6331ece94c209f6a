//! Mapping from resource keys to filesystem paths
//!
//! Spec index files live under their own root so they can be purged without
//! touching artifacts; everything else mirrors the request path under the
//! cache root. Query strings never reach the filesystem.

use std::path::{Path, PathBuf};

use super::error::StoreError;
use crate::constants::ARTIFACTS_SUBDIR;
use crate::gateway::classifier::{ResourceClass, ResourceKey};

/// The two directory roots of the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    pub cache_root: PathBuf,
    pub specs_root: PathBuf,
}

impl StoreLayout {
    pub fn new(cache_root: impl Into<PathBuf>, specs_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            specs_root: specs_root.into(),
        }
    }

    /// Root a key of the given class is stored under
    pub fn root_for(&self, class: ResourceClass) -> &Path {
        match class {
            ResourceClass::SpecIndex => &self.specs_root,
            ResourceClass::Root | ResourceClass::Artifact | ResourceClass::ApiPassthrough => {
                &self.cache_root
            }
        }
    }

    /// Directory holding `<name>-<version>.gem` files
    pub fn artifacts_dir(&self) -> PathBuf {
        self.cache_root.join(ARTIFACTS_SUBDIR)
    }

    pub fn path_for(&self, key: &ResourceKey) -> Result<PathBuf, StoreError> {
        let relative = relative_path(key.path())?;
        Ok(self.root_for(key.class()).join(relative))
    }
}

/// Turn a request path into a path relative to a store root.
///
/// Rejects anything that could escape the root:
/// - `..` segments
/// - backslashes (Windows-style separators)
/// - URL-encoded dot-dot sequences
/// - null bytes (path truncation)
pub fn relative_path(request_path: &str) -> Result<PathBuf, StoreError> {
    let invalid = || StoreError::InvalidKey {
        key: request_path.to_string(),
    };

    if request_path.contains('\0') || request_path.contains('\\') {
        return Err(invalid());
    }

    let lower = request_path.to_lowercase();
    if lower.contains("%2e%2e") || lower.contains("%2e.") || lower.contains(".%2e") {
        return Err(invalid());
    }

    let mut relative = PathBuf::new();
    for segment in request_path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(invalid()),
            segment => relative.push(segment),
        }
    }

    Ok(relative)
}
