//! Path classification for incoming requests.
//!
//! Every request path falls into exactly one [`ResourceClass`]. Classification
//! is a pure function of the path string: no I/O, and no input is rejected
//! (anything unrecognised is an [`ResourceClass::Artifact`]).

use std::fmt;

use crate::constants::{DEFAULT_API_PREFIX, SPEC_INDEX_PREFIX};

/// Category of a requested resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceClass {
    /// Exactly `/`; the generated index page.
    Root,
    /// Periodically regenerated index file (`specs.4.8.gz`, ...).
    SpecIndex,
    /// Versioned package file, immutable once fetched.
    Artifact,
    /// Reserved API namespace; proxied live and never persisted.
    ApiPassthrough,
}

impl ResourceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceClass::Root => "root",
            ResourceClass::SpecIndex => "spec_index",
            ResourceClass::Artifact => "artifact",
            ResourceClass::ApiPassthrough => "api_passthrough",
        }
    }
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final path segment (everything after the last `/`).
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Whether a basename names a spec index file (`specs.<anything>`, case-sensitive).
pub fn is_spec_index_name(name: &str) -> bool {
    name.starts_with(SPEC_INDEX_PREFIX)
}

/// Classifies request paths against a configured API prefix.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    api_prefix: String,
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_API_PREFIX)
    }
}

impl PathClassifier {
    /// Create a classifier; a trailing `/` on the prefix is ignored.
    pub fn new(api_prefix: impl Into<String>) -> Self {
        let mut api_prefix = api_prefix.into();
        while api_prefix.len() > 1 && api_prefix.ends_with('/') {
            api_prefix.pop();
        }
        Self { api_prefix }
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    pub fn classify(&self, path: &str) -> ResourceClass {
        if path == "/" {
            return ResourceClass::Root;
        }

        if self.is_api_path(path) {
            return ResourceClass::ApiPassthrough;
        }

        if is_spec_index_name(basename(path)) {
            return ResourceClass::SpecIndex;
        }

        ResourceClass::Artifact
    }

    // Segment-wise prefix match: "/api" and "/api/v1/x" match, "/apiary" does not.
    fn is_api_path(&self, path: &str) -> bool {
        match path.strip_prefix(self.api_prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Identity of a resource: store lookup key and origin fetch target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    class: ResourceClass,
    path: String,
    query: Option<String>,
}

impl ResourceKey {
    pub fn new(class: ResourceClass, path: impl Into<String>, query: Option<&str>) -> Self {
        Self {
            class,
            path: path.into(),
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
        }
    }

    pub fn class(&self) -> ResourceClass {
        self.class
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Canonical `path[?query]` join, used verbatim against the origin.
    pub fn target(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target())
    }
}
