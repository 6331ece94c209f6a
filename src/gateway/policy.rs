//! Cache policy: cacheability and freshness decisions.
//!
//! Pure functions over a [`ResourceClass`] and the store's view of an entry.

use std::time::{Duration, SystemTime};

use super::classifier::ResourceClass;
use crate::store::EntryState;

/// Whether responses for this class may ever be persisted.
///
/// `Root` is cacheable in principle but is always rendered, so callers
/// special-case it before consulting the store.
pub fn is_cacheable(class: ResourceClass) -> bool {
    !matches!(class, ResourceClass::ApiPassthrough)
}

/// Freshness of a stored entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Serve from the store
    Fresh,
    /// Bytes exist but are past the freshness window
    Expired,
    /// Nothing usable on disk
    Missing,
}

impl Freshness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Freshness::Fresh => "fresh",
            Freshness::Expired => "expired",
            Freshness::Missing => "missing",
        }
    }
}

/// Age of an entry at `now`. A modification time in the future is age zero.
pub fn entry_age(modified: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(modified).unwrap_or(Duration::ZERO)
}

pub fn freshness(
    class: ResourceClass,
    entry: &EntryState,
    now: SystemTime,
    window: Duration,
) -> Freshness {
    let modified = match entry {
        EntryState::File { modified, .. } => *modified,
        EntryState::Missing | EntryState::Directory => return Freshness::Missing,
    };

    match class {
        ResourceClass::SpecIndex => {
            if entry_age(modified, now) < window {
                Freshness::Fresh
            } else {
                Freshness::Expired
            }
        }
        // Immutable once fetched
        ResourceClass::Artifact => Freshness::Fresh,
        ResourceClass::Root | ResourceClass::ApiPassthrough => Freshness::Missing,
    }
}

pub fn is_fresh(
    class: ResourceClass,
    entry: &EntryState,
    now: SystemTime,
    window: Duration,
) -> bool {
    freshness(class, entry, now, window) == Freshness::Fresh
}
