// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers keeps the defaults in one place.

// =============================================================================
// Server defaults
// =============================================================================

/// Default listen address
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// Default listen port (the port `gem server` uses)
pub const DEFAULT_PORT: u16 = 9292;

// =============================================================================
// Upstream defaults
// =============================================================================

/// Canonical upstream registry
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://rubygems.org";

/// Reserved API namespace, always proxied live and never persisted
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Maximum number of redirect hops followed for a single upstream request
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

// =============================================================================
// Storage defaults
// =============================================================================

/// Freshness window for spec index files.
///
/// Just under 24h so that daily refreshes drift away from exact day boundaries.
pub const DEFAULT_SPEC_FRESHNESS_SECS: u64 = 84_600;

/// Default root for artifact files
pub const DEFAULT_CACHE_DIR: &str = "public";

/// Default root for spec index files
pub const DEFAULT_SPECS_DIR: &str = "specs";

/// Directory (under the cache root) holding `<name>-<version>.gem` files
pub const ARTIFACTS_SUBDIR: &str = "gems";

/// Basename prefix identifying spec index files
pub const SPEC_INDEX_PREFIX: &str = "specs.";

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level filter
pub const DEFAULT_LOG_LEVEL: &str = "info";
