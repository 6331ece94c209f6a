//! Upstream registry configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_API_PREFIX, DEFAULT_MAX_REDIRECTS, DEFAULT_UPSTREAM_BASE_URL};

fn default_base_url() -> String {
    DEFAULT_UPSTREAM_BASE_URL.to_string()
}

fn default_api_prefix() -> String {
    DEFAULT_API_PREFIX.to_string()
}

fn default_max_redirects() -> usize {
    DEFAULT_MAX_REDIRECTS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL every request target is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Paths under this prefix are proxied live and never stored
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Request timeout in seconds; unset leaves the HTTP client default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            timeout_secs: None,
            max_redirects: default_max_redirects(),
        }
    }
}

impl UpstreamConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(format!(
                "upstream.base_url '{}' must be an http:// or https:// URL",
                self.base_url
            ));
        }

        if !self.api_prefix.starts_with('/') {
            return Err(format!(
                "upstream.api_prefix '{}' does not start with /",
                self.api_prefix
            ));
        }

        if self.api_prefix.trim_end_matches('/').is_empty() {
            return Err("upstream.api_prefix cannot be /".to_string());
        }

        if self.timeout_secs == Some(0) {
            return Err("upstream.timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
