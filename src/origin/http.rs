//! reqwest-backed origin client

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::Url;
use std::time::Duration;

use super::{is_relayable_header, Origin, OriginError, OriginResponse};
use crate::config::UpstreamConfig;

/// Origin client for a fixed upstream base URL
#[derive(Clone)]
pub struct HttpOrigin {
    base_url: String,
    client: reqwest::Client,
}

/// Whether following `prev -> next` would leave TLS
pub fn is_downgrade(prev: &Url, next: &Url) -> bool {
    prev.scheme() == "https" && next.scheme() == "http"
}

/// Redirect policy that follows at most `max_hops` redirects and never
/// downgrades from https to http
pub fn safe_redirect_policy(max_hops: usize) -> Policy {
    Policy::custom(move |attempt| {
        let downgrade = attempt
            .previous()
            .last()
            .is_some_and(|prev| is_downgrade(prev, attempt.url()));

        if downgrade {
            attempt.error("refusing redirect from https to http")
        } else if attempt.previous().len() > max_hops {
            attempt.error(format!("too many redirects (max {})", max_hops))
        } else {
            attempt.follow()
        }
    })
}

impl HttpOrigin {
    /// Create a client from upstream configuration.
    ///
    /// No timeout is applied unless one is configured.
    pub fn new(config: &UpstreamConfig) -> Result<Self, OriginError> {
        let mut builder = reqwest::Client::builder()
            .redirect(safe_redirect_policy(config.max_redirects))
            .user_agent(concat!("gemcrow/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout_secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }

        let client = builder.build().map_err(|e| OriginError::Request {
            url: config.base_url.clone(),
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute upstream URL for a `path[?query]` target
    pub fn url_for(&self, target: &str) -> String {
        if target.starts_with('/') {
            format!("{}{}", self.base_url, target)
        } else {
            format!("{}/{}", self.base_url, target)
        }
    }

    fn classify_error(url: &str, e: reqwest::Error) -> OriginError {
        let url = url.to_string();
        if e.is_timeout() {
            OriginError::Timeout { url }
        } else if e.is_redirect() {
            OriginError::Redirect {
                url,
                message: e.to_string(),
            }
        } else if e.is_connect() {
            OriginError::Connect {
                url,
                message: e.to_string(),
            }
        } else {
            OriginError::Request {
                url,
                message: e.to_string(),
            }
        }
    }

    fn relayable_headers(response: &reqwest::Response) -> Vec<(String, String)> {
        response
            .headers()
            .iter()
            .filter(|(name, _)| is_relayable_header(name.as_str()))
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl Origin for HttpOrigin {
    async fn fetch(&self, target: &str) -> Result<OriginResponse, OriginError> {
        let url = self.url_for(target);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::classify_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OriginError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let headers = Self::relayable_headers(&response);

        // The body is read to completion before anyone sees it
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                OriginError::Timeout { url: url.clone() }
            } else {
                OriginError::Body {
                    url: url.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(OriginResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }

    async fn head(&self, target: &str) -> Result<OriginResponse, OriginError> {
        let url = self.url_for(target);
        let response = self
            .client
            .head(&url)
            .send()
            .await
            .map_err(|e| Self::classify_error(&url, e))?;

        Ok(OriginResponse {
            status: response.status().as_u16(),
            headers: Self::relayable_headers(&response),
            body: bytes::Bytes::new(),
        })
    }
}
