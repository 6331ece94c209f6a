// Request pipeline module - per-request context carried through the proxy

use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-request context created before the request is served
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    method: String,
    path: String,
    started_at: Instant,
    status: Option<u16>,
    body_bytes: usize,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

impl RequestContext {
    /// Create a new RequestContext with a fresh UUID v4 request id
    pub fn new(method: String, path: String) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method,
            path,
            started_at: Instant::now(),
            status: None,
            body_bytes: 0,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Record the decoded request line
    pub fn set_request(&mut self, method: impl Into<String>, path: impl Into<String>) {
        self.method = method.into();
        self.path = path.into();
    }

    /// Record what was written back to the client
    pub fn set_response(&mut self, status: u16, body_bytes: usize) {
        self.status = Some(status);
        self.body_bytes = body_bytes;
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn body_bytes(&self) -> usize {
        self.body_bytes
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
