//! Transport-neutral request and response values exchanged with the
//! HTTP wrapper.

use bytes::Bytes;
use http::Method;

/// Decoded inbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
}

impl GatewayRequest {
    pub fn new(method: Method, path: impl Into<String>, query: Option<&str>) -> Self {
        Self {
            method,
            path: path.into(),
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path, None)
    }

    pub fn head(path: impl Into<String>) -> Self {
        Self::new(Method::HEAD, path, None)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path, None)
    }
}

/// Outbound response: status, headers and a fully buffered body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl GatewayResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// 200 with raw registry bytes
    pub fn octet_stream(body: Bytes) -> Self {
        Self::new(
            200,
            vec![(
                "Content-Type".to_string(),
                "application/octet-stream".to_string(),
            )],
            body,
        )
    }

    /// 200 with a rendered view
    pub fn html(body: impl Into<String>) -> Self {
        Self::new(
            200,
            vec![(
                "Content-Type".to_string(),
                "text/html; charset=utf-8".to_string(),
            )],
            Bytes::from(body.into()),
        )
    }

    /// 200 with an empty text body
    pub fn empty_plain() -> Self {
        Self::new(
            200,
            vec![("Content-Type".to_string(), "text/plain".to_string())],
            Bytes::new(),
        )
    }

    /// HEAD answer synthesized from a stored entry of `len` bytes
    pub fn head_metadata(len: u64) -> Self {
        Self::new(
            200,
            vec![
                (
                    "Content-Type".to_string(),
                    "application/octet-stream".to_string(),
                ),
                ("Content-Length".to_string(), len.to_string()),
            ],
            Bytes::new(),
        )
    }

    /// Drop the body, keeping status and headers (for HEAD)
    pub fn without_body(mut self) -> Self {
        self.body = Bytes::new();
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }
}
