//! Proxy utility functions.
//!
//! Conversions between Pingora's request/response types and the gateway's
//! transport-neutral values, plus client IP detection for request logs.

use http::Method;
use pingora_core::Result;
use pingora_http::{RequestHeader, ResponseHeader};
use pingora_proxy::Session;

use crate::gateway::{GatewayRequest, GatewayResponse};

/// Decode a Pingora request into a gateway request.
///
/// The path is taken as sent (not percent-decoded); the query string is kept
/// verbatim for forwarding.
pub fn gateway_request_from(req: &RequestHeader) -> GatewayRequest {
    let path = req.uri.path();
    let path = if path.is_empty() { "/" } else { path };
    GatewayRequest::new(req.method.clone(), path, req.uri.query())
}

/// Build the response header for a gateway response to a `method` request.
///
/// `Content-Length` is set from the body unless the response already carries
/// one. HEAD answers are never given a length they did not report, since
/// their body is always empty.
pub fn response_header_for(response: &GatewayResponse, method: &Method) -> Result<ResponseHeader> {
    let mut header = ResponseHeader::build(response.status, None)?;
    for (name, value) in &response.headers {
        header.append_header(name.clone(), value.as_str())?;
    }
    if *method != Method::HEAD && response.header("Content-Length").is_none() {
        header.insert_header("Content-Length", response.body.len().to_string())?;
    }
    Ok(header)
}

/// Extract client IP address from session (X-Forwarded-For aware).
///
/// The header can contain multiple IPs: `"client, proxy1, proxy2"`.
/// The first IP is the original client, which is what we return.
pub fn get_client_ip(session: &Session) -> String {
    if let Some(forwarded_for) = session
        .req_header()
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(client_ip) = forwarded_for.split(',').next() {
            return client_ip.trim().to_string();
        }
    }

    session
        .client_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
