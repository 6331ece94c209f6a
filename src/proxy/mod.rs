// Proxy module - Pingora ProxyHttp implementation
// Every request is answered by the gateway inside request_filter; nothing is
// forwarded through Pingora's upstream path.

use async_trait::async_trait;
use pingora_core::upstreams::peer::HttpPeer;
use pingora_core::Result;
use pingora_proxy::{ProxyHttp, Session};
use std::sync::Arc;

use crate::gateway::Gateway;
use crate::pipeline::RequestContext;

pub mod helpers;

use helpers::{gateway_request_from, get_client_ip, response_header_for};

/// GemcrowProxy implements the Pingora ProxyHttp trait on top of a [`Gateway`]
pub struct GemcrowProxy {
    gateway: Arc<Gateway>,
}

impl GemcrowProxy {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl ProxyHttp for GemcrowProxy {
    type CTX = RequestContext;

    fn new_ctx(&self) -> Self::CTX {
        RequestContext::default()
    }

    /// Never reached: request_filter answers every request
    async fn upstream_peer(
        &self,
        _session: &mut Session,
        ctx: &mut Self::CTX,
    ) -> Result<Box<HttpPeer>> {
        tracing::error!(
            request_id = %ctx.request_id(),
            "upstream_peer called for a request the gateway did not answer"
        );
        Err(pingora_core::Error::explain(
            pingora_core::ErrorType::InternalError,
            "gemcrow serves every request from request_filter",
        ))
    }

    async fn request_filter(&self, session: &mut Session, ctx: &mut Self::CTX) -> Result<bool> {
        let request = gateway_request_from(session.req_header());
        ctx.set_request(request.method.as_str(), request.path.clone());

        tracing::info!(
            request_id = %ctx.request_id(),
            method = %request.method,
            path = %request.path,
            query = request.query.as_deref().unwrap_or(""),
            "Request received"
        );

        let response = self.gateway.handle(&request).await;

        let mut header = response_header_for(&response, &request.method)?;
        header.insert_header("X-Request-ID", ctx.request_id().to_string())?;

        ctx.set_response(response.status, response.body.len());

        let end_of_stream = response.body.is_empty();
        session
            .write_response_header(Box::new(header), end_of_stream)
            .await?;
        if !end_of_stream {
            session
                .write_response_body(Some(response.body), true)
                .await?;
        }

        Ok(true) // Request handled
    }

    async fn logging(
        &self,
        session: &mut Session,
        e: Option<&pingora_core::Error>,
        ctx: &mut Self::CTX,
    ) {
        let status_code = session
            .response_written()
            .map(|resp| resp.status.as_u16())
            .or(ctx.status())
            .unwrap_or(500);
        let duration_ms = ctx.elapsed().as_secs_f64() * 1000.0;
        let client_ip = get_client_ip(session);

        if let Some(error) = e {
            tracing::warn!(
                request_id = %ctx.request_id(),
                client_ip = %client_ip,
                path = %ctx.path(),
                error = %error,
                "Failed to write response"
            );
        }

        tracing::info!(
            request_id = %ctx.request_id(),
            client_ip = %client_ip,
            method = %ctx.method(),
            path = %ctx.path(),
            status_code = status_code,
            bytes = ctx.body_bytes(),
            duration_ms = duration_ms,
            "Request completed"
        );
    }
}
