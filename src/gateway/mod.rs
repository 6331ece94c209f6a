//! Cache gateway: classifies each request, consults the store and the origin,
//! and produces the response.
//!
//! Request flow:
//! ```text
//! request -> PathClassifier -> policy -> store / origin -> GatewayResponse
//! ```
//!
//! `DELETE` bypasses the pipeline and purges spec index files. `handle` never
//! fails: everything that cannot be served goes through [`Gateway::render_failure`].

use bytes::Bytes;
use http::Method;
use std::sync::Arc;
use std::time::Duration;

pub mod classifier;
pub mod clock;
pub mod policy;
pub mod response;


pub use self::classifier::{PathClassifier, ResourceClass, ResourceKey};
pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::policy::Freshness;
pub use self::response::{GatewayRequest, GatewayResponse};

use crate::error::GatewayError;
use crate::origin::{Origin, OriginResponse};
use crate::store::{EntryState, Store, StoreError};
use crate::views::{View, ViewContext, ViewRenderer};

pub struct Gateway {
    store: Store,
    origin: Arc<dyn Origin>,
    renderer: Arc<ViewRenderer>,
    classifier: PathClassifier,
    clock: Arc<dyn Clock>,
    freshness_window: Duration,
}

impl Gateway {
    pub fn new(
        store: Store,
        origin: Arc<dyn Origin>,
        renderer: Arc<ViewRenderer>,
        classifier: PathClassifier,
        clock: Arc<dyn Clock>,
        freshness_window: Duration,
    ) -> Self {
        Self {
            store,
            origin,
            renderer,
            classifier,
            clock,
            freshness_window,
        }
    }

    /// Key for a request path and query
    pub fn key_for(&self, path: &str, query: Option<&str>) -> ResourceKey {
        ResourceKey::new(self.classifier.classify(path), path, query)
    }

    /// Serve one request.
    ///
    /// Methods other than `GET`, `HEAD` and `DELETE` are served like `GET`.
    pub async fn handle(&self, request: &GatewayRequest) -> GatewayResponse {
        let key = self.key_for(&request.path, request.query.as_deref());

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            class = %key.class(),
            "Classified request"
        );

        match request.method {
            Method::DELETE => self.purge().await,
            Method::HEAD => self.head(&key).await,
            _ => match self.get(&key).await {
                Ok(response) => response,
                Err(e) => self.render_failure(key.path(), &e),
            },
        }
    }

    /// Error boundary: every unrecovered failure becomes a 200 with the
    /// rendered not-found view.
    pub fn render_failure(&self, request_path: &str, error: &GatewayError) -> GatewayResponse {
        tracing::warn!(
            path = %request_path,
            error = %error,
            "Request could not be served, rendering not-found view"
        );
        self.not_found_view(request_path)
    }

    /// Remove every spec index file, returning the count.
    ///
    /// Serves `DELETE` requests and the `--purge-specs` maintenance command.
    pub async fn purge_spec_index(&self) -> Result<usize, StoreError> {
        let removed = self.store.purge_spec_index_files().await?;
        tracing::info!(
            removed = removed,
            root = %self.store.layout().specs_root.display(),
            "Purged spec index files"
        );
        Ok(removed)
    }

    async fn purge(&self) -> GatewayResponse {
        if let Err(e) = self.purge_spec_index().await {
            tracing::error!(error = %e, "Failed to purge spec index files");
        }
        GatewayResponse::empty_plain()
    }

    async fn get(&self, key: &ResourceKey) -> Result<GatewayResponse, GatewayError> {
        match self.serve(key).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::error!(
                    path = %key.path(),
                    class = %key.class(),
                    error = %e,
                    "Request failed, falling back to stored copy"
                );
                self.read_stored(key).await
            }
        }
    }

    async fn serve(&self, key: &ResourceKey) -> Result<GatewayResponse, GatewayError> {
        match key.class() {
            ResourceClass::Root => {
                let artifacts = self.store.list_artifacts().await?;
                let ctx = ViewContext::new(key.path()).with_artifacts(artifacts);
                Ok(GatewayResponse::html(self.renderer.render(View::Index, &ctx)))
            }
            ResourceClass::ApiPassthrough => {
                let upstream = self.origin.fetch(&key.target()).await?;
                tracing::info!(path = %key.target(), "Passed through to upstream");
                Ok(passthrough_response(upstream))
            }
            ResourceClass::SpecIndex | ResourceClass::Artifact => self.serve_cacheable(key).await,
        }
    }

    async fn serve_cacheable(&self, key: &ResourceKey) -> Result<GatewayResponse, GatewayError> {
        let entry = self.store.entry(key).await?;
        if entry == EntryState::Directory {
            tracing::debug!(path = %key.path(), "Key resolves to a directory");
            return Ok(self.not_found_view(key.path()));
        }

        let freshness = policy::freshness(key.class(), &entry, self.clock.now(), self.freshness_window);
        if freshness == Freshness::Fresh {
            tracing::info!(path = %key.path(), class = %key.class(), "Read from cache");
            let body = self.store.read(key).await?;
            return Ok(GatewayResponse::octet_stream(body));
        }

        tracing::info!(
            path = %key.path(),
            class = %key.class(),
            reason = freshness.as_str(),
            "Read from upstream"
        );
        let upstream = self.origin.fetch(&key.target()).await?;

        // Persistence is best-effort; the fetched bytes are served regardless
        if let Err(e) = self.store.write(key, upstream.body.clone()).await {
            tracing::warn!(path = %key.path(), error = %e, "Failed to store fetched body");
        }

        Ok(GatewayResponse::octet_stream(upstream.body))
    }

    /// Whatever currently sits at the key's store path, stale or not.
    async fn read_stored(&self, key: &ResourceKey) -> Result<GatewayResponse, GatewayError> {
        match self.store.read(key).await {
            Ok(body) => {
                tracing::info!(path = %key.path(), "Serving stored copy");
                Ok(GatewayResponse::octet_stream(body))
            }
            Err(StoreError::IsDirectory { .. }) => Err(GatewayError::DirectoryConflict {
                path: key.path().to_string(),
            }),
            Err(e) if e.is_not_found() => Err(GatewayError::NotFoundLocally {
                path: key.path().to_string(),
            }),
            Err(e) => Err(GatewayError::Store(e)),
        }
    }

    async fn head(&self, key: &ResourceKey) -> GatewayResponse {
        let entry = match key.class() {
            ResourceClass::SpecIndex | ResourceClass::Artifact => {
                self.store.entry(key).await.unwrap_or(EntryState::Missing)
            }
            ResourceClass::Root | ResourceClass::ApiPassthrough => EntryState::Missing,
        };

        if let EntryState::File { len, .. } = entry {
            if policy::is_fresh(key.class(), &entry, self.clock.now(), self.freshness_window) {
                tracing::debug!(path = %key.path(), len = len, "HEAD answered from cache");
                return GatewayResponse::head_metadata(len);
            }
        }

        match self.origin.head(&key.target()).await {
            Ok(upstream) => {
                GatewayResponse::new(upstream.status, upstream.headers, Bytes::new())
            }
            Err(e) => {
                tracing::error!(path = %key.path(), error = %e, "Upstream HEAD failed");
                match self.store.entry(key).await {
                    Ok(EntryState::File { len, .. }) => GatewayResponse::head_metadata(len),
                    _ => self
                        .render_failure(key.path(), &GatewayError::Upstream(e))
                        .without_body(),
                }
            }
        }
    }

    fn not_found_view(&self, request_path: &str) -> GatewayResponse {
        let ctx = ViewContext::new(request_path);
        GatewayResponse::html(self.renderer.render(View::NotFound, &ctx))
    }
}

/// Live API response: upstream status and headers, fully buffered body.
///
/// `Content-Length` is recomputed from the buffered body downstream.
fn passthrough_response(upstream: OriginResponse) -> GatewayResponse {
    let headers = upstream
        .headers
        .into_iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("content-length"))
        .collect();
    GatewayResponse::new(upstream.status, headers, upstream.body)
}
