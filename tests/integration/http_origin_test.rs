// HttpOrigin against a local stub registry

use gemcrow::config::UpstreamConfig;
use gemcrow::origin::{HttpOrigin, Origin, OriginError};

use super::test_harness::*;

fn origin_with(base_url: String, max_redirects: usize, timeout_secs: Option<u64>) -> HttpOrigin {
    HttpOrigin::new(&UpstreamConfig {
        base_url,
        max_redirects,
        timeout_secs,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_reads_whole_body_and_drops_hop_by_hop_headers() {
    let registry = StubRegistry::start().await;
    registry.body("/gems/rack-3.0.0.gem", b"payload");
    let origin = origin_for(&registry.base_url());

    let response = origin.fetch("/gems/rack-3.0.0.gem").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body.as_ref(), b"payload");
    assert_eq!(response.header("etag"), Some("\"stub\""));
    assert_eq!(response.header("connection"), None);
}

#[tokio::test]
async fn test_fetch_non_success_is_status_error() {
    let registry = StubRegistry::start().await;
    let origin = origin_for(&registry.base_url());

    let err = origin.fetch("/gems/nope-1.0.gem").await.unwrap_err();

    assert!(matches!(err, OriginError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_connection_refused_is_connect_error() {
    let origin = origin_for(&closed_port_url().await);

    let err = origin.fetch("/specs.4.8.gz").await.unwrap_err();

    assert!(matches!(err, OriginError::Connect { .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_configured_timeout_is_enforced() {
    let registry = StubRegistry::start().await;
    registry.route("/specs.4.8.gz", StubRoute::Hang);
    let origin = origin_with(registry.base_url(), 10, Some(1));

    let err = origin.fetch("/specs.4.8.gz").await.unwrap_err();

    assert!(matches!(err, OriginError::Timeout { .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_redirects_within_limit_are_followed() {
    let registry = StubRegistry::start().await;
    let base = registry.base_url();
    registry.route("/gems/a.gem", StubRoute::Redirect(format!("{}/mirror/a.gem", base)));
    registry.route("/mirror/a.gem", StubRoute::Redirect(format!("{}/final/a.gem", base)));
    registry.body("/final/a.gem", b"final");
    let origin = origin_with(base, 2, None);

    let response = origin.fetch("/gems/a.gem").await.unwrap();

    assert_eq!(response.body.as_ref(), b"final");
    assert_eq!(registry.hits(), 3);
}

#[tokio::test]
async fn test_too_many_redirects_is_redirect_error() {
    let registry = StubRegistry::start().await;
    let base = registry.base_url();
    registry.route("/r0", StubRoute::Redirect(format!("{}/r1", base)));
    registry.route("/r1", StubRoute::Redirect(format!("{}/r2", base)));
    registry.route("/r2", StubRoute::Redirect(format!("{}/r3", base)));
    registry.body("/r3", b"unreachable");
    let origin = origin_with(base, 2, None);

    let err = origin.fetch("/r0").await.unwrap_err();

    assert!(matches!(err, OriginError::Redirect { .. }), "got {:?}", err);
}

#[tokio::test]
async fn test_head_returns_any_status() {
    let registry = StubRegistry::start().await;
    registry.route("/gems/gone-1.0.gem", StubRoute::Status(410));
    let origin = origin_for(&registry.base_url());

    let response = origin.head("/gems/gone-1.0.gem").await.unwrap();

    assert_eq!(response.status, 410);
    assert!(response.body.is_empty());
}
