// HEAD requests: answered from disk when fresh, relayed upstream otherwise

use std::sync::Arc;
use tempfile::TempDir;

use gemcrow::gateway::{GatewayRequest, ManualClock};

use super::test_harness::*;

#[tokio::test]
async fn test_head_on_stored_artifact_reports_disk_size() {
    let registry = StubRegistry::start().await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("public/gems/rack-3.0.0.gem");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"0123456789").unwrap();
    let gateway = gateway_for(&registry.base_url(), dir.path(), Arc::new(ManualClock::default()));

    let response = gateway
        .handle(&GatewayRequest::head("/gems/rack-3.0.0.gem"))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.header("Content-Length"), Some("10"));
    assert_eq!(response.content_type(), Some("application/octet-stream"));
    assert!(response.body.is_empty());
    assert_eq!(registry.hits(), 0);
}

#[tokio::test]
async fn test_head_miss_is_relayed_and_not_stored() {
    let registry = StubRegistry::start().await;
    registry.body("/gems/rake-13.0.6.gem", b"rake-bytes");
    let dir = TempDir::new().unwrap();
    let gateway = gateway_for(&registry.base_url(), dir.path(), Arc::new(ManualClock::default()));

    let response = gateway
        .handle(&GatewayRequest::head("/gems/rake-13.0.6.gem"))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.header("etag"), Some("\"stub\""));
    assert_eq!(response.header("content-length"), Some("10"));
    assert!(response.body.is_empty());
    assert_eq!(
        registry.requests(),
        vec![("HEAD".to_string(), "/gems/rake-13.0.6.gem".to_string())]
    );
    assert!(!dir.path().join("public/gems/rake-13.0.6.gem").exists());
}

#[tokio::test]
async fn test_head_relays_upstream_status() {
    let registry = StubRegistry::start().await;
    let dir = TempDir::new().unwrap();
    let gateway = gateway_for(&registry.base_url(), dir.path(), Arc::new(ManualClock::default()));

    let response = gateway
        .handle(&GatewayRequest::head("/gems/missing-1.0.gem"))
        .await;

    assert_eq!(response.status, 404);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_head_with_upstream_down_and_nothing_stored() {
    let dir = TempDir::new().unwrap();
    let gateway = gateway_for(
        &closed_port_url().await,
        dir.path(),
        Arc::new(ManualClock::default()),
    );

    let response = gateway
        .handle(&GatewayRequest::head("/gems/missing-1.0.gem"))
        .await;

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type(), Some("text/html; charset=utf-8"));
    assert!(response.body.is_empty());
}
