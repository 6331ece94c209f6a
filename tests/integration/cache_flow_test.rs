// Cache fill and reuse against a stub registry over the real filesystem

use std::sync::Arc;
use tempfile::TempDir;

use gemcrow::gateway::{GatewayRequest, ManualClock};

use super::test_harness::*;

#[tokio::test]
async fn test_artifact_fetched_once_and_written_to_disk() {
    let registry = StubRegistry::start().await;
    registry.body("/gems/rack-3.0.0.gem", b"rack-gem-bytes");
    let dir = TempDir::new().unwrap();
    let gateway = gateway_for(&registry.base_url(), dir.path(), Arc::new(ManualClock::default()));
    let request = GatewayRequest::get("/gems/rack-3.0.0.gem");

    let response = gateway.handle(&request).await;

    assert_eq!(response.status, 200);
    assert_eq!(response.body.as_ref(), b"rack-gem-bytes");
    let stored = dir.path().join("public/gems/rack-3.0.0.gem");
    assert_eq!(std::fs::read(&stored).unwrap(), b"rack-gem-bytes");

    for _ in 0..3 {
        let response = gateway.handle(&request).await;
        assert_eq!(response.body.as_ref(), b"rack-gem-bytes");
    }
    assert_eq!(registry.hits(), 1);
}

#[tokio::test]
async fn test_spec_index_lands_under_specs_root() {
    let registry = StubRegistry::start().await;
    registry.body("/specs.4.8.gz", b"index");
    registry.body("/quick/Marshal.4.8/specs.4.8", b"nested");
    let dir = TempDir::new().unwrap();
    let gateway = gateway_for(&registry.base_url(), dir.path(), Arc::new(ManualClock::default()));

    gateway.handle(&GatewayRequest::get("/specs.4.8.gz")).await;
    gateway
        .handle(&GatewayRequest::get("/quick/Marshal.4.8/specs.4.8"))
        .await;

    assert!(dir.path().join("specs/specs.4.8.gz").is_file());
    assert!(dir.path().join("specs/quick/Marshal.4.8/specs.4.8").is_file());
    assert!(!dir.path().join("public/specs.4.8.gz").exists());
}

#[tokio::test]
async fn test_write_leaves_no_temporary_files() {
    let registry = StubRegistry::start().await;
    registry.body("/gems/rake-13.0.6.gem", b"rake");
    let dir = TempDir::new().unwrap();
    let gateway = gateway_for(&registry.base_url(), dir.path(), Arc::new(ManualClock::default()));

    gateway.handle(&GatewayRequest::get("/gems/rake-13.0.6.gem")).await;

    let names: Vec<String> = std::fs::read_dir(dir.path().join("public/gems"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["rake-13.0.6.gem"]);
}

#[tokio::test]
async fn test_root_lists_downloaded_gems() {
    let registry = StubRegistry::start().await;
    registry.body("/gems/rack-2.2.8.gem", b"a");
    registry.body("/gems/rack-3.0.0.gem", b"b");
    let dir = TempDir::new().unwrap();
    let gateway = gateway_for(&registry.base_url(), dir.path(), Arc::new(ManualClock::default()));

    gateway.handle(&GatewayRequest::get("/gems/rack-2.2.8.gem")).await;
    gateway.handle(&GatewayRequest::get("/gems/rack-3.0.0.gem")).await;
    let response = gateway.handle(&GatewayRequest::get("/")).await;
    let html = body_text(&response.body);

    assert_eq!(response.status, 200);
    assert!(html.contains("1 gems stored locally"));
    assert!(html.contains("href=\"/gems/rack-2.2.8.gem\""));
    assert!(html.contains("href=\"/gems/rack-3.0.0.gem\""));
    assert_eq!(registry.hits(), 2);
}
