// DELETE purges spec index files and nothing else

use std::sync::Arc;
use tempfile::TempDir;

use gemcrow::gateway::{GatewayRequest, ManualClock};
use gemcrow::store::Store;

use super::test_harness::*;

#[tokio::test]
async fn test_delete_removes_spec_index_files_only() {
    let registry = StubRegistry::start().await;
    registry.body("/specs.4.8.gz", b"index");
    registry.body("/quick/Marshal.4.8/specs.4.8", b"quick");
    registry.body("/gems/rack-3.0.0.gem", b"rack");
    let dir = TempDir::new().unwrap();
    let gateway = gateway_for(&registry.base_url(), dir.path(), Arc::new(ManualClock::default()));

    gateway.handle(&GatewayRequest::get("/specs.4.8.gz")).await;
    gateway
        .handle(&GatewayRequest::get("/quick/Marshal.4.8/specs.4.8"))
        .await;
    gateway.handle(&GatewayRequest::get("/gems/rack-3.0.0.gem")).await;

    let response = gateway.handle(&GatewayRequest::delete("/")).await;

    assert_eq!(response.status, 200);
    assert!(response.body.is_empty());
    assert!(!dir.path().join("specs/specs.4.8.gz").exists());
    assert!(!dir.path().join("specs/quick/Marshal.4.8/specs.4.8").exists());
    assert!(dir.path().join("specs/quick/Marshal.4.8").is_dir());
    assert!(dir.path().join("public/gems/rack-3.0.0.gem").is_file());
}

#[tokio::test]
async fn test_purged_index_is_fetched_again_once() {
    let registry = StubRegistry::start().await;
    registry.body("/specs.4.8.gz", b"index");
    let dir = TempDir::new().unwrap();
    let gateway = gateway_for(&registry.base_url(), dir.path(), Arc::new(ManualClock::default()));
    let request = GatewayRequest::get("/specs.4.8.gz");

    gateway.handle(&request).await;
    gateway.handle(&request).await;
    assert_eq!(registry.hits(), 1);

    // Method alone triggers the purge, whatever the path
    gateway
        .handle(&GatewayRequest::delete("/gems/anything.gem"))
        .await;

    gateway.handle(&request).await;
    gateway.handle(&request).await;
    assert_eq!(registry.hits(), 2);
}

#[tokio::test]
async fn test_purge_without_specs_root_removes_nothing() {
    let dir = TempDir::new().unwrap();
    let store = Store::on_disk(layout_in(dir.path()));

    assert_eq!(store.purge_spec_index_files().await.unwrap(), 0);
}
