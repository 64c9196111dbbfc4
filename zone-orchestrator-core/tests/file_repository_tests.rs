#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Record service over a directory of zone files.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{UNIT_TESTS, ZONE};
use tempfile::TempDir;
use zone_orchestrator_core::traits::RepositoryError;
use zone_orchestrator_core::types::{WriteRecordRequest, ZoneChange, ZoneLocation};
use zone_orchestrator_core::{
    FileZoneRepository, GatewayConfig, RecordService, ServiceContext, ZoneRepository,
};
use zone_orchestrator_model::{Extension, RecordType};

fn location() -> ZoneLocation {
    ZoneLocation::new("zones/internal/unit.tests.yaml", "staging")
}

async fn seeded_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let zones = dir.path().join("zones/internal");
    tokio::fs::create_dir_all(&zones).await.unwrap();
    tokio::fs::write(zones.join("unit.tests.yaml"), UNIT_TESTS)
        .await
        .unwrap();
    dir
}

#[tokio::test]
async fn fetch_reports_content_and_revision() {
    let dir = seeded_dir().await;
    let repo = FileZoneRepository::new(dir.path());

    let blob = require_ok!(repo.fetch(&location()).await);
    assert_eq!(blob.content, UNIT_TESTS.as_bytes());
    let revision = require_some!(blob.revision);
    assert_eq!(revision.len(), 64);

    let res = repo
        .fetch(&ZoneLocation::new("zones/internal/missing.yaml", "staging"))
        .await;
    assert!(matches!(res, Err(RepositoryError::NotFound { .. })), "{res:?}");
}

#[tokio::test]
async fn stale_commit_conflicts() {
    let dir = seeded_dir().await;
    let repo = FileZoneRepository::new(dir.path());
    let blob = require_ok!(repo.fetch(&location()).await);

    tokio::fs::write(dir.path().join("zones/internal/unit.tests.yaml"), "{}\n")
        .await
        .unwrap();

    let change = ZoneChange {
        content: b"www: []\n".to_vec(),
        base_revision: blob.revision,
        message: "chore(unit.tests): test".to_string(),
        author: None,
    };
    let res = repo.commit(&location(), &change).await;
    assert!(matches!(res, Err(RepositoryError::Conflict { .. })), "{res:?}");
}

#[tokio::test]
async fn commit_creates_missing_directories() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let repo = FileZoneRepository::new(dir.path());
    let target = ZoneLocation::new("new/scope/unit.tests.yaml", "main");

    let change = ZoneChange {
        content: UNIT_TESTS.as_bytes().to_vec(),
        base_revision: None,
        message: "chore(unit.tests): seed".to_string(),
        author: None,
    };
    require_ok!(repo.commit(&target, &change).await);
    let written = tokio::fs::read_to_string(dir.path().join("new/scope/unit.tests.yaml"))
        .await
        .unwrap();
    assert_eq!(written, UNIT_TESTS);
}

#[tokio::test]
async fn record_service_edits_file_in_place() {
    let dir = seeded_dir().await;
    let config = GatewayConfig::from_json(common::CONFIG).unwrap();
    let ctx = ServiceContext::from_config(Arc::new(FileZoneRepository::new(dir.path())), &config)
        .unwrap()
        .with_retry_base_delay(Duration::ZERO);
    let service = RecordService::new(Arc::new(ctx));

    let request = WriteRecordRequest {
        zone: ZONE.to_string(),
        scope: "internal".to_string(),
        name: "www".to_string(),
        record_type: RecordType::Txt,
        values: vec!["hello world".to_string()],
        ttl: None,
        extension: Extension::default(),
    };
    require_ok!(service.create_record(&request).await);

    let written = tokio::fs::read_to_string(dir.path().join("zones/internal/unit.tests.yaml"))
        .await
        .unwrap();
    let expected = UNIT_TESTS.replace(
        "www:\n  type: CNAME\n  value: unit.tests.\n",
        "www:\n  - type: CNAME\n    value: unit.tests.\n  - type: TXT\n    value: hello world\n",
    );
    assert_eq!(written, expected);
}
