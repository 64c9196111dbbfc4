//! Shared test tools and helpers

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use zone_orchestrator_core::types::ZoneLocation;
use zone_orchestrator_core::{GatewayConfig, InMemoryZoneRepository, ServiceContext};

/// Assert `Option` is `Some` and unwrap the inner value (fail the test otherwise).
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Assert `Result` is `Ok` and unwrap the inner value (fail the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

pub const ZONE: &str = "unit.tests";

/// A small zone in canonical form
pub const UNIT_TESTS: &str = "\
'':
  - ttl: 3600
    type: A
    values:
      - 1.2.3.4
      - 1.2.3.5
  - type: MX
    values:
      - exchange: mx1.unit.tests.
        preference: 10
      - exchange: mx2.unit.tests.
        preference: 20
  - type: NS
    values:
      - ns1.unit.tests.
      - ns2.unit.tests.
www:
  type: CNAME
  value: unit.tests.
";

pub const CONFIG: &str = r#"{
  "branch": "main",
  "author": { "name": "zone-bot", "email": "zone-bot@unit.tests" },
  "retryLimit": 3,
  "scopes": [
    { "path": "" },
    { "name": "internal", "path": "zones/internal", "branch": "staging" }
  ]
}"#;

pub fn default_location() -> ZoneLocation {
    ZoneLocation::new("unit.tests.yaml", "main")
}

pub fn internal_location() -> ZoneLocation {
    ZoneLocation::new("zones/internal/unit.tests.yaml", "staging")
}

/// Context over an in-memory repository holding [`UNIT_TESTS`] in both scopes.
pub async fn seeded_context() -> (InMemoryZoneRepository, Arc<ServiceContext>) {
    let repo = InMemoryZoneRepository::new();
    repo.put(default_location(), UNIT_TESTS).await;
    repo.put(internal_location(), UNIT_TESTS).await;

    let config = GatewayConfig::from_json(CONFIG).expect("test config must parse");
    let ctx = ServiceContext::from_config(Arc::new(repo.clone()), &config)
        .expect("test config must build a context")
        .with_retry_base_delay(Duration::ZERO);
    (repo, Arc::new(ctx))
}
