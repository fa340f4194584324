//! End-to-end engine tests over the mock remote API.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use plantsync_core::{MockApi, RetryConfig, SyncEngine, authenticate};
use plantsync_types::{Entity, EntitySet, RemotePlant};

fn plant(value: serde_json::Value) -> RemotePlant {
    serde_json::from_value(value).unwrap()
}

fn retry() -> RetryConfig {
    RetryConfig::new(3).base_delay(Duration::from_millis(1))
}

async fn engine_for(api: Arc<MockApi>) -> SyncEngine<MockApi> {
    let session = authenticate(api.as_ref(), "user@example.com", "secret")
        .await
        .unwrap();
    SyncEngine::new(api, session, retry(), EntitySet::new())
}

fn seed_fern(api: &MockApi) {
    api.set_plants(vec![plant(json!({
        "id": "7", "nickname": "Fern", "scientific_name": "Nephrolepis exaltata",
        "sensor": {"has_sensor": true},
    }))]);
    api.set_detail(
        "7",
        plant(json!({
            "id": "7",
            "sensor": {"has_sensor": true},
            "measurements": {
                "temperature": {"status": 3, "values": {"current": "21.5"}},
                "moisture": {"status": 0},
            },
        })),
    );
}

#[tokio::test]
async fn full_pass_derives_expected_entities() {
    let api = Arc::new(MockApi::new());
    seed_fern(&api);
    let mut engine = engine_for(Arc::clone(&api)).await;

    let outcome = engine.sync_once().await;
    assert_eq!(outcome.plants_listed, 1);
    assert!(outcome.changed());
    assert_eq!(outcome.reconcile.created, 2);

    let temp = engine.entities().get("temp-7").unwrap();
    assert_eq!(temp.value(), "21.5");
    assert_eq!(temp.display_name(), "Fern Temperature");
    match temp {
        Entity::Temperature(t) => assert_eq!(t.status_text, "Perfect"),
        _ => panic!("expected temperature entity"),
    }
    assert_eq!(engine.entities().get("moist-7").unwrap().value(), "No Data");
}

#[tokio::test]
async fn repeat_pass_reports_no_change() {
    let api = Arc::new(MockApi::new());
    seed_fern(&api);
    let mut engine = engine_for(Arc::clone(&api)).await;

    assert!(engine.sync_once().await.changed());
    let second = engine.sync_once().await;
    assert!(!second.changed());
    assert_eq!(second.reconcile.updated, 0);
}

#[tokio::test]
async fn expired_token_is_refreshed_mid_pass() {
    let api = Arc::new(MockApi::new());
    seed_fern(&api);
    let mut engine = engine_for(Arc::clone(&api)).await;
    let first_token = engine.session().access_token.clone().unwrap();

    api.invalidate_token();
    let outcome = engine.sync_once().await;

    assert!(outcome.session_refreshed);
    assert!(outcome.changed());
    assert_ne!(engine.session().access_token.as_ref().unwrap(), &first_token);
    assert_eq!(api.login_calls(), 2);
}

#[tokio::test]
async fn plant_gone_from_list_keeps_its_entities() {
    let api = Arc::new(MockApi::new());
    seed_fern(&api);
    let mut engine = engine_for(Arc::clone(&api)).await;
    engine.sync_once().await;
    assert_eq!(engine.entities().len(), 2);

    api.set_plants(Vec::new());
    let outcome = engine.sync_once().await;
    assert!(!outcome.changed());
    assert_eq!(outcome.plants_listed, 0);
    assert_eq!(engine.entities().len(), 2);
    assert_eq!(engine.entities().get("temp-7").unwrap().value(), "21.5");
}

#[tokio::test]
async fn failed_detail_fetch_is_isolated_per_plant() {
    let api = Arc::new(MockApi::new());
    api.set_plants(vec![
        plant(json!({"id": "7", "nickname": "Fern", "sensor": {"has_sensor": true}})),
        plant(json!({"id": "8", "nickname": "Cactus", "sensor": {"has_sensor": true}})),
    ]);
    api.set_detail(
        "8",
        plant(json!({
            "id": "8",
            "sensor": {"has_sensor": true},
            "measurements": {"moisture": {"status": 3, "values": {"current": "30"}}},
        })),
    );
    api.fail_detail("7");
    let mut engine = engine_for(Arc::clone(&api)).await;

    let outcome = engine.sync_once().await;
    assert_eq!(outcome.reconcile.created, 1);
    assert!(engine.entities().get("moist-8").is_some());
    assert!(engine.entities().get("temp-7").is_none());
}

#[tokio::test(start_paused = true)]
async fn listing_survives_transient_timeouts() {
    let api = Arc::new(MockApi::new());
    seed_fern(&api);
    let mut engine = engine_for(Arc::clone(&api)).await;

    api.queue_list_timeout();
    api.queue_list_timeout();
    let outcome = engine.sync_once().await;
    assert_eq!(outcome.plants_listed, 1);
    assert!(outcome.changed());
}

#[tokio::test]
async fn persisted_entities_survive_offline_pass() {
    let api = Arc::new(MockApi::new());
    seed_fern(&api);
    let mut engine = engine_for(Arc::clone(&api)).await;
    engine.sync_once().await;
    let snapshot = engine.entities().clone();

    // Restart with the snapshot; the remote side rejects everything.
    let api = Arc::new(MockApi::new());
    api.reject_logins();
    api.invalidate_token();
    let session = engine.session().clone();
    let mut restarted = SyncEngine::new(Arc::clone(&api), session, retry(), snapshot.clone());

    // Entities are queryable before and after the failed refresh.
    assert_eq!(restarted.entities(), &snapshot);
    let outcome = restarted.sync_once().await;
    assert!(!outcome.changed());
    assert_eq!(restarted.entities(), &snapshot);
}
