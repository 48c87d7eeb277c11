//! End-to-end smoke tests for the full scenehubd stack.
//!
//! Each test spins up the complete application (temp-file JSON store, the
//! virtual device network, real dispatcher, real scene service, real axum
//! router) and exercises the HTTP layer via `tower::ServiceExt::oneshot`
//! — no TCP port is bound.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use scenehub_adapter_http_axum::router;
use scenehub_adapter_http_axum::state::AppState;
use scenehub_adapter_storage_json::JsonPresetsStore;
use scenehub_adapter_virtual::VirtualDeviceNetwork;
use scenehub_app::dispatcher::{CommandDispatcher, DispatcherConfig};
use scenehub_app::services::scene_service::{SceneService, SceneServiceConfig};

const SITE: &str = "test-site";

/// Build a fully-wired router plus a handle on the device network.
async fn app() -> (axum::Router, VirtualDeviceNetwork) {
    let store = JsonPresetsStore::new(
        std::env::temp_dir().join(format!("scenehubd-test-{}.json", uuid())),
    );
    let initial = store.load().await.expect("temp store should load");

    let network = VirtualDeviceNetwork::demo();
    let dispatcher = CommandDispatcher::spawn(network.clone(), &DispatcherConfig::default());

    let service = SceneService::new(
        SceneServiceConfig {
            site_id: SITE.to_string(),
            version: "1.0".to_string(),
            excluded_schemas: std::collections::HashSet::new(),
        },
        network.clone(),
        store,
        dispatcher,
        initial,
    );

    (router::build(AppState::new(service)), network)
}

fn uuid() -> String {
    scenehub_domain::id::SceneId::new().to_string()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let (app, _) = app().await;
    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_store_and_list_scenes() {
    let (app, _) = app().await;

    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/scenes",
            json!({"scope": "site", "slot": 1, "label": "Evening"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let stored = body_json(resp).await;
    assert!(stored.get("uuid").is_some());
    assert_eq!(stored["scope"], json!(format!("site:{SITE}")));

    let resp = app.oneshot(get("/scenes")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let scenes = body_json(resp).await;
    assert_eq!(scenes.as_array().unwrap().len(), 1);
    assert_eq!(scenes[0]["label"], json!("Evening"));
}

#[tokio::test]
async fn should_default_label_and_slot_when_storing() {
    let (app, _) = app().await;

    let resp = app
        .oneshot(request("POST", "/scenes", json!({"scope": "site"})))
        .await
        .unwrap();
    let stored = body_json(resp).await;
    assert_eq!(stored["slot"], json!(1));
    assert_eq!(stored["label"], json!("Preset 1"));
}

#[tokio::test]
async fn should_reject_foreign_site_scope() {
    let (app, _) = app().await;

    let resp = app
        .oneshot(request(
            "POST",
            "/scenes",
            json!({"scope": "site:someone-else"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_build_site_prototype_from_promoted_settable_devices() {
    let (app, _) = app().await;

    let resp = app.oneshot(get("/scenes/prototype/site")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let prototype = body_json(resp).await;

    assert_eq!(prototype["scope"], json!(format!("site:{SITE}")));
    // The read-only hallway sensor captures to nothing and is omitted.
    let things = prototype["things"].as_array().unwrap();
    assert_eq!(things.len(), 2);
}

#[tokio::test]
async fn should_filter_room_prototype_by_location() {
    let (app, _) = app().await;

    let resp = app
        .oneshot(get("/scenes/prototype/room/kitchen"))
        .await
        .unwrap();
    let prototype = body_json(resp).await;

    assert_eq!(prototype["scope"], json!("room:kitchen"));
    let things = prototype["things"].as_array().unwrap();
    assert_eq!(things.len(), 1);
    assert_eq!(things[0]["id"], json!("virtual-lamp-kitchen"));
}

#[tokio::test]
async fn should_apply_scene_and_record_undo_state() {
    let (app, network) = app().await;

    // Store a scene that turns the kitchen lamp on.
    let resp = app
        .clone()
        .oneshot(request(
            "POST",
            "/scenes",
            json!({
                "scope": "site",
                "slot": 1,
                "label": "Lamp on",
                "things": [{
                    "id": "virtual-lamp-kitchen",
                    "channels": [{"id": "on-off", "state": true}],
                }],
            }),
        ))
        .await
        .unwrap();
    let stored = body_json(resp).await;
    let id = stored["uuid"].as_str().unwrap().to_string();

    // Apply it; the undo value is the lamp's pre-apply state (off).
    let resp = app
        .clone()
        .oneshot(request("POST", &format!("/scenes/{id}/apply"), json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let applied = body_json(resp).await;
    assert_eq!(
        applied["things"][0]["channels"][0]["undoState"],
        json!(false)
    );

    // Dispatch is fire-and-forget; poll until the command lands.
    for _ in 0..100 {
        if network.channel_payload("virtual-lamp-kitchen", "on-off") == Some(json!(true)) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("apply command never reached the virtual lamp");
}

#[tokio::test]
async fn should_return_not_found_when_applying_unknown_scene() {
    let (app, _) = app().await;

    let resp = app
        .oneshot(request(
            "POST",
            &format!("/scenes/{}/apply", uuid()),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_reject_malformed_scene_id() {
    let (app, _) = app().await;

    let resp = app
        .oneshot(request("POST", "/scenes/not-a-uuid/apply", json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_delete_scene_by_id() {
    let (app, _) = app().await;

    let resp = app
        .clone()
        .oneshot(request("POST", "/scenes", json!({"scope": "site"})))
        .await
        .unwrap();
    let stored = body_json(resp).await;
    let id = stored["uuid"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/scenes/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.oneshot(get(&format!("/scenes/{id}"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
