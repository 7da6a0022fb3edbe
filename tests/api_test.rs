//! Integration tests for the room HTTP API: create, config get/set,
//! event publishing, diagnostics, and error mapping.

use std::sync::Arc;

use roomcast::rooms::RoomRegistry;
use roomcast::routes;
use roomcast::state::AppState;
use serde_json::json;
use tokio::net::TcpListener;

/// Helper: start the server on a random port and return (base_url, registry).
async fn start_test_server() -> (String, Arc<RoomRegistry>) {
    let static_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let registry = Arc::new(RoomRegistry::new());
    let state = AppState {
        registry: Arc::clone(&registry),
    };
    let app = routes::build_router(state, static_dir.path().to_str().unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
        let _keep = static_dir;
    });

    (format!("http://{}", addr), registry)
}

/// Helper: create a room and return its id.
async fn create_room(base_url: &str, pwd: &str) -> String {
    let resp = reqwest::Client::new()
        .post(format!("{}/api/createRoom", base_url))
        .json(&json!({ "pwd": pwd }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    body["data"]["roomId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_room_requires_non_empty_password() {
    let (base_url, _registry) = start_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/createRoom", base_url))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{}/api/createRoom", base_url))
        .json(&json!({ "pwd": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn config_round_trip_is_last_write_wins() {
    let (base_url, _registry) = start_test_server().await;
    let client = reqwest::Client::new();
    let room = create_room(&base_url, "secret").await;

    // Fresh room has an empty config document.
    let resp = client
        .get(format!("{}/api/config/{}", base_url, room))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"], json!({}));

    for doc in [json!({ "theme": "dark" }), json!({ "title": "demo", "n": 2 })] {
        let resp = client
            .post(format!("{}/api/config/{}", base_url, room))
            .json(&json!({ "pwd": "secret", "config": doc }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let body: serde_json::Value = client
        .get(format!("{}/api/config/{}", base_url, room))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"], json!({ "title": "demo", "n": 2 }));
}

#[tokio::test]
async fn config_write_is_forbidden_with_wrong_password() {
    let (base_url, _registry) = start_test_server().await;
    let client = reqwest::Client::new();
    let room = create_room(&base_url, "secret").await;

    let resp = client
        .post(format!("{}/api/config/{}", base_url, room))
        .json(&json!({ "pwd": "wrong", "config": { "x": 1 } }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    // Missing config field is a bad request, not forbidden.
    let resp = client
        .post(format!("{}/api/config/{}", base_url, room))
        .json(&json!({ "pwd": "secret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn unknown_room_is_not_found() {
    let (base_url, _registry) = start_test_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/api/config/U99999", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .post(format!("{}/api/event/U99999", base_url))
        .json(&json!({ "pwd": "secret", "event": "chat", "data": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .get(format!("{}/api/listen/U99999", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn room_id_with_encoded_path_separator_is_rejected() {
    let (base_url, _registry) = start_test_server().await;

    let resp = reqwest::Client::new()
        .get(format!("{}/api/config/a%2Fb", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn broadcast_with_no_listeners_still_succeeds() {
    let (base_url, _registry) = start_test_server().await;
    let room = create_room(&base_url, "secret").await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/event/{}", base_url, room))
        .json(&json!({ "pwd": "secret", "event": "chat", "data": "nobody home" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn broadcast_requires_password_but_not_event_name() {
    let (base_url, _registry) = start_test_server().await;
    let client = reqwest::Client::new();
    let room = create_room(&base_url, "secret").await;

    // Event name and payload are optional.
    let resp = client
        .post(format!("{}/api/event/{}", base_url, room))
        .json(&json!({ "pwd": "secret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .post(format!("{}/api/event/{}", base_url, room))
        .json(&json!({ "event": "chat", "data": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .post(format!("{}/api/event/{}", base_url, room))
        .json(&json!({ "pwd": "wrong", "data": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn info_reports_live_room_count() {
    let (base_url, _registry) = start_test_server().await;
    let client = reqwest::Client::new();

    let body: serde_json::Value = client
        .get(format!("{}/api/__info__", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["roomCount"], 0);

    create_room(&base_url, "a").await;
    create_room(&base_url, "b").await;

    let body: serde_json::Value = client
        .get(format!("{}/api/__info__", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["roomCount"], 2);
}
