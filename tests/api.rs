//! HTTP-level tests driving the router against the in-memory backend.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use game_stats_back::{
    dao::game_store::memory::MemoryGameStore,
    routes,
    state::{AppState, SharedState},
};

fn app() -> Router {
    let state: SharedState = AppState::with_store(Arc::new(MemoryGameStore::new()));
    routes::router(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request).await.expect("resp");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 64 * 1024)
        .await
        .expect("body");
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("req")
}

fn init_game() -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/init_game")
        .body(Body::empty())
        .expect("req")
}

fn get_all() -> Request<Body> {
    Request::builder()
        .uri("/get_all")
        .body(Body::empty())
        .expect("req")
}

#[tokio::test]
async fn create_update_list_scenario() {
    let app = app();

    let (status, body) = send(&app, init_game()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"game_id": 1}));

    let (status, body) = send(
        &app,
        post_json("/update_game", json!({"game_id": 1, "n_cust_served": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "game_id": 1}));

    let (status, body) = send(&app, get_all()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "game_id": 1,
            "n_cust_served": 10,
            "n_cust_satisfied": 0,
            "n_cust_not_satisfied": 0
        }])
    );
}

#[tokio::test]
async fn get_all_empty_then_newest_first() {
    let app = app();

    let (status, body) = send(&app, get_all()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    for _ in 0..3 {
        send(&app, init_game()).await;
    }
    let (_, body) = send(&app, get_all()).await;
    let ids: Vec<i64> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|record| record["game_id"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn partial_update_keeps_other_counters() {
    let app = app();
    send(&app, init_game()).await;

    send(
        &app,
        post_json(
            "/update_game",
            json!({"game_id": 1, "n_cust_served": 3, "n_cust_not_satisfied": 2}),
        ),
    )
    .await;
    send(
        &app,
        post_json("/update_game", json!({"game_id": 1, "n_cust_satisfied": 5})),
    )
    .await;
    send(
        &app,
        post_json("/update_game", json!({"game_id": 1, "n_cust_not_satisfied": 0})),
    )
    .await;

    let (_, body) = send(&app, get_all()).await;
    assert_eq!(
        body,
        json!([{
            "game_id": 1,
            "n_cust_served": 3,
            "n_cust_satisfied": 5,
            "n_cust_not_satisfied": 0
        }])
    );
}

#[tokio::test]
async fn missing_game_id_is_bad_request() {
    let app = app();

    let (status, body) = send(&app, post_json("/update_game", json!({"n_cust_served": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing game_id"}));

    let (status, body) = send(&app, post_json("/update_game", json!({"game_id": null}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing game_id"}));
}

#[tokio::test]
async fn unknown_game_id_is_not_found() {
    let app = app();
    send(&app, init_game()).await;

    let (status, body) = send(
        &app,
        post_json("/update_game", json!({"game_id": 7, "n_cust_served": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Game ID not found"}));

    let (_, body) = send(&app, get_all()).await;
    assert_eq!(body[0]["n_cust_served"], json!(0));
}

#[tokio::test]
async fn explicit_null_counter_is_rejected() {
    let app = app();
    send(&app, init_game()).await;

    let (status, body) = send(
        &app,
        post_json("/update_game", json!({"game_id": 1, "n_cust_served": null})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("message").contains("n_cust_served"));
}

#[tokio::test]
async fn malformed_body_uses_error_shape() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/update_game")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .expect("req");
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_content_type_keeps_extractor_status() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/update_game")
        .body(Body::from(json!({"game_id": 1}).to_string()))
        .expect("req");
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_game_id_wins_over_mistyped_counter() {
    let app = app();
    send(&app, init_game()).await;

    let (status, body) = send(
        &app,
        post_json("/update_game", json!({"n_cust_served": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing game_id"}));

    let (status, body) = send(
        &app,
        post_json("/update_game", json!({"game_id": 1, "n_cust_served": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("message").starts_with("invalid request body"));

    let (_, body) = send(&app, get_all()).await;
    assert_eq!(body[0]["n_cust_served"], json!(0));
}

#[tokio::test]
async fn degraded_mode_answers_service_unavailable() {
    let app = routes::router(AppState::new());

    let (status, body) = send(&app, init_game()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"error": "degraded mode"}));

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/healthcheck")
            .body(Body::empty())
            .expect("req"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "degraded"}));
}

#[tokio::test]
async fn home_and_health() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).expect("req"))
        .await
        .expect("resp");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), 1024)
        .await
        .expect("body");
    let text = String::from_utf8(body.to_vec()).expect("utf8");
    assert!(text.contains("/init_game"));

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/healthcheck")
            .body(Body::empty())
            .expect("req"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn openapi_document_lists_game_routes() {
    let app = app();

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/api-doc/openapi.json")
            .body(Body::empty())
            .expect("req"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    for path in ["/init_game", "/update_game", "/get_all"] {
        assert!(body["paths"].get(path).is_some(), "missing {path}");
    }
}
