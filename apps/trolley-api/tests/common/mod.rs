use axum::http::header::AUTHORIZATION;
use axum::Router;
use axum_test::TestServer;

use trolley_api::config::Config;
use trolley_api::AppState;

/// Build a fresh AppState backed by in-memory stores. Every test gets its
/// own world; there is nothing to clean up afterwards.
pub fn test_state() -> AppState {
    AppState::new(Config {
        port: 0,
        worker_id: 0,
    })
}

/// Build the full application router wired to a fresh test state.
pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    let app = trolley_api::routes::router().with_state(state.clone());
    (app, state)
}

/// Register a user and return (access token, user id).
pub async fn register_user(server: &TestServer, email: &str) -> (String, String) {
    let resp = server
        .post("/api/v1/auth/register")
        .json(&serde_json::json!({
            "email": email,
            "password": "hunter2hunter2"
        }))
        .await;
    resp.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = resp.json();
    let token = body["token"].as_str().expect("token present").to_string();
    let user_id = body["user"]["id"]
        .as_str()
        .expect("user id present")
        .to_string();
    (token, user_id)
}

/// Create a list as the given user and return its id.
pub async fn create_list(server: &TestServer, token: &str, title: &str) -> i64 {
    let resp = server
        .post("/api/v1/lists")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&serde_json::json!({ "title": title }))
        .await;
    resp.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = resp.json();
    body["id"].as_i64().expect("list id present")
}
