mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::TestServer;

// ---------------------------------------------------------------------------
// POST /api/v1/lists
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_list_with_title() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (token, user_id) = common::register_user(&server, "owner@example.com").await;

    let resp = server
        .post("/api/v1/lists")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&serde_json::json!({ "title": "  Weekend Groceries  " }))
        .await;

    resp.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = resp.json();

    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["title"], "Weekend Groceries");
    assert_eq!(body["owner_id"], user_id.as_str());
    assert_eq!(body["shared_with"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_list_without_title_uses_default() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (token, _user_id) = common::register_user(&server, "untitled@example.com").await;

    // No title key at all.
    let resp = server
        .post("/api/v1/lists")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&serde_json::json!({}))
        .await;
    resp.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["title"], "New Shopping List");

    // A blank title behaves the same.
    let resp = server
        .post("/api/v1/lists")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&serde_json::json!({ "title": "   " }))
        .await;
    resp.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["title"], "New Shopping List");
}

#[tokio::test]
async fn create_list_rejects_overlong_title() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (token, _user_id) = common::register_user(&server, "longtitle@example.com").await;

    let long_title = "a".repeat(101);
    let resp = server
        .post("/api/v1/lists")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&serde_json::json!({ "title": long_title }))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"][0]["field"], "title");
}

#[tokio::test]
async fn create_list_requires_auth() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let resp = server
        .post("/api/v1/lists")
        .json(&serde_json::json!({ "title": "Sneaky" }))
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// GET /api/v1/lists
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_lists_shows_owned_and_shared_newest_first() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (owner_token, _) = common::register_user(&server, "mine@example.com").await;
    let (friend_token, friend_id) = common::register_user(&server, "friend@example.com").await;

    let first = common::create_list(&server, &owner_token, "First").await;
    let second = common::create_list(&server, &owner_token, "Second").await;
    let friends_own = common::create_list(&server, &friend_token, "Friend's Own").await;

    // Share the first list with the friend.
    let resp = server
        .post(&format!("/api/v1/lists/{first}/share"))
        .add_header(AUTHORIZATION, format!("Bearer {owner_token}"))
        .json(&serde_json::json!({ "email": "friend@example.com" }))
        .await;
    resp.assert_status_ok();
    let shared: serde_json::Value = resp.json();
    assert_eq!(shared["shared_with"][0], friend_id.as_str());

    // Owner sees their two lists, newest first, and not the friend's.
    let resp = server
        .get("/api/v1/lists")
        .add_header(AUTHORIZATION, format!("Bearer {owner_token}"))
        .await;
    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["id"].as_i64().unwrap(), second);
    assert_eq!(data[1]["id"].as_i64().unwrap(), first);

    // Friend sees their own list plus the shared one, without duplicates.
    let resp = server
        .get("/api/v1/lists")
        .add_header(AUTHORIZATION, format!("Bearer {friend_token}"))
        .await;
    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    let data = body["data"].as_array().unwrap();
    let ids: Vec<i64> = data.iter().map(|l| l["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![friends_own, first]);
}

// ---------------------------------------------------------------------------
// GET /api/v1/lists/{id}
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_list_includes_items() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (token, _user_id) = common::register_user(&server, "detail@example.com").await;
    let list_id = common::create_list(&server, &token, "Groceries").await;

    let resp = server
        .post(&format!("/api/v1/lists/{list_id}/items"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&serde_json::json!({ "name": "Milk", "quantity": "2" }))
        .await;
    resp.assert_status(StatusCode::CREATED);

    let resp = server
        .get(&format!("/api/v1/lists/{list_id}"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;

    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    assert_eq!(body["id"].as_i64().unwrap(), list_id);
    assert_eq!(body["title"], "Groceries");

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Milk");
    assert_eq!(items[0]["quantity"], "2");
    assert_eq!(items[0]["is_checked"], false);
}

#[tokio::test]
async fn get_list_hides_lists_the_user_cannot_access() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (owner_token, _) = common::register_user(&server, "private@example.com").await;
    let (outsider_token, _) = common::register_user(&server, "outsider@example.com").await;

    let list_id = common::create_list(&server, &owner_token, "Private").await;

    let resp = server
        .get(&format!("/api/v1/lists/{list_id}"))
        .add_header(AUTHORIZATION, format!("Bearer {outsider_token}"))
        .await;

    // Indistinguishable from a list that does not exist.
    resp.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["error"]["message"], "List not found");
}

#[tokio::test]
async fn get_unknown_list_is_not_found() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (token, _user_id) = common::register_user(&server, "nolist@example.com").await;

    let resp = server
        .get("/api/v1/lists/999999")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;

    resp.assert_status(StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// POST /api/v1/lists/{id}/share
// ---------------------------------------------------------------------------

#[tokio::test]
async fn share_is_idempotent() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (owner_token, _) = common::register_user(&server, "sharer@example.com").await;
    let (_, friend_id) = common::register_user(&server, "shared@example.com").await;

    let list_id = common::create_list(&server, &owner_token, "Shared").await;

    for _ in 0..2 {
        let resp = server
            .post(&format!("/api/v1/lists/{list_id}/share"))
            .add_header(AUTHORIZATION, format!("Bearer {owner_token}"))
            .json(&serde_json::json!({ "email": "shared@example.com" }))
            .await;
        resp.assert_status_ok();
    }

    let resp = server
        .get(&format!("/api/v1/lists/{list_id}"))
        .add_header(AUTHORIZATION, format!("Bearer {owner_token}"))
        .await;
    let body: serde_json::Value = resp.json();
    let shared_with = body["shared_with"].as_array().unwrap();
    assert_eq!(shared_with.len(), 1);
    assert_eq!(shared_with[0], friend_id.as_str());
}

#[tokio::test]
async fn share_with_unknown_email_is_not_found() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (owner_token, _) = common::register_user(&server, "alone@example.com").await;
    let list_id = common::create_list(&server, &owner_token, "Unshareable").await;

    let resp = server
        .post(&format!("/api/v1/lists/{list_id}/share"))
        .add_header(AUTHORIZATION, format!("Bearer {owner_token}"))
        .json(&serde_json::json!({ "email": "ghost@example.com" }))
        .await;

    resp.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["error"]["message"], "No user found with that email");
}

#[tokio::test]
async fn only_the_owner_can_share() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (owner_token, _) = common::register_user(&server, "boss@example.com").await;
    let (member_token, _) = common::register_user(&server, "member@example.com").await;
    common::register_user(&server, "third@example.com").await;

    let list_id = common::create_list(&server, &owner_token, "Owned").await;

    let resp = server
        .post(&format!("/api/v1/lists/{list_id}/share"))
        .add_header(AUTHORIZATION, format!("Bearer {owner_token}"))
        .json(&serde_json::json!({ "email": "member@example.com" }))
        .await;
    resp.assert_status_ok();

    // A shared member may read the list but not share it onward.
    let resp = server
        .post(&format!("/api/v1/lists/{list_id}/share"))
        .add_header(AUTHORIZATION, format!("Bearer {member_token}"))
        .json(&serde_json::json!({ "email": "third@example.com" }))
        .await;

    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sharing_with_the_owner_changes_nothing() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (owner_token, _) = common::register_user(&server, "selfshare@example.com").await;
    let list_id = common::create_list(&server, &owner_token, "Mine").await;

    let resp = server
        .post(&format!("/api/v1/lists/{list_id}/share"))
        .add_header(AUTHORIZATION, format!("Bearer {owner_token}"))
        .json(&serde_json::json!({ "email": "selfshare@example.com" }))
        .await;

    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    assert_eq!(body["shared_with"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// GET /api/v1/lists/{id}/export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_renders_checkbox_text() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (token, _user_id) = common::register_user(&server, "export@example.com").await;
    let list_id = common::create_list(&server, &token, "Groceries").await;

    server
        .post(&format!("/api/v1/lists/{list_id}/items"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&serde_json::json!({ "name": "Milk", "quantity": "2" }))
        .await
        .assert_status(StatusCode::CREATED);

    let resp = server
        .post(&format!("/api/v1/lists/{list_id}/items"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&serde_json::json!({ "name": "Bread" }))
        .await;
    resp.assert_status(StatusCode::CREATED);
    let bread: serde_json::Value = resp.json();
    let bread_id = bread["id"].as_i64().unwrap();

    // Check off the bread.
    server
        .post(&format!("/api/v1/items/{bread_id}/toggle"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await
        .assert_status_ok();

    let resp = server
        .get(&format!("/api/v1/lists/{list_id}/export"))
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;

    resp.assert_status_ok();
    let body: serde_json::Value = resp.json();
    assert_eq!(
        body["text"],
        "🛒 *Groceries*\n\n[ ] 2 - Milk\n[x] 1 - Bread\n\n_Shared from Trolley!_"
    );
}

#[tokio::test]
async fn export_is_hidden_from_outsiders() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let (owner_token, _) = common::register_user(&server, "exporter@example.com").await;
    let (outsider_token, _) = common::register_user(&server, "peeker@example.com").await;
    let list_id = common::create_list(&server, &owner_token, "Secret").await;

    let resp = server
        .get(&format!("/api/v1/lists/{list_id}/export"))
        .add_header(AUTHORIZATION, format!("Bearer {outsider_token}"))
        .await;

    resp.assert_status(StatusCode::NOT_FOUND);
}
