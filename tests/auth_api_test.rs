mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::FakeRowStore;
use serde_json::{json, Value as JsonValue};
use talentflow_backend::rowstore::{tables, RowStoreClient};
use tower::ServiceExt;

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, JsonValue) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn account_lifecycle() {
    let store = FakeRowStore::new();
    let base_url = store.clone().serve().await;
    common::init_test_config(&base_url);

    let state = talentflow_backend::AppState::with_rowstore(RowStoreClient::new(
        base_url.clone(),
        "test_token".to_string(),
    ));
    let app = talentflow_backend::routes::app(state);

    // Passwords below six characters never reach the store.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/signup",
            json!({ "name": "Ana", "email": "ana@example.com", "password": "12345" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(store.rows(tables::USERS).is_empty());

    let (status, profile) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/signup",
            json!({ "name": "Ana", "email": "Ana@Example.com", "password": "s3cret!" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // Email is stored case-folded and the hash never leaves the backend.
    assert_eq!(profile["email"], "ana@example.com");
    assert!(profile.get("password_hash").is_none());
    let user_id = profile["id"].as_i64().unwrap();
    let stored_hash = store.row(tables::USERS, user_id).unwrap()["password_hash"]
        .as_str()
        .unwrap()
        .to_string();

    // A second signup with the same email (any casing) conflicts and must
    // not touch the existing credentials.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/signup",
            json!({ "name": "Impostora", "email": "ANA@example.com", "password": "another1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(store.rows(tables::USERS).len(), 1);
    assert_eq!(
        store.row(tables::USERS, user_id).unwrap()["password_hash"],
        stored_hash
    );

    let (status, logged_in) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "ana@example.com", "password": "s3cret!" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["id"], user_id);

    // Wrong password and unknown email are indistinguishable to the caller.
    let (wrong_status, wrong_body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "ana@example.com", "password": "not-it" }),
        ),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "nobody@example.com", "password": "s3cret!" }),
        ),
    )
    .await;
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);

    // Profile updates are partial; an empty patch is a client error.
    let (status, updated) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/users/{}/profile", user_id),
            json!({ "company": "TalentFlow" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["company"], "TalentFlow");
    assert_eq!(updated["name"], "Ana");

    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/users/{}/profile", user_id),
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Password change invalidates the old credential and honors the new one.
    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/users/{}/password", user_id),
            json!({ "password": "brand-new" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "ana@example.com", "password": "s3cret!" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": "ana@example.com", "password": "brand-new" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
