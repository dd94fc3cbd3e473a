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
async fn pipeline_flow_end_to_end() {
    let store = FakeRowStore::new();
    let base_url = store.clone().serve().await;
    common::init_test_config(&base_url);

    let state = talentflow_backend::AppState::with_rowstore(RowStoreClient::new(
        base_url.clone(),
        "test_token".to_string(),
    ));
    let app = talentflow_backend::routes::app(state);

    // Create-job validation: a missing description is a client error.
    let (status, _) = send(
        &app,
        json_request("POST", "/api/jobs", json!({ "title": "Backend Engineer", "owner": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, job) = send(
        &app,
        json_request(
            "POST",
            "/api/jobs",
            json!({
                "title": "Backend Engineer",
                "description": "Rust services",
                "owner": 42
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(job["title"], "Backend Engineer");
    let job_id = job["id"].as_i64().expect("numeric job id");

    // Candidate associated with the job, scored 85, no status yet.
    let (status, candidate) = send(
        &app,
        json_request(
            "POST",
            "/api/candidates",
            json!({
                "name": "Ana Souza",
                "email": "ana@example.com",
                "phone": "+55 81 99999-0000",
                "score": 85,
                "job_ids": [job_id]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let candidate_id = candidate["id"].as_i64().unwrap();

    // Listing scoped to the job returns exactly that candidate; absent
    // status reads back defaulted to Screening and the board agrees.
    let (status, list) = send(
        &app,
        Request::builder()
            .uri(format!("/api/candidates?job_id={}", job_id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["score"], 85);
    assert_eq!(list[0]["status"], "Triagem");

    let (status, board) = send(
        &app,
        Request::builder()
            .uri(format!("/api/jobs/{}/board", job_id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let columns = board.as_array().unwrap();
    assert_eq!(columns[0]["status"], "Triagem");
    assert_eq!(columns[0]["candidates"].as_array().unwrap().len(), 1);

    // Drag to Practical-Test: the PATCH carries the canonical label.
    let (status, moved) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/candidates/{}/status", candidate_id),
            json!({ "status": "Teste Prático" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["status"], "Teste Prático");
    let stored = store.row(tables::CANDIDATES, candidate_id).unwrap();
    assert_eq!(stored["status"], "Teste Prático");

    // Rejection without a reason must not change the persisted status.
    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/candidates/{}/status", candidate_id),
            json!({ "status": "Reprovado" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let stored = store.row(tables::CANDIDATES, candidate_id).unwrap();
    assert_eq!(stored["status"], "Teste Prático");

    // With a reason, status and reason land in the same update.
    let (status, rejected) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/candidates/{}/status", candidate_id),
            json!({ "status": "Reprovado", "rejection_reason": "Perfil fora do escopo" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["rejection_reason"], "Perfil fora do escopo");
    let stored = store.row(tables::CANDIDATES, candidate_id).unwrap();
    assert_eq!(stored["status"], "Reprovado");
    assert_eq!(stored["rejection_reason"], "Perfil fora do escopo");

    // Legacy alias labels are accepted and written back canonically.
    let (status, hired) = send(
        &app,
        json_request(
            "PATCH",
            &format!("/api/candidates/{}/status", candidate_id),
            json!({ "status": "Aprovado" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hired["status"], "Contratado");

    // Score sort ascending puts unscored candidates first (null -> -1).
    send(
        &app,
        json_request(
            "POST",
            "/api/candidates",
            json!({ "name": "Bruno Lima", "job_ids": [job_id] }),
        ),
    )
    .await;
    let (_, sorted) = send(
        &app,
        Request::builder()
            .uri(format!(
                "/api/candidates?job_id={}&sort_by=score&direction=ascending",
                job_id
            ))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let names: Vec<&str> = sorted
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bruno Lima", "Ana Souza"]);

    // Talent-database search: AND-combined, empty fields match all.
    let (status, hits) = send(
        &app,
        json_request("POST", "/api/candidates/search", json!({ "name": "bruno" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["name"], "Bruno Lima");

    let (_, everyone) = send(
        &app,
        json_request("POST", "/api/candidates/search", json!({})),
    )
    .await;
    assert_eq!(everyone.as_array().unwrap().len(), 2);

    // WhatsApp deep link templated by the candidate's current status.
    let (status, message) = send(
        &app,
        Request::builder()
            .uri(format!("/api/candidates/{}/whatsapp", candidate_id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(message["link"]
        .as_str()
        .unwrap()
        .starts_with("https://wa.me/5581999990000"));
    assert!(message["message"].as_str().unwrap().contains("Ana"));

    // Deleting the job returns 204 and does not cascade to candidates.
    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/jobs/{}", job_id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(store.row(tables::JOBS, job_id).is_none());
    assert!(store.row(tables::CANDIDATES, candidate_id).is_some());

    let (status, _) = send(
        &app,
        Request::builder()
            .uri(format!("/api/jobs/{}", job_id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
