use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;

/// In-memory stand-in for the hosted row store, served over a real local
/// listener so the backend exercises its actual HTTP client.
#[derive(Clone, Default)]
pub struct FakeRowStore {
    tables: Arc<Mutex<HashMap<i64, Vec<JsonValue>>>>,
    next_id: Arc<AtomicI64>,
    pub webhook_hits: Arc<Mutex<Vec<JsonValue>>>,
}

impl FakeRowStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            webhook_hits: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn seed(&self, table_id: i64, mut fields: JsonValue) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        fields["id"] = json!(id);
        self.tables
            .lock()
            .unwrap()
            .entry(table_id)
            .or_default()
            .push(fields);
        id
    }

    pub fn row(&self, table_id: i64, row_id: i64) -> Option<JsonValue> {
        self.tables
            .lock()
            .unwrap()
            .get(&table_id)?
            .iter()
            .find(|r| r["id"] == json!(row_id))
            .cloned()
    }

    pub fn rows(&self, table_id: i64) -> Vec<JsonValue> {
        self.tables
            .lock()
            .unwrap()
            .get(&table_id)
            .cloned()
            .unwrap_or_default()
    }

    fn matches(row: &JsonValue, filters: &HashMap<String, String>) -> bool {
        for (key, expected) in filters {
            if let Some(field) = key
                .strip_prefix("filter__")
                .and_then(|rest| rest.strip_suffix("__equal"))
            {
                let actual = match &row[field] {
                    JsonValue::String(s) => s.clone(),
                    JsonValue::Number(n) => n.to_string(),
                    _ => String::new(),
                };
                if &actual != expected {
                    return false;
                }
            } else if let Some(field) = key
                .strip_prefix("filter__")
                .and_then(|rest| rest.strip_suffix("__link_row_has"))
            {
                let wanted: i64 = expected.parse().unwrap_or(-1);
                let has = row[field]
                    .as_array()
                    .map(|items| {
                        items.iter().any(|item| {
                            item.as_i64() == Some(wanted)
                                || item["id"].as_i64() == Some(wanted)
                        })
                    })
                    .unwrap_or(false);
                if !has {
                    return false;
                }
            }
        }
        true
    }

    fn router(self) -> Router {
        Router::new()
            .route(
                "/api/database/rows/table/:table_id/",
                get(list_rows).post(create_row),
            )
            .route(
                "/api/database/rows/table/:table_id/:row_id/",
                get(get_row).patch(patch_row).delete(delete_row),
            )
            .route("/api/user-files/upload-file/", post(upload_file))
            .route("/scoring-webhook", post(scoring_webhook))
            .with_state(self)
    }

    /// Binds the fake store on an ephemeral port and returns its base URL.
    pub async fn serve(self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let router = self.router();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

async fn list_rows(
    State(store): State<FakeRowStore>,
    Path(table_id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let results: Vec<JsonValue> = store
        .rows(table_id)
        .into_iter()
        .filter(|row| FakeRowStore::matches(row, &params))
        .collect();
    Json(json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results,
    }))
}

async fn get_row(
    State(store): State<FakeRowStore>,
    Path((table_id, row_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    match store.row(table_id, row_id) {
        Some(row) => (StatusCode::OK, Json(row)),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))),
    }
}

async fn create_row(
    State(store): State<FakeRowStore>,
    Path(table_id): Path<i64>,
    Json(fields): Json<JsonValue>,
) -> impl IntoResponse {
    let id = store.seed(table_id, fields);
    (StatusCode::OK, Json(store.row(table_id, id).unwrap()))
}

async fn patch_row(
    State(store): State<FakeRowStore>,
    Path((table_id, row_id)): Path<(i64, i64)>,
    Json(fields): Json<JsonValue>,
) -> impl IntoResponse {
    let mut tables = store.tables.lock().unwrap();
    let Some(rows) = tables.get_mut(&table_id) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })));
    };
    let Some(row) = rows.iter_mut().find(|r| r["id"] == json!(row_id)) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })));
    };
    if let (Some(target), Some(patch)) = (row.as_object_mut(), fields.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
    (StatusCode::OK, Json(row.clone()))
}

async fn delete_row(
    State(store): State<FakeRowStore>,
    Path((table_id, row_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let mut tables = store.tables.lock().unwrap();
    let Some(rows) = tables.get_mut(&table_id) else {
        return StatusCode::NOT_FOUND;
    };
    let before = rows.len();
    rows.retain(|r| r["id"] != json!(row_id));
    if rows.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn upload_file(State(_store): State<FakeRowStore>) -> impl IntoResponse {
    Json(json!({ "url": "https://files.example.test/upload.bin" }))
}

async fn scoring_webhook(
    State(store): State<FakeRowStore>,
    body: String,
) -> impl IntoResponse {
    let parsed: JsonValue = serde_json::from_str(&body).unwrap_or(JsonValue::Null);
    store.webhook_hits.lock().unwrap().push(parsed);
    StatusCode::OK
}

/// Seeds process env and initializes the shared config; the webhook URL is
/// pointed at the fake store so scoring triggers land in `webhook_hits`.
pub fn init_test_config(rowstore_url: &str) {
    std::env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    std::env::set_var("ROWSTORE_BASE_URL", rowstore_url);
    std::env::set_var("ROWSTORE_API_TOKEN", "test_token");
    std::env::set_var("GOOGLE_CLIENT_ID", "client-id");
    std::env::set_var("GOOGLE_CLIENT_SECRET", "client-secret");
    std::env::set_var("GOOGLE_REDIRECT_URI", "http://localhost/oauth");
    std::env::set_var(
        "BEHAVIORAL_WEBHOOK_URL",
        format!("{}/scoring-webhook", rowstore_url),
    );
    std::env::set_var("INTEGRATION_RPS", "1000");
    std::env::set_var("PUBLIC_RPS", "1000");
    let _ = talentflow_backend::config::init_config();
}
