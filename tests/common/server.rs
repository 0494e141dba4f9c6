//! A small REST fixture that behaves like the record services.
//!
//! - `/api/departments` is a full collection (paging, search, CRUD)
//! - `/api/owners` answers with an object instead of a list
//! - `/api/suppliers` always fails with a 500
//! - `/api/assets` answers after three seconds

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};

pub struct FixtureState {
    pub departments: Vec<Value>,
    pub next_id: u64,
    pub expose_headers: bool,
    /// `METHOD path?query` for every request received.
    pub requests: Vec<String>,
}

type Shared = Arc<Mutex<FixtureState>>;

pub struct FixtureServer {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl FixtureServer {
    /// Start a server with `count` departments on a background thread.
    pub fn start(count: u64, expose_headers: bool) -> Self {
        let departments = (1..=count)
            .map(|n| json!({ "id": n, "name": format!("Department {n:02}") }))
            .collect();
        let state = Arc::new(Mutex::new(FixtureState {
            departments,
            next_id: count + 1,
            expose_headers,
            requests: Vec::new(),
        }));

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind fixture server");
        listener
            .set_nonblocking(true)
            .expect("set fixture listener non-blocking");
        let addr = listener.local_addr().expect("fixture server address");

        let app = router(Arc::clone(&state));
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("fixture runtime");
            runtime.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("fixture tokio listener");
                axum::serve(listener, app).await.expect("fixture server");
            });
        });

        FixtureServer { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/", self.addr)
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().requests.clone()
    }

    pub fn department_count(&self) -> usize {
        self.state.lock().departments.len()
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route(
            "/api/departments",
            get(list_departments).post(create_department),
        )
        .route(
            "/api/departments/{id}",
            axum::routing::put(update_department).delete(delete_department),
        )
        .route("/api/owners", get(|| async { Json(json!({ "unexpected": true })) }))
        .route(
            "/api/suppliers",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Database unavailable" })),
                )
            }),
        )
        .route(
            "/api/assets",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!([]))
            }),
        )
        .with_state(state)
}

fn log(state: &Shared, method: &str, path: &str, query: Option<&str>) {
    let line = match query {
        Some(q) if !q.is_empty() => format!("{method} {path}?{q}"),
        _ => format!("{method} {path}"),
    };
    state.lock().requests.push(line);
}

fn name_errors(body: &Value) -> Option<&'static str> {
    match body.get("name").and_then(Value::as_str).map(str::trim) {
        None | Some("") => Some("The Name field is required."),
        Some("Duplicate") => Some("Name already exists"),
        _ => None,
    }
}

async fn list_departments(
    State(state): State<Shared>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    log(&state, "GET", "/api/departments", raw.as_deref());
    let guard = state.lock();

    if params.contains_key("search") {
        return Json(guard.departments.clone()).into_response();
    }

    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let size: usize = params
        .get("pageSize")
        .and_then(|p| p.parse().ok())
        .unwrap_or(12);
    let items: Vec<Value> = guard
        .departments
        .iter()
        .skip(page.saturating_sub(1) * size)
        .take(size)
        .cloned()
        .collect();

    let mut response = Json(items).into_response();
    if guard.expose_headers {
        let total = guard.departments.len();
        let pages = total.div_ceil(size.max(1)).max(1);
        let headers = response.headers_mut();
        headers.insert("x-total-count", HeaderValue::from(total));
        headers.insert("x-total-pages", HeaderValue::from(pages));
    }
    response
}

async fn create_department(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    log(&state, "POST", "/api/departments", None);

    if let Some(message) = name_errors(&body) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "title": "One or more validation errors occurred.",
                "errors": { "Name": [message] },
            })),
        )
            .into_response();
    }

    let mut guard = state.lock();
    let id = guard.next_id;
    guard.next_id += 1;
    let mut record = body;
    record["id"] = json!(id);
    guard.departments.push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_department(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    log(&state, "PUT", &format!("/api/departments/{id}"), None);

    let mut guard = state.lock();
    let Some(slot) = guard
        .departments
        .iter_mut()
        .find(|d| d["id"].to_string() == id)
    else {
        return not_found(&id);
    };

    let mut record = body;
    record["id"] = slot["id"].clone();
    *slot = record;
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_department(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    log(&state, "DELETE", &format!("/api/departments/{id}"), None);

    let mut guard = state.lock();
    let before = guard.departments.len();
    guard.departments.retain(|d| d["id"].to_string() != id);
    if guard.departments.len() == before {
        return not_found(&id);
    }
    StatusCode::NO_CONTENT.into_response()
}

fn not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "title": format!("Department {id} not found") })),
    )
        .into_response()
}
