//! In-process test harness for the admin panel.
//!
//! Spawns a stub of the hosted backend (PostgREST-style tables, GoTrue-style
//! auth, object storage) on a loopback port, plus the real admin router
//! wired to it, so tests exercise the genuine gateway, cache, and
//! reconciliation code without a live project or network access.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bude_peyek_admin::config::{AdminConfig, SupabaseConfig};
use bude_peyek_admin::middleware::create_session_layer;
use bude_peyek_admin::models::SettingsStore;
use bude_peyek_admin::routes;
use bude_peyek_admin::state::AppState;
use bude_peyek_admin::supabase::SupabaseClient;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use url::Url;

/// Operator credentials the stub accepts.
pub const ADMIN_EMAIL: &str = "admin@budepeyek.id";
pub const ADMIN_PASSWORD: &str = "rahasia-123";
/// The access token the stub issues on a successful password grant.
pub const ACCESS_TOKEN: &str = "stub-access-token";

/// Shared state behind the stub backend.
pub struct StubState {
    password: Mutex<String>,
    products: Mutex<Vec<Value>>,
    orders: Mutex<Vec<Value>>,
    /// `"METHOD table"` entries, in the order writes arrived.
    ops: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
    next_id: AtomicI64,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            password: Mutex::new(ADMIN_PASSWORD.to_string()),
            products: Mutex::new(Vec::new()),
            orders: Mutex::new(Vec::new()),
            ops: Mutex::new(Vec::new()),
            fail_uploads: AtomicBool::new(false),
            next_id: AtomicI64::new(1),
        }
    }
}

/// Handle to a running stub backend.
#[derive(Clone)]
pub struct StubBackend {
    pub state: Arc<StubState>,
    pub url: Url,
}

impl StubBackend {
    /// Bind the stub on an ephemeral loopback port and serve it.
    ///
    /// # Panics
    ///
    /// Panics when the loopback listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = Arc::new(StubState::default());
        let addr = serve(stub_router(Arc::clone(&state))).await;
        let url = Url::parse(&format!("http://{addr}")).expect("valid stub URL");
        Self { state, url }
    }

    /// Insert a product row, assigning an id when the row has none.
    pub async fn seed_product(&self, mut row: Value) -> i64 {
        let id = self.assign_id(&mut row);
        self.state.products.lock().await.push(row);
        id
    }

    /// Insert an order row, assigning an id when the row has none.
    pub async fn seed_order(&self, mut row: Value) -> i64 {
        let id = self.assign_id(&mut row);
        self.state.orders.lock().await.push(row);
        id
    }

    /// The current backend copy of a product row.
    pub async fn product(&self, id: i64) -> Option<Value> {
        row_by_id(&self.state.products.lock().await, id)
    }

    /// The current backend copy of an order row.
    pub async fn order(&self, id: i64) -> Option<Value> {
        row_by_id(&self.state.orders.lock().await, id)
    }

    /// Writes seen so far, as `"METHOD table"` entries.
    pub async fn ops(&self) -> Vec<String> {
        self.state.ops.lock().await.clone()
    }

    pub async fn clear_ops(&self) {
        self.state.ops.lock().await.clear();
    }

    /// Make the storage endpoint reject every upload.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.state.fail_uploads.store(fail, Ordering::SeqCst);
    }

    fn assign_id(&self, row: &mut Value) -> i64 {
        if let Some(id) = row.get("id").and_then(Value::as_i64) {
            self.state.next_id.fetch_max(id + 1, Ordering::SeqCst);
            return id;
        }
        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
        if let Some(obj) = row.as_object_mut() {
            obj.insert("id".to_string(), json!(id));
        }
        id
    }
}

/// A stub backend plus the real admin app wired to it.
pub struct TestContext {
    pub backend: StubBackend,
    pub state: AppState,
    /// Base URL of the in-process admin server.
    pub admin_url: String,
    /// Cookie-holding client for the admin API.
    pub http: reqwest::Client,
    _settings_dir: tempfile::TempDir,
}

impl TestContext {
    /// Spawn the stub backend and the admin app on loopback ports.
    ///
    /// # Panics
    ///
    /// Panics when a server cannot be spawned or the settings store cannot
    /// be created.
    pub async fn new() -> Self {
        let backend = StubBackend::spawn().await;

        let settings_dir = tempfile::tempdir().expect("tempdir");
        let settings_path = settings_dir.path().join("settings.json");

        let config = AdminConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            supabase: SupabaseConfig {
                url: backend.url.clone(),
                anon_key: "test-anon-key".to_string().into(),
            },
            store_phone: None,
            settings_path: settings_path.clone(),
        };

        let settings = SettingsStore::load(settings_path)
            .await
            .expect("settings store");
        let supabase = SupabaseClient::new(&config.supabase);
        let state = AppState::from_parts(config.clone(), supabase, settings);

        let app = Router::new()
            .merge(routes::routes())
            .layer(create_session_layer(&config))
            .with_state(state.clone());
        let addr = serve(app).await;

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("HTTP client");

        Self {
            backend,
            state,
            admin_url: format!("http://{addr}"),
            http,
            _settings_dir: settings_dir,
        }
    }

    /// Sign in through the admin API, storing the session cookie on
    /// [`Self::http`].
    ///
    /// # Panics
    ///
    /// Panics when the login request fails or is rejected.
    pub async fn login(&self) {
        let resp = self
            .http
            .post(format!("{}/auth/login", self.admin_url))
            .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
            .send()
            .await
            .expect("login request");
        assert!(resp.status().is_success(), "login failed: {}", resp.status());
    }
}

/// Serve `router` on an ephemeral loopback port, returning the bound
/// address.
async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

fn row_by_id(rows: &[Value], id: i64) -> Option<Value> {
    rows.iter()
        .find(|row| row.get("id").and_then(Value::as_i64) == Some(id))
        .cloned()
}

// ---------------------------------------------------------------------------
// Stub backend routes
// ---------------------------------------------------------------------------

fn stub_router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/user", get(auth_user).put(update_user))
        .route("/auth/v1/logout", post(logout))
        .route(
            "/rest/v1/{table}",
            get(list_rows)
                .post(insert_row)
                .patch(patch_rows)
                .delete(delete_rows),
        )
        .route("/storage/v1/object/{bucket}/{*path}", post(upload_object))
        .with_state(state)
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn bearer_is_session(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ACCESS_TOKEN}"))
}

async fn token(
    State(state): State<Arc<StubState>>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if query.get("grant_type").map(String::as_str) != Some("password") {
        return error_body(StatusCode::BAD_REQUEST, "unsupported grant type");
    }

    let email = body.get("email").and_then(Value::as_str).unwrap_or("");
    let password = body.get("password").and_then(Value::as_str).unwrap_or("");

    if email != ADMIN_EMAIL || *state.password.lock().await != password {
        // GoTrue rejects a bad grant with 400
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error_description": "Invalid login credentials" })),
        )
            .into_response();
    }

    Json(json!({
        "access_token": ACCESS_TOKEN,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "stub-refresh-token",
        "user": { "id": "stub-user-id", "email": ADMIN_EMAIL },
    }))
    .into_response()
}

async fn auth_user(headers: HeaderMap) -> Response {
    if !bearer_is_session(&headers) {
        return error_body(StatusCode::UNAUTHORIZED, "invalid token");
    }
    Json(json!({ "id": "stub-user-id", "email": ADMIN_EMAIL })).into_response()
}

async fn update_user(
    State(state): State<Arc<StubState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !bearer_is_session(&headers) {
        return error_body(StatusCode::UNAUTHORIZED, "invalid token");
    }
    if let Some(password) = body.get("password").and_then(Value::as_str) {
        *state.password.lock().await = password.to_string();
    }
    Json(json!({ "id": "stub-user-id", "email": ADMIN_EMAIL })).into_response()
}

async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn list_rows(
    State(state): State<Arc<StubState>>,
    Path(table): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !headers.contains_key("apikey") {
        return error_body(StatusCode::UNAUTHORIZED, "No API key found in request");
    }

    let Some(rows) = table_rows(&state, &table) else {
        return error_body(StatusCode::NOT_FOUND, "relation does not exist");
    };
    let mut rows = rows.lock().await.clone();

    if let Some(order) = query.get("order") {
        sort_rows(&mut rows, order);
    }
    Json(Value::Array(rows)).into_response()
}

async fn insert_row(
    State(state): State<Arc<StubState>>,
    Path(table): Path<String>,
    Json(mut row): Json<Value>,
) -> Response {
    let Some(rows) = table_rows(&state, &table) else {
        return error_body(StatusCode::NOT_FOUND, "relation does not exist");
    };

    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    if let Some(obj) = row.as_object_mut() {
        obj.insert("id".to_string(), json!(id));
        obj.entry("created_at".to_string())
            .or_insert_with(|| json!("2025-06-01T08:00:00Z"));
    }

    rows.lock().await.push(row);
    state.ops.lock().await.push(format!("POST {table}"));
    StatusCode::CREATED.into_response()
}

async fn patch_rows(
    State(state): State<Arc<StubState>>,
    Path(table): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(patch): Json<Value>,
) -> Response {
    let Some(id) = id_filter(&query) else {
        return error_body(StatusCode::BAD_REQUEST, "unsupported filter");
    };
    let Some(rows) = table_rows(&state, &table) else {
        return error_body(StatusCode::NOT_FOUND, "relation does not exist");
    };

    let mut rows = rows.lock().await;
    for row in rows
        .iter_mut()
        .filter(|row| row.get("id").and_then(Value::as_i64) == Some(id))
    {
        if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    drop(rows);

    state.ops.lock().await.push(format!("PATCH {table}"));
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_rows(
    State(state): State<Arc<StubState>>,
    Path(table): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let Some(id) = id_filter(&query) else {
        return error_body(StatusCode::BAD_REQUEST, "unsupported filter");
    };
    let Some(rows) = table_rows(&state, &table) else {
        return error_body(StatusCode::NOT_FOUND, "relation does not exist");
    };

    rows.lock()
        .await
        .retain(|row| row.get("id").and_then(Value::as_i64) != Some(id));
    state.ops.lock().await.push(format!("DELETE {table}"));
    StatusCode::NO_CONTENT.into_response()
}

async fn upload_object(
    State(state): State<Arc<StubState>>,
    Path((bucket, path)): Path<(String, String)>,
) -> Response {
    if state.fail_uploads.load(Ordering::SeqCst) {
        return error_body(StatusCode::INTERNAL_SERVER_ERROR, "bucket unavailable");
    }
    Json(json!({ "Key": format!("{bucket}/{path}") })).into_response()
}

fn table_rows<'a>(state: &'a StubState, table: &str) -> Option<&'a Mutex<Vec<Value>>> {
    match table {
        "products" => Some(&state.products),
        "orders" => Some(&state.orders),
        _ => None,
    }
}

fn id_filter(query: &HashMap<String, String>) -> Option<i64> {
    query
        .get("id")?
        .strip_prefix("eq.")
        .and_then(|raw| raw.parse().ok())
}

fn sort_rows(rows: &mut [Value], order: &str) {
    let (column, direction) = order.rsplit_once('.').unwrap_or((order, "asc"));
    rows.sort_by(|a, b| {
        let a = a.get(column);
        let b = b.get(column);
        let ordering = match (a.and_then(Value::as_i64), b.and_then(Value::as_i64)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => a
                .and_then(Value::as_str)
                .unwrap_or("")
                .cmp(b.and_then(Value::as_str).unwrap_or("")),
        };
        if direction == "desc" {
            ordering.reverse()
        } else {
            ordering
        }
    });
}
