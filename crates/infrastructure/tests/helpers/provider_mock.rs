use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parcel_domain::config::ExternalSourceConfig;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, RwLock};

#[derive(Default)]
struct ProviderState {
    /// Provider id returned for a search on a normalized street.
    search_index: RwLock<HashMap<String, String>>,
    details: RwLock<HashMap<String, Value>>,
    /// Status codes served before the next successful response, per route.
    search_failures: RwLock<VecDeque<StatusCode>>,
    detail_failures: RwLock<VecDeque<StatusCode>>,
    /// Token the next detail/search request must present; rotated by tests.
    valid_token: RwLock<String>,
    token_counter: AtomicUsize,
    token_requests: AtomicUsize,
    search_requests: AtomicUsize,
    detail_requests: AtomicUsize,
}

/// Property provider served by axum on an ephemeral port.
pub struct MockProvider {
    addr: SocketAddr,
    state: Arc<ProviderState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockProvider {
    pub async fn start() -> Self {
        let state = Arc::new(ProviderState::default());

        let app = Router::new()
            .route("/oauth/token", post(issue_token))
            .route("/v1/properties/search", get(search))
            .route("/v1/properties/{id}", get(detail))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn config(&self) -> ExternalSourceConfig {
        ExternalSourceConfig {
            base_url: format!("http://{}/v1", self.addr),
            token_url: format!("http://{}/oauth/token", self.addr),
            client_id: "parcel-test".to_string(),
            client_secret: "secret".to_string(),
            max_attempts: 3,
            backoff_ms: 1,
            timeout_secs: 5,
        }
    }

    pub async fn add_property(&self, street: &str, detail: Value) {
        let id = detail["id"].as_str().unwrap().to_string();
        self.state
            .search_index
            .write()
            .await
            .insert(street.to_string(), id.clone());
        self.state.details.write().await.insert(id, detail);
    }

    pub async fn fail_search_with(&self, statuses: &[StatusCode]) {
        self.state.search_failures.write().await.extend(statuses);
    }

    pub async fn fail_detail_with(&self, statuses: &[StatusCode]) {
        self.state.detail_failures.write().await.extend(statuses);
    }

    /// Invalidates every token issued so far.
    pub async fn revoke_tokens(&self) {
        *self.state.valid_token.write().await = "revoked".to_string();
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    pub fn search_requests(&self) -> usize {
        self.state.search_requests.load(Ordering::SeqCst)
    }

    pub fn detail_requests(&self) -> usize {
        self.state.detail_requests.load(Ordering::SeqCst)
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub fn detail_json(id: &str, line1: &str, locality: &str, region: &str, postal_code: &str) -> Value {
    json!({
        "id": id,
        "address": {
            "line1": line1,
            "locality": locality,
            "region": region,
            "postal_code": postal_code
        },
        "building": { "year_built": 1956, "beds": 3, "baths": 1.5, "type": "SFR" },
        "assessment": { "year": 2024, "assessed_total": 61250.0 }
    })
}

async fn issue_token(State(state): State<Arc<ProviderState>>) -> Json<Value> {
    state.token_requests.fetch_add(1, Ordering::SeqCst);
    let n = state.token_counter.fetch_add(1, Ordering::SeqCst);
    let token = format!("token-{n}");
    *state.valid_token.write().await = token.clone();

    Json(json!({ "access_token": token, "token_type": "Bearer", "expires_in": 3600 }))
}

async fn authorized(state: &ProviderState, headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", state.valid_token.read().await);
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

async fn search(
    State(state): State<Arc<ProviderState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.search_requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&state, &headers).await {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if let Some(status) = state.search_failures.write().await.pop_front() {
        return status.into_response();
    }

    let street = params.get("street").cloned().unwrap_or_default();
    let results: Vec<Value> = state
        .search_index
        .read()
        .await
        .get(&street)
        .map(|id| vec![json!({ "id": id })])
        .unwrap_or_default();

    Json(json!({ "results": results })).into_response()
}

async fn detail(
    State(state): State<Arc<ProviderState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.detail_requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&state, &headers).await {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if let Some(status) = state.detail_failures.write().await.pop_front() {
        return status.into_response();
    }

    match state.details.read().await.get(&id) {
        Some(detail) => Json(detail.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
