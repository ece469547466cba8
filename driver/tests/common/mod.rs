//! In-process mock of the ledger's transaction endpoints.
//!
//! Stands in for a real node: it parses and verifies submitted transactions
//! with the crate's own verifier, answers 400 for anything invalid, and
//! serves stored transactions back to the query endpoints.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use tokio::net::TcpListener;

use tessera_driver::config::ClientConfig;
use tessera_driver::transaction::{verify_transaction, Operation, Transaction};
use tessera_driver::TransactionsApi;

pub const APP_ID: &str = "2bbaf3ff";
pub const APP_KEY: &str = "c929b708177dcc8b9d58180082029b8d";

#[derive(Default)]
pub struct LedgerState {
    pub transactions: Mutex<Vec<Transaction>>,
    /// `mode` query parameter of every POST, in arrival order.
    pub modes: Mutex<Vec<String>>,
    /// When set, POST and the collection GET answer with this status and
    /// nothing else.
    pub forced_status: Option<StatusCode>,
}

pub struct MockLedger {
    pub addr: SocketAddr,
    pub state: Arc<LedgerState>,
}

impl MockLedger {
    pub async fn start() -> Self {
        Self::start_with(LedgerState::default()).await
    }

    pub async fn start_with(state: LedgerState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route(
                "/api/v1/transactions",
                post(post_transaction).get(list_transactions),
            )
            .route("/api/v1/transactions/:id", get(get_transaction))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock ledger");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock ledger server");
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client carrying both credential tokens.
    pub fn client(&self) -> TransactionsApi {
        let config = ClientConfig::builder()
            .base_url(self.base_url())
            .add_token("app_id", APP_ID)
            .add_token("app_key", APP_KEY)
            .build()
            .expect("valid config");
        TransactionsApi::new(&config).expect("client")
    }

    pub fn stored(&self) -> Vec<Transaction> {
        self.state.transactions.lock().clone()
    }
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn post_transaction(
    State(state): State<Arc<LedgerState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    if let Some(mode) = params.get("mode") {
        state.modes.lock().push(mode.clone());
    }
    if let Some(status) = state.forced_status {
        return (status, "forced").into_response();
    }
    if headers.get("app_id").and_then(|v| v.to_str().ok()) != Some(APP_ID) {
        return (StatusCode::UNAUTHORIZED, "missing app_id").into_response();
    }

    let tx = match Transaction::from_json(&body) {
        Ok(tx) => tx,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };
    if let Err(e) = verify_transaction(&tx) {
        return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
    }

    state.transactions.lock().push(tx.clone());
    (StatusCode::ACCEPTED, Json(tx)).into_response()
}

async fn list_transactions(
    State(state): State<Arc<LedgerState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(status) = state.forced_status {
        return (status, "forced").into_response();
    }
    let Some(asset_id) = params.get("asset_id") else {
        return (StatusCode::BAD_REQUEST, "asset_id is required").into_response();
    };
    let operation = params.get("operation").map(String::as_str);

    let matches: Vec<Transaction> = state
        .transactions
        .lock()
        .iter()
        .filter(|tx| tx.asset_id() == Some(asset_id.as_str()))
        .filter(|tx| match operation {
            Some("CREATE") => tx.operation() == Operation::Create,
            Some("TRANSFER") => tx.operation() == Operation::Transfer,
            _ => true,
        })
        .cloned()
        .collect();

    Json(matches).into_response()
}

async fn get_transaction(
    State(state): State<Arc<LedgerState>>,
    Path(id): Path<String>,
) -> Response {
    let found = state
        .transactions
        .lock()
        .iter()
        .find(|tx| tx.id() == Some(id.as_str()))
        .cloned();
    match found {
        Some(tx) => Json(tx).into_response(),
        None => (StatusCode::NOT_FOUND, "transaction not found").into_response(),
    }
}
