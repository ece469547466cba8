//! The `/api/v1/transactions` endpoints.
//!
//! | Method | Path                                         | Used by                          |
//! |--------|----------------------------------------------|----------------------------------|
//! | POST   | `/transactions?mode=..`                      | `submit`, `submit_detached`, `submit_with` |
//! | GET    | `/transactions?asset_id=..&operation=..`     | `get_transactions_by_asset_id`   |
//! | GET    | `/transactions/:id`                          | `get_transaction`                |

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::error::{ClientError, SubmitError, TransportError};
use super::outcome::{ResponseInfo, SubmitOutcome};
use crate::codec::EncodingError;
use crate::config::ClientConfig;
use crate::transaction::{Operation, Transaction};

/// HTTP client for a ledger node's transaction endpoints.
///
/// Cheap to clone: clones share one connection pool. Holds no mutable state,
/// so one instance can serve any number of concurrent tasks.
#[derive(Debug, Clone)]
pub struct TransactionsApi {
    http: Client,
    config: ClientConfig,
}

impl TransactionsApi {
    /// Builds a client for the node described by `config`. Credential tokens
    /// are attached to every request as headers.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        for (name, value) in config.tokens() {
            headers.insert(name.clone(), value.clone());
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// POSTs `tx` and classifies the answer. Every remote problem becomes one
    /// of the [`SubmitOutcome`] variants; only a transaction that cannot be
    /// encoded fails, before anything is sent.
    ///
    /// The transaction is sent as-is. An unsigned transaction goes out too
    /// and comes back `Malformed` from the ledger.
    pub async fn send(&self, tx: &Transaction) -> Result<SubmitOutcome, EncodingError> {
        let body = tx.to_canonical_bytes()?;
        Ok(self.post(Self::log_id(tx), body).await)
    }

    /// Submits `tx` and waits for the verdict. Returns the transaction on
    /// acceptance. No retry is attempted.
    pub async fn submit(&self, tx: &Transaction) -> Result<Transaction, SubmitError> {
        self.send(tx).await?.into_result(tx.clone())
    }

    /// Submits `tx` on a spawned task. The receiver yields the outcome exactly
    /// once. Encoding happens up front, so an unencodable transaction fails
    /// here and nothing is spawned.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit_detached(
        &self,
        tx: Transaction,
    ) -> Result<oneshot::Receiver<SubmitOutcome>, EncodingError> {
        let body = tx.to_canonical_bytes()?;
        let tx_id = Self::log_id(&tx);
        let (sender, receiver) = oneshot::channel();
        let api = self.clone();
        tokio::spawn(async move {
            let outcome = api.post(tx_id, body).await;
            // The caller may have dropped the receiver; the outcome is logged either way.
            let _ = sender.send(outcome);
        });
        Ok(receiver)
    }

    /// Submits `tx` on a spawned task and hands the outcome to `callback`
    /// exactly once. Fails like [`Self::submit_detached`] when `tx` cannot
    /// be encoded, in which case `callback` is never called.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit_with<F>(&self, tx: Transaction, callback: F) -> Result<JoinHandle<()>, EncodingError>
    where
        F: FnOnce(SubmitOutcome) + Send + 'static,
    {
        let body = tx.to_canonical_bytes()?;
        let tx_id = Self::log_id(&tx);
        let api = self.clone();
        Ok(tokio::spawn(async move {
            let outcome = api.post(tx_id, body).await;
            callback(outcome);
        }))
    }

    fn log_id(tx: &Transaction) -> String {
        tx.id().unwrap_or("<unsigned>").to_owned()
    }

    async fn post(&self, tx_id: String, body: Vec<u8>) -> SubmitOutcome {
        let tx_id = tx_id.as_str();
        let mode = self.config.submit_mode();
        debug!(tx_id, mode = %mode, bytes = body.len(), "submitting transaction");

        let result = self
            .http
            .post(self.config.transactions_url())
            .query(&[("mode", mode.as_str())])
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        let outcome = match result {
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                SubmitOutcome::classify(status, body)
            }
            Err(e) => SubmitOutcome::OtherError(ResponseInfo::local(e.to_string())),
        };

        match &outcome {
            SubmitOutcome::Accepted(info) => {
                info!(tx_id, status = ?info.status, "transaction accepted")
            }
            SubmitOutcome::Malformed(info) => {
                warn!(tx_id, status = ?info.status, body = %info.body, "transaction rejected as malformed")
            }
            SubmitOutcome::OtherError(info) => {
                warn!(tx_id, status = ?info.status, message = %info.message, "transaction submission failed")
            }
        }
        outcome
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Every transaction of `operation` that touches `asset_id`. An empty
    /// vector when there is none.
    ///
    /// Any non-success status is a [`TransportError::Status`], 404 included:
    /// the node answers an empty match with `200 []`, so a 404 here means the
    /// base URL or prefix is wrong.
    pub async fn get_transactions_by_asset_id(
        &self,
        asset_id: &str,
        operation: Operation,
    ) -> Result<Vec<Transaction>, ClientError> {
        debug!(asset_id, operation = %operation, "querying transactions by asset id");

        let response = self
            .http
            .get(self.config.transactions_url())
            .query(&[("asset_id", asset_id), ("operation", operation.as_str())])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let transactions: Vec<Transaction> = serde_json::from_str(&body)?;
        debug!(asset_id, count = transactions.len(), "query returned transactions");
        Ok(transactions)
    }

    /// The transaction with id `id`, or `None` if the node answers 404.
    pub async fn get_transaction(&self, id: &str) -> Result<Option<Transaction>, ClientError> {
        debug!(tx_id = id, "fetching transaction");

        let url = self.config.transaction_url(id)?;
        let response = self.http.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = Self::read_body(response).await?;
        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Success body, [`TransportError::Status`] otherwise.
    async fn read_body(response: reqwest::Response) -> Result<String, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "ledger query failed");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        Ok(body)
    }
}
