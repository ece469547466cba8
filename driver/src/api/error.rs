use thiserror::Error;

use super::outcome::ResponseInfo;
use crate::codec::EncodingError;
use crate::config::ConfigurationError;

/// The request never produced a usable answer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, timeout or protocol failure.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The ledger answered with a non-success status.
    #[error("ledger returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Errors from the query side of [`super::TransactionsApi`] and from
/// constructing it.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The ledger's response body is not the expected JSON.
    #[error("cannot decode ledger response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(TransportError::Request(err))
    }
}

/// A submission that the ledger did not accept, for the awaitable
/// [`super::TransactionsApi::submit`].
#[derive(Debug, Error)]
pub enum SubmitError {
    /// HTTP 400: the ledger rejected the transaction itself.
    #[error("transaction rejected as malformed: {0}")]
    Malformed(ResponseInfo),

    /// Anything else: other statuses, timeouts, connection failures.
    #[error("transaction submission failed: {0}")]
    Other(ResponseInfo),

    /// The transaction could not be encoded; nothing was sent.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl SubmitError {
    /// What the ledger (or the transport) said. `None` when nothing was sent.
    pub fn response(&self) -> Option<&ResponseInfo> {
        match self {
            SubmitError::Malformed(info) | SubmitError::Other(info) => Some(info),
            SubmitError::Encoding(_) => None,
        }
    }
}
