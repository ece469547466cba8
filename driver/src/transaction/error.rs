use thiserror::Error;

use crate::codec::EncodingError;
use crate::crypto::SigningError;

/// Errors from assembling, signing, decoding or verifying a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// A required part is missing (CREATE without asset content, a zero
    /// output amount).
    #[error("incomplete transaction: {reason}")]
    IncompleteTransaction { reason: String },

    /// The operation is not allowed in the builder's or transaction's
    /// current state.
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("transaction is not valid JSON for the ledger schema: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("transaction is unsigned")]
    Unsigned,

    /// Some but not all of id and fulfillments are present.
    #[error("transaction is partially signed")]
    PartiallySigned,

    #[error("transaction id mismatch: expected {expected}, got {actual}")]
    IdMismatch { expected: String, actual: String },

    #[error("input {index} has no fulfillment")]
    MissingFulfillment { index: usize },

    /// The fulfillment does not verify against the transaction body, or its
    /// key is not an owner of the input.
    #[error("input {index} carries an invalid fulfillment: {reason}")]
    InvalidFulfillment { index: usize, reason: String },

    #[error("output {index} is invalid: {reason}")]
    InvalidOutput { index: usize, reason: String },
}
