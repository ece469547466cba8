//! # Ledger HTTP API
//!
//! Submission and query client for a ledger node, built on `reqwest`.
//!
//! ## Submission
//!
//! Three shapes over the same POST, pick whichever suits the caller:
//!
//! - [`TransactionsApi::submit`] — `await` the verdict as a `Result`.
//! - [`TransactionsApi::submit_detached`] — fire off, receive the
//!   [`SubmitOutcome`] on a oneshot channel.
//! - [`TransactionsApi::submit_with`] — fire off, get the outcome in a
//!   callback.
//!
//! Every submission resolves exactly once to `Accepted` (2xx), `Malformed`
//! (400) or `OtherError` (anything else, including no response). Nothing is
//! retried and the transaction is never modified. A transaction that cannot
//! be encoded is an `Err` at the call site and is never sent.
//!
//! ## Queries
//!
//! [`TransactionsApi::get_transactions_by_asset_id`] and
//! [`TransactionsApi::get_transaction`] deserialize the node's JSON back into
//! [`crate::transaction::Transaction`] values. Results can be checked with
//! [`crate::transaction::verify_transaction`].

pub mod error;
pub mod outcome;
pub mod transactions;

pub use error::{ClientError, SubmitError, TransportError};
pub use outcome::{ResponseInfo, SubmitOutcome};
pub use transactions::TransactionsApi;
