//! # Transaction Module
//!
//! Construction, signing and verification of ledger transactions. Every
//! asset the ledger stores is minted by a CREATE [`Transaction`] and moved by
//! TRANSFER transactions spending its outputs.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        — Operation, inputs, outputs, crypto-condition details
//! builder.rs      — Transaction and the TransactionBuilder that produces it
//! signing.rs      — id derivation and Ed25519 fulfillments
//! verification.rs — local structural and cryptographic verification
//! error.rs        — TransactionError
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Collect** — add asset content and metadata to a [`TransactionBuilder`].
//! 2. **Build & sign** — [`TransactionBuilder::build_and_sign`] assembles
//!    the unsigned body, encodes it canonically, derives the id and fulfills
//!    every input.
//! 3. **Submit** — hand the signed transaction to
//!    [`crate::api::TransactionsApi`].
//! 4. **Verify** — [`verify_transaction`] re-checks anything fetched back.
//!
//! ## Design Decisions
//!
//! - The id is `hex(sha3_256(canonical unsigned body))`, where the unsigned
//!   body is the transaction with `id` and every `fulfillment` set to
//!   `null`. Fulfillments sign exactly those bytes.
//! - Output amounts are `u64` shares, written as decimal strings on the wire.
//! - A transaction is never partially signed: signing consumes the unsigned
//!   value and returns a new one only after a successful self-check.

pub mod builder;
pub mod error;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{Transaction, TransactionBuilder};
pub use error::TransactionError;
pub use signing::sign_transaction;
pub use types::{Condition, ConditionDetails, Input, Operation, Output, OutputRef, TransactionState};
pub use verification::verify_transaction;
