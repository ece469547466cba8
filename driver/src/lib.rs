// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Tessera Driver — Ledger Client Library
//!
//! Builds, signs, submits and queries transactions on a BigchainDB-style
//! ledger: an append-only store of assets, each minted by a CREATE
//! transaction and moved by TRANSFERs.
//!
//! Everything that decides whether the ledger will accept a transaction
//! happens locally and deterministically. The content is canonically
//! encoded, its SHA3-256 becomes the id, and each input is fulfilled with an
//! Ed25519 signature over the same bytes. The network is only involved at
//! the very end.
//!
//! ## Architecture
//!
//! - **codec** — Canonical JSON encoding. One byte sequence per meaning.
//! - **model** — Asset and metadata content.
//! - **crypto** — Ed25519 keys, hashing, crypto-conditions.
//! - **transaction** — Builder, signer and local verifier.
//! - **api** — HTTP submission and query client.
//! - **config** — Protocol constants and the client configuration.
//! - **logging** — Optional `tracing` subscriber setup.
//! - **error** — Every error type, in one place.
//!
//! ## Example
//!
//! ```no_run
//! use tessera_driver::api::TransactionsApi;
//! use tessera_driver::config::ClientConfig;
//! use tessera_driver::crypto::Keypair;
//! use tessera_driver::transaction::TransactionBuilder;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::builder()
//!     .base_url("https://test.ipdb.io")
//!     .add_token("app_id", "2bbaf3ff")
//!     .add_token("app_key", "c929b708177dcc8b9d58180082029b8d")
//!     .build()?;
//! let api = TransactionsApi::new(&config)?;
//!
//! let keypair = Keypair::generate();
//! let tx = TransactionBuilder::create()
//!     .add_asset("firstname", "John")?
//!     .add_metadata("what", "My first transaction")?
//!     .build_and_sign(&keypair)?;
//!
//! let accepted = api.submit(&tx).await?;
//! println!("committed {}", accepted.id().unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Same content, same bytes, same id. No exceptions for floats or key order.
//! 2. No unsafe code. Cryptography comes from audited crates.
//! 3. A transaction is unsigned or signed, never in between.
//! 4. Configuration is a value you pass, never process-global state.

pub mod api;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod model;
pub mod transaction;

pub use api::{SubmitOutcome, TransactionsApi};
pub use config::ClientConfig;
pub use crypto::{Keypair, PublicKey};
pub use model::Content;
pub use transaction::{Operation, Transaction, TransactionBuilder};
