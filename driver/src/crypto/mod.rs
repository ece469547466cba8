//! # Cryptographic Primitives
//!
//! Everything the signer needs, as thin wrappers around audited crates:
//!
//! - **keys** — Ed25519 keypairs, public keys and signatures (`ed25519-dalek`).
//! - **signatures** — `sign` / `verify` over canonical bytes, and the
//!   [`SigningError`] type.
//! - **hash** — SHA3-256 for transaction ids, SHA-256 for condition
//!   fingerprints.
//! - **condition** — the `ed25519-sha-256` crypto-condition and fulfillment
//!   encodings the ledger uses to lock outputs and unlock inputs.

pub mod condition;
pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{sha256, sha3_256, sha3_256_hex};
pub use keys::{Keypair, PublicKey, Signature};
pub use signatures::{sign, verify, SigningError};
