//! # Digital Signatures
//!
//! Ed25519 signing and verification over canonical transaction bytes.
//!
//! The message handed to [`sign`] is the canonical encoding itself. There is
//! no hashing pass in front of it: Ed25519 already hashes with SHA-512
//! internally, and a second digest here would produce signatures the remote
//! ledger cannot check.

use thiserror::Error;

use super::keys::{Keypair, PublicKey, Signature};

/// Errors raised while loading keys or producing and checking fulfillments.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The key material is not an Ed25519 key.
    #[error("key is not an Ed25519 key: {reason}")]
    UnsupportedKey { reason: String },

    #[error("invalid Ed25519 public key")]
    InvalidPublicKey,

    #[error("keypair validation failed: public key does not match secret key")]
    KeypairMismatch,

    /// The signing key does not own the output an input spends.
    #[error("signer {signer} is not among the owners of input {index}")]
    NotAnOwner { index: usize, signer: String },

    #[error("malformed fulfillment: {0}")]
    MalformedFulfillment(String),

    /// A freshly produced fulfillment failed to verify.
    #[error("self-check failed: fulfillment for input {index} does not verify")]
    SelfCheckFailed { index: usize },
}

/// Signs `message` with `keypair`.
///
/// # Example
///
/// ```
/// use tessera_driver::crypto::{sign, verify, Keypair};
///
/// let keypair = Keypair::generate();
/// let message = br#"{"asset":{"data":{"firstname":"John"}}}"#;
/// let signature = sign(&keypair, message);
///
/// assert!(verify(&keypair.public_key(), message, &signature));
/// ```
pub fn sign(keypair: &Keypair, message: &[u8]) -> Signature {
    keypair.sign(message)
}

/// Returns `true` iff `signature` over `message` verifies against
/// `public_key`. A wrong key and a tampered message both just yield `false`.
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    public_key.verify(message, signature)
}
