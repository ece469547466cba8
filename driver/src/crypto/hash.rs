//! # Hashing Utilities
//!
//! Two hash functions, each with exactly one job:
//!
//! - **SHA3-256** — the content hash. A transaction's id is the hex-encoded
//!   SHA3-256 of its canonical unsigned body, which is what the remote
//!   ledger recomputes on ingestion.
//! - **SHA-256** — the crypto-condition fingerprint. Condition URIs commit
//!   to the SHA-256 of the DER-encoded fingerprint contents.

use sha2::{Digest, Sha256};
use tiny_keccak::{Hasher, Sha3};

/// SHA3-256 (FIPS 202) of `data`. Not Keccak-256: the padding differs.
///
/// # Example
///
/// ```
/// use tessera_driver::crypto::hash::sha3_256_hex;
///
/// assert_eq!(
///     sha3_256_hex(b""),
///     "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
/// );
/// ```
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Hex-encoded [`sha3_256`]. This is the transaction id format.
pub fn sha3_256_hex(data: &[u8]) -> String {
    hex::encode(sha3_256(data))
}

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}
