//! # Ed25519-SHA-256 Crypto-Conditions
//!
//! The ledger locks every output behind a crypto-condition and unlocks every
//! input with the matching fulfillment. Only the `ed25519-sha-256` type is
//! used by this driver, which keeps the DER handling down to fixed layouts:
//!
//! ```text
//! fingerprint contents   30 22 80 20 <public key:32>
//! fulfillment            A4 64 80 20 <public key:32> 81 40 <signature:64>
//! ```
//!
//! The condition URI commits to `sha256(fingerprint contents)`:
//!
//! ```text
//! ni:///sha-256;<base64url(fingerprint)>?fpt=ed25519-sha-256&cost=131072
//! ```
//!
//! Both the fingerprint in the URI and the fulfillment string use URL-safe
//! base64 without padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use super::hash::sha256;
use super::keys::{PublicKey, Signature};
use super::signatures::SigningError;
use crate::config::{CONDITION_COST, CONDITION_TYPE};

/// DER header of the fingerprint contents: SEQUENCE(34) { [0] OCTET STRING(32) }.
const FINGERPRINT_PREFIX: [u8; 4] = [0x30, 0x22, 0x80, 0x20];

/// DER header of the fulfillment up to the public key: [4] constructed(100) { [0](32) }.
const FULFILLMENT_PREFIX: [u8; 4] = [0xA4, 0x64, 0x80, 0x20];

/// DER header between the public key and the signature: [1](64).
const SIGNATURE_TAG: [u8; 2] = [0x81, 0x40];

const FULFILLMENT_LENGTH: usize = 4 + 32 + 2 + 64;

/// `sha256` over the DER fingerprint contents of an ed25519 condition.
pub fn fingerprint(public_key: &PublicKey) -> [u8; 32] {
    let mut contents = Vec::with_capacity(FINGERPRINT_PREFIX.len() + 32);
    contents.extend_from_slice(&FINGERPRINT_PREFIX);
    contents.extend_from_slice(public_key.as_bytes());
    sha256(&contents)
}

/// The condition URI locking an output to `public_key`.
pub fn condition_uri(public_key: &PublicKey) -> String {
    format!(
        "ni:///sha-256;{}?fpt={}&cost={}",
        URL_SAFE_NO_PAD.encode(fingerprint(public_key)),
        CONDITION_TYPE,
        CONDITION_COST
    )
}

/// Serializes a fulfillment for `public_key` carrying `signature`.
pub fn encode_fulfillment(public_key: &PublicKey, signature: &Signature) -> String {
    let mut der = Vec::with_capacity(FULFILLMENT_LENGTH);
    der.extend_from_slice(&FULFILLMENT_PREFIX);
    der.extend_from_slice(public_key.as_bytes());
    der.extend_from_slice(&SIGNATURE_TAG);
    der.extend_from_slice(signature.as_bytes());
    URL_SAFE_NO_PAD.encode(der)
}

/// Parses a fulfillment string back into its public key and signature.
///
/// # Errors
///
/// [`SigningError::MalformedFulfillment`] if the string is not base64url,
/// has the wrong length, or is not an ed25519-sha-256 fulfillment;
/// [`SigningError::InvalidPublicKey`] if the embedded key is not a curve
/// point.
pub fn decode_fulfillment(encoded: &str) -> Result<(PublicKey, Signature), SigningError> {
    let der = URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| SigningError::MalformedFulfillment(format!("invalid base64url: {}", e)))?;

    if der.len() != FULFILLMENT_LENGTH {
        return Err(SigningError::MalformedFulfillment(format!(
            "expected {} bytes, got {}",
            FULFILLMENT_LENGTH,
            der.len()
        )));
    }
    if der[..4] != FULFILLMENT_PREFIX || der[36..38] != SIGNATURE_TAG {
        return Err(SigningError::MalformedFulfillment(format!(
            "not an {} fulfillment",
            CONDITION_TYPE
        )));
    }

    let public_key = PublicKey::from_bytes(&der[4..36])?;
    let signature = Signature::from_slice(&der[38..])?;
    Ok((public_key, signature))
}
