//! Transaction verification: structural checks and cryptographic validation.
//!
//! [`verify_transaction`] is the local equivalent of what the ledger does on
//! ingestion. It is useful on transactions fetched from a node, before
//! submitting something built elsewhere, and in tests that stand in for the
//! ledger. The checks run from cheapest to most expensive, so malformed
//! input fails before any signature is checked.

use super::builder::Transaction;
use super::error::TransactionError;
use super::types::Operation;
use crate::config::{CONDITION_TYPE, TRANSACTION_VERSION};
use crate::crypto::condition::{condition_uri, decode_fulfillment};
use crate::crypto::hash::sha3_256_hex;
use crate::crypto::keys::PublicKey;
use crate::crypto::signatures::verify;
use crate::model::Asset;

/// Verifies a signed transaction.
///
/// The checks, in order:
///
/// 1. **Signed** — neither unsigned nor partially signed.
/// 2. **Shape** — supported version, at least one input and one output,
///    asset and inputs consistent with the operation.
/// 3. **Outputs** — positive amount, an ed25519-sha-256 condition whose URI
///    matches its public key, and that key listed in `public_keys`.
/// 4. **Id** — equals `hex(sha3_256(signable_bytes))`.
/// 5. **Fulfillments** — each decodes, its key is among the input's
///    `owners_before`, and its signature verifies over the signable bytes.
///
/// # Errors
///
/// The first failing check, as a [`TransactionError`].
pub fn verify_transaction(tx: &Transaction) -> Result<(), TransactionError> {
    // 1. Signing state.
    if tx.is_partially_signed() {
        return Err(TransactionError::PartiallySigned);
    }
    let Some(id) = tx.id() else {
        return Err(TransactionError::Unsigned);
    };

    // 2. Shape.
    if tx.version() != TRANSACTION_VERSION {
        return Err(TransactionError::InvalidState {
            reason: format!(
                "unsupported transaction version {:?}, expected {:?}",
                tx.version(),
                TRANSACTION_VERSION
            ),
        });
    }
    if tx.inputs().is_empty() {
        return Err(TransactionError::IncompleteTransaction {
            reason: "transaction has no inputs".into(),
        });
    }
    if tx.outputs().is_empty() {
        return Err(TransactionError::IncompleteTransaction {
            reason: "transaction has no outputs".into(),
        });
    }
    check_operation_shape(tx)?;

    // 3. Outputs.
    for (index, output) in tx.outputs().iter().enumerate() {
        if output.amount() == 0 {
            return Err(TransactionError::InvalidOutput {
                index,
                reason: "amount must be > 0".into(),
            });
        }
        let details = &output.condition().details;
        if details.kind != CONDITION_TYPE {
            return Err(TransactionError::InvalidOutput {
                index,
                reason: format!("unsupported condition type {:?}", details.kind),
            });
        }
        let public_key = PublicKey::from_base58(&details.public_key).map_err(|_| {
            TransactionError::InvalidOutput {
                index,
                reason: "condition public key is not a valid Ed25519 key".into(),
            }
        })?;
        if output.condition().uri != condition_uri(&public_key) {
            return Err(TransactionError::InvalidOutput {
                index,
                reason: "condition uri does not match its public key".into(),
            });
        }
        if !output.public_keys().contains(&details.public_key) {
            return Err(TransactionError::InvalidOutput {
                index,
                reason: "condition public key is not listed in public_keys".into(),
            });
        }
    }

    // 4. Id integrity.
    let message = tx.signable_bytes()?;
    let expected = sha3_256_hex(&message);
    if id != expected {
        return Err(TransactionError::IdMismatch {
            expected,
            actual: id.to_owned(),
        });
    }

    // 5. Fulfillments.
    for (index, input) in tx.inputs().iter().enumerate() {
        let encoded = input
            .fulfillment()
            .ok_or(TransactionError::MissingFulfillment { index })?;
        let (public_key, signature) =
            decode_fulfillment(encoded).map_err(|e| TransactionError::InvalidFulfillment {
                index,
                reason: e.to_string(),
            })?;
        if !input.owners_before().contains(&public_key.to_base58()) {
            return Err(TransactionError::InvalidFulfillment {
                index,
                reason: format!("{} is not among owners_before", public_key),
            });
        }
        if !verify(&public_key, &message, &signature) {
            return Err(TransactionError::InvalidFulfillment {
                index,
                reason: "signature does not verify".into(),
            });
        }
    }

    Ok(())
}

fn check_operation_shape(tx: &Transaction) -> Result<(), TransactionError> {
    match (tx.operation(), tx.asset()) {
        (Operation::Create, Asset::Data { .. }) => {
            if tx.inputs().iter().any(|i| i.fulfills().is_some()) {
                return Err(TransactionError::InvalidState {
                    reason: "CREATE inputs cannot spend outputs".into(),
                });
            }
        }
        (Operation::Transfer, Asset::Reference { .. }) => {
            if tx.inputs().iter().any(|i| i.fulfills().is_none()) {
                return Err(TransactionError::InvalidState {
                    reason: "every TRANSFER input must spend an output".into(),
                });
            }
        }
        (operation, _) => {
            return Err(TransactionError::InvalidState {
                reason: format!("asset shape does not match operation {}", operation),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
