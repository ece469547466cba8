//! Transaction signing with Ed25519 keypairs.
//!
//! Signing is a separate step from assembly because the keypair may not be
//! available where the transaction is built. The message is the canonical
//! [`Transaction::signable_bytes`] output: the transaction with its id and
//! fulfillments cleared. The id is the SHA3-256 of those same bytes, so it
//! can be recomputed from a signed transaction without any other context.

use tracing::debug;

use super::builder::Transaction;
use super::error::TransactionError;
use crate::crypto::condition::{decode_fulfillment, encode_fulfillment};
use crate::crypto::hash::sha3_256_hex;
use crate::crypto::keys::Keypair;
use crate::crypto::signatures::{verify, SigningError};

/// Signs an unsigned transaction, returning the frozen signed value.
///
/// The signing procedure:
/// 1. Check that `keypair` owns every input (`owners_before`).
/// 2. Compute `signable_bytes()`, the canonical unsigned body.
/// 3. Set `id = hex(sha3_256(signable_bytes))`.
/// 4. Sign those bytes and store one ed25519-sha-256 fulfillment per input.
/// 5. Decode and verify every fulfillment again before returning.
///
/// The unsigned transaction is consumed, so a half-signed value never
/// escapes.
///
/// # Errors
///
/// - [`TransactionError::InvalidState`] if `tx` already carries an id or a
///   fulfillment.
/// - [`SigningError::NotAnOwner`] if `keypair` is not an owner of an input.
/// - [`SigningError::SelfCheckFailed`] if a fulfillment does not verify.
///
/// # Example
///
/// ```
/// use tessera_driver::crypto::Keypair;
/// use tessera_driver::transaction::{sign_transaction, TransactionBuilder};
///
/// let keypair = Keypair::generate();
/// let unsigned = TransactionBuilder::create()
///     .add_asset("firstname", "John").unwrap()
///     .build_unsigned(&keypair.public_key()).unwrap();
///
/// let signed = sign_transaction(unsigned, &keypair).unwrap();
/// assert!(signed.is_signed());
/// ```
pub fn sign_transaction(
    mut tx: Transaction,
    keypair: &Keypair,
) -> Result<Transaction, TransactionError> {
    if tx.id.is_some() || tx.inputs.iter().any(|i| i.fulfillment.is_some()) {
        return Err(TransactionError::InvalidState {
            reason: "transaction is already signed".into(),
        });
    }
    if tx.inputs.is_empty() {
        return Err(TransactionError::IncompleteTransaction {
            reason: "transaction has no inputs to sign".into(),
        });
    }

    let public_key = keypair.public_key();
    let signer = public_key.to_base58();
    for (index, input) in tx.inputs.iter().enumerate() {
        if !input.owners_before.iter().any(|owner| *owner == signer) {
            return Err(SigningError::NotAnOwner {
                index,
                signer: signer.clone(),
            }
            .into());
        }
    }

    let message = tx.signable_bytes()?;
    let id = sha3_256_hex(&message);
    let signature = keypair.sign(&message);
    let fulfillment = encode_fulfillment(&public_key, &signature);

    for input in &mut tx.inputs {
        input.fulfillment = Some(fulfillment.clone());
    }
    tx.id = Some(id);

    self_check(&tx, &message)?;
    debug!(tx_id = tx.id().unwrap_or_default(), signer = %signer, "signed transaction");
    Ok(tx)
}

/// Re-verifies each fresh fulfillment against the signed message.
fn self_check(tx: &Transaction, message: &[u8]) -> Result<(), SigningError> {
    for (index, input) in tx.inputs.iter().enumerate() {
        let encoded = input
            .fulfillment
            .as_deref()
            .ok_or(SigningError::SelfCheckFailed { index })?;
        let (public_key, signature) =
            decode_fulfillment(encoded).map_err(|_| SigningError::SelfCheckFailed { index })?;
        if !verify(&public_key, message, &signature) {
            return Err(SigningError::SelfCheckFailed { index });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::builder::TransactionBuilder;

    fn unsigned_for(keypair: &Keypair) -> Transaction {
        TransactionBuilder::create()
            .add_asset("firstname", "John")
            .unwrap()
            .build_unsigned(&keypair.public_key())
            .unwrap()
    }

    #[test]
    fn sign_sets_id_and_fulfillments() {
        let kp = Keypair::generate();
        let tx = unsigned_for(&kp);
        assert!(!tx.is_signed());

        let signed = sign_transaction(tx, &kp).unwrap();
        assert!(signed.is_signed());
        assert!(signed.inputs().iter().all(|i| i.fulfillment().is_some()));
    }

    #[test]
    fn id_is_hash_of_unsigned_body() {
        let kp = Keypair::generate();
        let tx = unsigned_for(&kp);
        let expected = tx.compute_id().unwrap();

        let signed = sign_transaction(tx, &kp).unwrap();
        assert_eq!(signed.id(), Some(expected.as_str()));
    }

    #[test]
    fn fulfillment_verifies_over_signable_bytes() {
        let kp = Keypair::generate();
        let signed = sign_transaction(unsigned_for(&kp), &kp).unwrap();

        let (pk, sig) = decode_fulfillment(signed.inputs()[0].fulfillment().unwrap()).unwrap();
        assert_eq!(pk, kp.public_key());
        assert!(verify(&pk, &signed.signable_bytes().unwrap(), &sig));
    }

    #[test]
    fn resigning_is_deterministic() {
        let kp = Keypair::generate();
        let a = sign_transaction(unsigned_for(&kp), &kp).unwrap();
        let b = sign_transaction(unsigned_for(&kp), &kp).unwrap();
        assert_eq!(a.id(), b.id());
        assert_eq!(a.inputs()[0].fulfillment(), b.inputs()[0].fulfillment());
    }

    #[test]
    fn signing_twice_is_rejected() {
        let kp = Keypair::generate();
        let signed = sign_transaction(unsigned_for(&kp), &kp).unwrap();
        assert!(matches!(
            sign_transaction(signed, &kp),
            Err(TransactionError::InvalidState { .. })
        ));
    }

    #[test]
    fn foreign_key_is_not_an_owner() {
        let owner = Keypair::generate();
        let stranger = Keypair::generate();
        let err = sign_transaction(unsigned_for(&owner), &stranger).unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Signing(SigningError::NotAnOwner { index: 0, .. })
        ));
    }
}
