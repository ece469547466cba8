//! # Key Management
//!
//! Ed25519 keypairs for signing ledger transactions.
//!
//! The ledger identifies owners by their base58-encoded Ed25519 public key,
//! so that is the primary text form of [`PublicKey`]. Hex is offered for
//! debugging and for loading secret keys from configuration.
//!
//! ## Security considerations
//!
//! - Secret keys are zeroized on drop (ed25519-dalek does this for us).
//! - Key generation uses `OsRng`.
//! - `Keypair` does not implement `Serialize`, and its `Debug` output only
//!   shows the public half. Secret bytes never reach a transaction or a log.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, KEYPAIR_LENGTH,
    PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SIGNATURE_LENGTH,
};
use rand::rngs::OsRng;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::signatures::SigningError;

/// An Ed25519 signing keypair.
///
/// # Examples
///
/// ```
/// use tessera_driver::crypto::Keypair;
///
/// let kp = Keypair::generate();
/// let sig = kp.sign(b"canonical bytes");
/// assert!(kp.public_key().verify(b"canonical bytes", &sig));
/// ```
pub struct Keypair {
    signing_key: SigningKey,
}

/// The public half of a [`Keypair`]. This is what appears in `owners_before`,
/// `public_keys` and condition details.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; SIGNATURE_LENGTH],
}

impl Keypair {
    /// Generates a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic keypair from a 32-byte seed. In Ed25519 the seed *is*
    /// the secret key.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Loads secret key material of unknown provenance.
    ///
    /// Accepts the two Ed25519 layouts in common use: the 32-byte seed, and
    /// the 64-byte `seed || public key` form. In the latter the embedded
    /// public key must match the one derived from the seed.
    ///
    /// # Errors
    ///
    /// [`SigningError::UnsupportedKey`] for any other length (a secp256k1
    /// or RSA key, for instance), [`SigningError::KeypairMismatch`] if the
    /// embedded public key is not the seed's.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, SigningError> {
        match bytes.len() {
            SECRET_KEY_LENGTH => {
                let mut seed = [0u8; SECRET_KEY_LENGTH];
                seed.copy_from_slice(bytes);
                Ok(Self::from_seed(&seed))
            }
            KEYPAIR_LENGTH => {
                let mut pair = [0u8; KEYPAIR_LENGTH];
                pair.copy_from_slice(bytes);
                let signing_key = SigningKey::from_keypair_bytes(&pair)
                    .map_err(|_| SigningError::KeypairMismatch)?;
                Ok(Self { signing_key })
            }
            other => Err(SigningError::UnsupportedKey {
                reason: format!(
                    "expected {} or {} bytes of Ed25519 key material, got {}",
                    SECRET_KEY_LENGTH, KEYPAIR_LENGTH, other
                ),
            }),
        }
    }

    /// Loads a hex-encoded secret key (seed or seed+public).
    pub fn from_hex(hex_str: &str) -> Result<Self, SigningError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|e| SigningError::UnsupportedKey {
            reason: format!("secret key is not valid hex: {}", e),
        })?;
        Self::from_secret_bytes(&bytes)
    }

    /// Loads a base58-encoded secret key (seed or seed+public).
    pub fn from_base58(encoded: &str) -> Result<Self, SigningError> {
        let bytes = bs58::decode(encoded.trim())
            .into_vec()
            .map_err(|e| SigningError::UnsupportedKey {
                reason: format!("secret key is not valid base58: {}", e),
            })?;
        Self::from_secret_bytes(&bytes)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Signs `message` as-is. Ed25519 hashes internally with SHA-512; no
    /// pre-hash is applied here.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature {
            bytes: self.signing_key.sign(message).to_bytes(),
        }
    }

    /// Exports the 32-byte seed. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

impl Clone for Keypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Public half only.
        write!(f, "Keypair(pub={})", self.public_key().to_base58())
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

impl PublicKey {
    /// Validates that `bytes` is a point on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SigningError> {
        let arr: [u8; PUBLIC_KEY_LENGTH] =
            bytes.try_into().map_err(|_| SigningError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&arr).map_err(|_| SigningError::InvalidPublicKey)?;
        Ok(Self { bytes: arr })
    }

    /// Parses the base58 form used on the wire.
    pub fn from_base58(encoded: &str) -> Result<Self, SigningError> {
        let bytes = bs58::decode(encoded)
            .into_vec()
            .map_err(|_| SigningError::InvalidPublicKey)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.bytes).into_string()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// `true` iff `signature` is a valid Ed25519 signature of `message`.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let dalek_sig = DalekSignature::from_bytes(&signature.bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base58())
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, SigningError> {
        let bytes: [u8; SIGNATURE_LENGTH] = slice.try_into().map_err(|_| {
            SigningError::MalformedFulfillment(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_LENGTH,
                slice.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", &self.to_hex()[..16])
    }
}
