//! Core type definitions for ledger transactions.
//!
//! These are the building blocks of the wire schema: the operation
//! discriminant, inputs with their fulfillments, and outputs locked behind a
//! crypto-condition. Field names match the remote JSON exactly, so the same
//! types serve for construction, canonical encoding and deserialization of
//! query results.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CONDITION_TYPE;
use crate::crypto::condition::condition_uri;
use crate::crypto::keys::PublicKey;

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// What a transaction does to its asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    /// Mints a new asset. Its id becomes the asset id.
    Create,
    /// Moves an existing asset by spending outputs of earlier transactions.
    Transfer,
}

impl Operation {
    /// Wire spelling, also used as the `operation` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TransactionState
// ---------------------------------------------------------------------------

/// Whether a transaction carries its id and fulfillments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    /// Fresh from assembly: no id, no fulfillments.
    Unsigned,
    /// Id present and every input fulfilled.
    Signed,
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned => write!(f, "Unsigned"),
            Self::Signed => write!(f, "Signed"),
        }
    }
}

// ---------------------------------------------------------------------------
// OutputRef
// ---------------------------------------------------------------------------

/// Points at one output of an earlier transaction: the thing a TRANSFER
/// input spends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRef {
    pub transaction_id: String,
    pub output_index: u32,
}

impl OutputRef {
    pub fn new(transaction_id: impl Into<String>, output_index: u32) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            output_index,
        }
    }
}

impl fmt::Display for OutputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.output_index)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One input of a transaction.
///
/// `fulfills` is `None` for CREATE inputs. `fulfillment` is `None` until the
/// transaction is signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub(crate) owners_before: Vec<String>,
    pub(crate) fulfills: Option<OutputRef>,
    pub(crate) fulfillment: Option<String>,
}

impl Input {
    pub(crate) fn new(owner: &PublicKey, fulfills: Option<OutputRef>) -> Self {
        Self {
            owners_before: vec![owner.to_base58()],
            fulfills,
            fulfillment: None,
        }
    }

    /// Base58 public keys that must sign this input.
    pub fn owners_before(&self) -> &[String] {
        &self.owners_before
    }

    pub fn fulfills(&self) -> Option<&OutputRef> {
        self.fulfills.as_ref()
    }

    /// Base64url DER fulfillment, once signed.
    pub fn fulfillment(&self) -> Option<&str> {
        self.fulfillment.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// `condition.details` of an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub public_key: String,
}

/// The crypto-condition locking an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub details: ConditionDetails,
    pub uri: String,
}

impl Condition {
    /// An ed25519-sha-256 condition satisfiable by `public_key`.
    pub fn ed25519(public_key: &PublicKey) -> Self {
        Self {
            details: ConditionDetails {
                kind: CONDITION_TYPE.to_owned(),
                public_key: public_key.to_base58(),
            },
            uri: condition_uri(public_key),
        }
    }
}

/// One output of a transaction. Amounts travel as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub(crate) public_keys: Vec<String>,
    pub(crate) condition: Condition,
    #[serde(with = "amount_string")]
    pub(crate) amount: u64,
}

impl Output {
    /// `amount` shares locked to `recipient`.
    pub fn new(amount: u64, recipient: &PublicKey) -> Self {
        Self {
            public_keys: vec![recipient.to_base58()],
            condition: Condition::ed25519(recipient),
            amount,
        }
    }

    pub fn public_keys(&self) -> &[String] {
        &self.public_keys
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }
}

/// Serde adapter for `"amount": "1"`.
mod amount_string {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u64>()
            .map_err(|_| D::Error::custom(format!("invalid output amount {:?}", raw)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
