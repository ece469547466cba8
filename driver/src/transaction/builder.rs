//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] collects asset content, metadata, inputs and
//! outputs, then produces a [`Transaction`] exactly once. The usual path is
//! [`TransactionBuilder::build_and_sign`], which assembles the unsigned body,
//! derives its id and fulfills every input in one step. For a keypair that
//! lives elsewhere, [`TransactionBuilder::build_unsigned`] stops before
//! signing and [`super::signing::sign_transaction`] finishes the job.
//!
//! ## State machine
//!
//! ```text
//! Collecting ──(add_asset | add_assets | add_metadata | spend | add_output)*──► Collecting
//! Collecting ──build_and_sign / build_unsigned──► Finished
//! Finished   ──anything──► InvalidState
//! ```
//!
//! A build that fails (no asset content, a zero amount) leaves the builder
//! in `Collecting`, so the caller can add what was missing and retry.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::TransactionError;
use super::signing::sign_transaction;
use super::types::{Input, Operation, Output, OutputRef, TransactionState};
use crate::codec::{self, EncodingError, Value};
use crate::config::{DEFAULT_OUTPUT_AMOUNT, TRANSACTION_VERSION};
use crate::crypto::hash::sha3_256_hex;
use crate::crypto::keys::{Keypair, PublicKey};
use crate::model::{Asset, Content, ToContent};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A ledger transaction in the remote wire schema.
///
/// Fields are private: values come from the builder or from deserializing a
/// ledger response, and are frozen afterwards. A transaction is either
/// unsigned (no id, no fulfillments) or signed (id and every fulfillment
/// present). Deserialized input that is neither is rejected by
/// [`super::verification::verify_transaction`].
///
/// # Canonical body
///
/// The id and every signature are computed over the same bytes: the
/// canonical encoding of the transaction with `id` and all `fulfillment`s
/// set to `null`. See [`Transaction::signable_bytes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Hex SHA3-256 of the canonical unsigned body. `None` until signed.
    pub(crate) id: Option<String>,

    /// Schema version. Always [`TRANSACTION_VERSION`] for locally built
    /// transactions.
    pub(crate) version: String,

    pub(crate) operation: Operation,

    /// Asset content for CREATE, a reference to the CREATE transaction for
    /// TRANSFER.
    pub(crate) asset: Asset,

    /// Encodes as `null` when absent, never `{}`.
    pub(crate) metadata: Option<Content>,

    pub(crate) inputs: Vec<Input>,
    pub(crate) outputs: Vec<Output>,
}

impl Transaction {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    pub fn metadata(&self) -> Option<&Content> {
        self.metadata.as_ref()
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// The id under which the ledger indexes this transaction's asset: the
    /// transaction's own id for CREATE, the referenced id for TRANSFER.
    pub fn asset_id(&self) -> Option<&str> {
        match self.operation {
            Operation::Create => self.id(),
            Operation::Transfer => self.asset.reference_id(),
        }
    }

    /// `Signed` only when the id and every fulfillment are present.
    pub fn state(&self) -> TransactionState {
        if self.id.is_some() && self.inputs.iter().all(|i| i.fulfillment.is_some()) {
            TransactionState::Signed
        } else {
            TransactionState::Unsigned
        }
    }

    /// Returns `true` if the transaction carries its id and all fulfillments.
    pub fn is_signed(&self) -> bool {
        self.state() == TransactionState::Signed
    }

    /// `true` when some, but not all, of the signing output is present.
    pub(crate) fn is_partially_signed(&self) -> bool {
        let any_signed =
            self.id.is_some() || self.inputs.iter().any(|i| i.fulfillment.is_some());
        any_signed && !self.is_signed()
    }

    /// Copy of this transaction with the id and every fulfillment cleared.
    fn unsigned_body(&self) -> Transaction {
        let mut body = self.clone();
        body.id = None;
        for input in &mut body.inputs {
            input.fulfillment = None;
        }
        body
    }

    /// The bytes that are both hashed into the id and signed by each input's
    /// owner: the canonical encoding of [`unsigned_body`](Self::unsigned_body).
    ///
    /// Identical for a transaction before and after signing.
    pub fn signable_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        codec::encode(&self.unsigned_body())
    }

    /// Computes the id from the current field values:
    /// `hex(sha3_256(signable_bytes))`.
    pub fn compute_id(&self) -> Result<String, EncodingError> {
        Ok(sha3_256_hex(&self.signable_bytes()?))
    }

    /// Canonical JSON of the full transaction, as sent to the ledger.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        codec::encode(self)
    }

    /// [`to_canonical_bytes`](Self::to_canonical_bytes) as a string.
    pub fn to_json(&self) -> Result<String, EncodingError> {
        codec::to_canonical_string(&codec::to_value(self)?)
    }

    /// Parses a transaction received from the ledger. Parsing does not verify;
    /// call [`super::verification::verify_transaction`] for that.
    pub fn from_json(json: &str) -> Result<Self, TransactionError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuilderState {
    Collecting,
    Finished,
}

/// Accumulates the parts of a transaction and builds it once.
///
/// Every method takes `&mut self` and returns `&mut Self` on success, so
/// calls chain with `?`:
///
/// ```
/// use tessera_driver::crypto::Keypair;
/// use tessera_driver::transaction::TransactionBuilder;
///
/// # fn main() -> Result<(), tessera_driver::transaction::TransactionError> {
/// let keypair = Keypair::generate();
/// let tx = TransactionBuilder::create()
///     .add_asset("firstname", "John")?
///     .add_asset("lastname", "Smith")?
///     .add_metadata("what", "My first transaction")?
///     .build_and_sign(&keypair)?;
///
/// assert!(tx.is_signed());
/// assert_eq!(tx.id().map(str::len), Some(64));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TransactionBuilder {
    operation: Operation,
    /// The CREATE transaction whose asset a TRANSFER moves.
    asset_id: Option<String>,
    assets: Content,
    metadata: Option<Content>,
    spends: Vec<OutputRef>,
    outputs: Vec<(u64, PublicKey)>,
    state: BuilderState,
}

impl TransactionBuilder {
    /// A builder for a CREATE transaction, which mints a new asset.
    pub fn create() -> Self {
        Self::new(Operation::Create, None)
    }

    /// A builder for a TRANSFER of the asset minted by CREATE transaction
    /// `asset_id`.
    pub fn transfer(asset_id: impl Into<String>) -> Self {
        Self::new(Operation::Transfer, Some(asset_id.into()))
    }

    fn new(operation: Operation, asset_id: Option<String>) -> Self {
        Self {
            operation,
            asset_id,
            assets: Content::new(),
            metadata: None,
            spends: Vec::new(),
            outputs: Vec::new(),
            state: BuilderState::Collecting,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// `true` once a transaction has been produced.
    pub fn is_finished(&self) -> bool {
        self.state == BuilderState::Finished
    }

    /// Adds one key/value pair to the asset content. A repeated key replaces
    /// the earlier value.
    ///
    /// # Errors
    ///
    /// [`TransactionError::InvalidState`] after a build or on a TRANSFER
    /// builder; [`TransactionError::Encoding`] for a non-finite number.
    pub fn add_asset<K, V>(&mut self, key: K, value: V) -> Result<&mut Self, TransactionError>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.ensure_collecting("add_asset")?;
        self.ensure_create("add_asset")?;
        let value = value.into();
        value.validate()?;
        self.assets.insert(key, value);
        Ok(self)
    }

    /// Adds every field of `object` to the asset content. Accepts a
    /// [`Content`] or any `Serialize` type that maps to an object.
    pub fn add_assets<T>(&mut self, object: &T) -> Result<&mut Self, TransactionError>
    where
        T: ?Sized + ToContent,
    {
        self.ensure_collecting("add_assets")?;
        self.ensure_create("add_assets")?;
        let content = object.to_content()?;
        self.assets.merge(content);
        Ok(self)
    }

    /// Adds one key/value pair to the metadata.
    pub fn add_metadata<K, V>(&mut self, key: K, value: V) -> Result<&mut Self, TransactionError>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.ensure_collecting("add_metadata")?;
        let value = value.into();
        value.validate()?;
        self.metadata.get_or_insert_with(Content::new).insert(key, value);
        Ok(self)
    }

    /// Adds every field of `object` to the metadata.
    pub fn add_metadata_object<T>(&mut self, object: &T) -> Result<&mut Self, TransactionError>
    where
        T: ?Sized + ToContent,
    {
        self.ensure_collecting("add_metadata_object")?;
        let content = object.to_content()?;
        self.metadata.get_or_insert_with(Content::new).merge(content);
        Ok(self)
    }

    /// Spends an output of an earlier transaction. TRANSFER only.
    pub fn spend(&mut self, output: OutputRef) -> Result<&mut Self, TransactionError> {
        self.ensure_collecting("spend")?;
        if self.operation != Operation::Transfer {
            return Err(TransactionError::InvalidState {
                reason: "spend is only valid on a TRANSFER builder".into(),
            });
        }
        self.spends.push(output);
        Ok(self)
    }

    /// Locks `amount` shares to `recipient`.
    pub fn add_output(
        &mut self,
        amount: u64,
        recipient: &PublicKey,
    ) -> Result<&mut Self, TransactionError> {
        self.ensure_collecting("add_output")?;
        if amount == 0 {
            return Err(TransactionError::IncompleteTransaction {
                reason: "output amount must be > 0".into(),
            });
        }
        self.outputs.push((amount, *recipient));
        Ok(self)
    }

    /// Produces the unsigned transaction with `owner` as the owner of every
    /// input, and finishes the builder.
    pub fn build_unsigned(&mut self, owner: &PublicKey) -> Result<Transaction, TransactionError> {
        self.ensure_collecting("build_unsigned")?;
        let tx = self.assemble(owner)?;
        self.state = BuilderState::Finished;
        debug!(operation = %tx.operation, inputs = tx.inputs.len(), "assembled unsigned transaction");
        Ok(tx)
    }

    /// Assembles, hashes and signs the transaction with `keypair`, and
    /// finishes the builder.
    ///
    /// # Errors
    ///
    /// - [`TransactionError::InvalidState`] if the builder already finished.
    /// - [`TransactionError::IncompleteTransaction`] for a CREATE without
    ///   asset content.
    /// - [`TransactionError::Encoding`] / [`TransactionError::Signing`] from
    ///   the codec and signer.
    pub fn build_and_sign(&mut self, keypair: &Keypair) -> Result<Transaction, TransactionError> {
        self.ensure_collecting("build_and_sign")?;
        let unsigned = self.assemble(&keypair.public_key())?;
        let signed = sign_transaction(unsigned, keypair)?;
        self.state = BuilderState::Finished;
        info!(
            tx_id = signed.id().unwrap_or_default(),
            operation = %signed.operation,
            "built and signed transaction"
        );
        Ok(signed)
    }

    /// Builds the unsigned transaction without touching the builder state.
    fn assemble(&self, owner: &PublicKey) -> Result<Transaction, TransactionError> {
        let asset = match self.operation {
            Operation::Create => {
                if self.assets.is_empty() {
                    return Err(TransactionError::IncompleteTransaction {
                        reason: "CREATE transaction has no asset content".into(),
                    });
                }
                Asset::data(self.assets.clone())
            }
            Operation::Transfer => {
                let id = self.asset_id.clone().unwrap_or_default();
                if id.is_empty() {
                    return Err(TransactionError::IncompleteTransaction {
                        reason: "TRANSFER transaction has no asset id".into(),
                    });
                }
                Asset::reference(id)
            }
        };

        let inputs = match (self.operation, asset.reference_id()) {
            (Operation::Create, _) => vec![Input::new(owner, None)],
            (Operation::Transfer, Some(asset_id)) if self.spends.is_empty() => {
                vec![Input::new(owner, Some(OutputRef::new(asset_id, 0)))]
            }
            (Operation::Transfer, _) => self
                .spends
                .iter()
                .map(|spent| Input::new(owner, Some(spent.clone())))
                .collect(),
        };

        let outputs = if self.outputs.is_empty() {
            vec![Output::new(DEFAULT_OUTPUT_AMOUNT, owner)]
        } else {
            self.outputs
                .iter()
                .map(|(amount, recipient)| Output::new(*amount, recipient))
                .collect()
        };

        let tx = Transaction {
            id: None,
            version: TRANSACTION_VERSION.to_owned(),
            operation: self.operation,
            asset,
            metadata: self.metadata.clone(),
            inputs,
            outputs,
        };

        // Surface encoding problems before anything is signed.
        tx.signable_bytes()?;
        Ok(tx)
    }

    fn ensure_collecting(&self, op: &str) -> Result<(), TransactionError> {
        match self.state {
            BuilderState::Collecting => Ok(()),
            BuilderState::Finished => Err(TransactionError::InvalidState {
                reason: format!("{} called after the transaction was built", op),
            }),
        }
    }

    fn ensure_create(&self, op: &str) -> Result<(), TransactionError> {
        match self.operation {
            Operation::Create => Ok(()),
            Operation::Transfer => Err(TransactionError::InvalidState {
                reason: format!(
                    "{} is not allowed on a TRANSFER: the asset is the CREATE transaction's",
                    op
                ),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
