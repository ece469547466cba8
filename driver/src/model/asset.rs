//! The `asset` field of a transaction.

use serde::{Deserialize, Serialize};

use super::content::Content;

/// Asset payload of a transaction.
///
/// On the wire this is `{"data": {...}}`, `{"data": null}` or
/// `{"id": "<tx id>"}`; the enum is untagged so every shape deserializes
/// without a discriminator.
///
/// `Reference` is listed first: a missing `data` field would otherwise let
/// `{"id": ..}` match `Data { data: None }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Asset {
    /// A reference to the CREATE transaction whose asset is being moved.
    Reference { id: String },
    /// A fresh asset minted by a CREATE transaction. The ledger accepts a
    /// CREATE whose data is `null`; the builder never produces one.
    Data { data: Option<Content> },
}

impl Asset {
    pub fn data(content: Content) -> Self {
        Asset::Data {
            data: Some(content),
        }
    }

    pub fn reference(id: impl Into<String>) -> Self {
        Asset::Reference { id: id.into() }
    }

    /// The asset content, if this is a CREATE payload.
    pub fn content(&self) -> Option<&Content> {
        match self {
            Asset::Data { data } => data.as_ref(),
            Asset::Reference { .. } => None,
        }
    }

    /// The referenced CREATE transaction id, if this is a TRANSFER payload.
    pub fn reference_id(&self) -> Option<&str> {
        match self {
            Asset::Data { .. } => None,
            Asset::Reference { id } => Some(id),
        }
    }
}
