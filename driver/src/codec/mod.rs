//! # Canonical Codec
//!
//! Deterministic encoding of transaction content for hashing and signing.
//!
//! Two transactions that mean the same thing must hash to the same id, no
//! matter whether their assets were assembled key by key, reflected out of a
//! struct, or parsed back from the ledger's JSON. Everything that gets hashed
//! or signed therefore passes through this module and nothing else.
//!
//! ## Pipeline
//!
//! ```text
//! T: Serialize ──► ser::to_value ──► Value ──► canonical::to_canonical_bytes ──► Vec<u8>
//! ```
//!
//! - **value** — the JSON-like [`Value`] tree. Objects are `BTreeMap`s, so
//!   key order is a property of the type rather than of whoever built it.
//! - **ser** — a `serde` serializer that lowers any `Serialize` type into a
//!   [`Value`], refusing shapes that have no canonical form.
//! - **canonical** — the byte writer: sorted keys, no whitespace, one fixed
//!   spelling per number.
//!
//! The output is plain JSON, so the remote service can re-derive the same
//! bytes from the transaction it receives.

pub mod canonical;
pub mod ser;
pub mod value;

use std::fmt::Display;

use thiserror::Error;

pub use canonical::{encode, to_canonical_bytes, to_canonical_string};
pub use ser::to_value;
pub use value::{Map, Value};

/// Content that cannot be given a canonical encoding.
///
/// Raised instead of coercing the value into something representable:
/// a `NaN` silently becoming `null` would still hash, sign and submit, and
/// the resulting transaction would mean something other than what the
/// caller wrote.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    /// `NaN` and the infinities have no JSON spelling.
    #[error("non-finite number {0} cannot be canonically encoded")]
    NonFiniteNumber(f64),

    /// Object keys must serialize as strings (or as scalars that print as one).
    #[error("object keys must be strings, got {0}")]
    NonStringKey(&'static str),

    /// Asset and metadata content must be a key/value mapping at the top level.
    #[error("expected a mapping at the top level, got {0}")]
    NotAMapping(&'static str),

    /// A `serde` shape with no canonical equivalent (e.g. 128-bit integers).
    #[error("unsupported value: {0}")]
    Unsupported(String),
}

impl serde::ser::Error for EncodingError {
    fn custom<T: Display>(msg: T) -> Self {
        EncodingError::Unsupported(msg.to_string())
    }
}
