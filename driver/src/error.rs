//! Every error type of the crate, one per layer.
//!
//! | Layer        | Error                  |
//! |--------------|------------------------|
//! | codec        | [`EncodingError`]      |
//! | crypto       | [`SigningError`]       |
//! | transaction  | [`TransactionError`]   |
//! | config       | [`ConfigurationError`] |
//! | api (query)  | [`ClientError`], [`TransportError`] |
//! | api (submit) | [`SubmitError`]        |
//!
//! Lower layers convert into higher ones with `From`, so `?` works across
//! them.

pub use crate::api::{ClientError, SubmitError, TransportError};
pub use crate::codec::EncodingError;
pub use crate::config::ConfigurationError;
pub use crate::crypto::SigningError;
pub use crate::transaction::TransactionError;
