//! # Asset / Metadata Model
//!
//! Normalizes user-supplied content into the mappings a transaction carries.
//!
//! - [`Content`] is the sorted key/value mapping used for both asset data and
//!   metadata. It is built from pairs ([`Content::from_pairs`]) or from any
//!   `Serialize` type through [`ToContent`].
//! - [`Asset`] is what a transaction's `asset` field holds: fresh data for a
//!   CREATE, or a reference to the CREATE transaction for a TRANSFER.

pub mod asset;
pub mod content;

pub use asset::Asset;
pub use content::{Content, ToContent};
