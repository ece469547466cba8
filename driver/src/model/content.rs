//! Asset and metadata content.

use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::codec::{self, EncodingError, Map, Value};

/// A key/value mapping attached to a transaction as asset data or metadata.
///
/// Keys are kept sorted, so two contents holding the same entries compare
/// equal and encode to the same bytes no matter how they were assembled.
///
/// # Duplicate keys
///
/// Inserting a key that is already present replaces its value: **last write
/// wins**. No merge is attempted and no error is raised, so
///
/// ```
/// use tessera_driver::model::Content;
///
/// let content = Content::from_pairs([("name", "first"), ("name", "second")]);
/// assert_eq!(content.len(), 1);
/// assert_eq!(content.get("name").and_then(|v| v.as_str()), Some("second"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Content(Map);

impl Content {
    /// Creates empty content. Encodes as `{}`.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builds content from key/value pairs. Later duplicates overwrite
    /// earlier ones.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut content = Self::new();
        for (key, value) in pairs {
            content.insert(key, value);
        }
        content
    }

    /// Builds content from a structured object through [`ToContent`].
    pub fn from_object<T>(object: &T) -> Result<Self, EncodingError>
    where
        T: ?Sized + ToContent,
    {
        object.to_content()
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.0.insert(key.into(), value.into())
    }

    /// Chaining form of [`insert`](Self::insert).
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.insert(key, value);
        self
    }

    /// Moves every entry of `other` into `self`; entries of `other` win.
    pub fn merge(&mut self, other: Content) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in canonical (sorted) key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map {
        &self.0
    }

    /// Checks that every value has a canonical encoding.
    pub fn validate(&self) -> Result<(), EncodingError> {
        self.0.values().try_for_each(Value::validate)
    }

    /// The canonical encoding of this content on its own.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, EncodingError> {
        codec::to_canonical_bytes(&Value::Object(self.0.clone()))
    }
}

impl From<Content> for Value {
    fn from(content: Content) -> Self {
        Value::Object(content.0)
    }
}

impl From<Map> for Content {
    fn from(map: Map) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Content {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<'a> IntoIterator for &'a Content {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// ToContent
// ---------------------------------------------------------------------------

/// Types that can be attached to a transaction as asset data or metadata.
///
/// Deriving `serde::Serialize` is the opt-in: every `Serialize` type gets
/// this trait, and its serialized fields become the content's keys. Fields
/// the type keeps out of its serialized form (`#[serde(skip)]`) stay out of
/// the ledger as well.
///
/// ```
/// use serde::Serialize;
/// use tessera_driver::codec::Value;
/// use tessera_driver::model::{Content, ToContent};
///
/// #[derive(Serialize)]
/// struct Car {
///     vin: String,
///     year: u16,
/// }
///
/// let car = Car { vin: "WVW1".into(), year: 2019 };
/// let content = car.to_content().unwrap();
/// let expected = Content::from_pairs([("vin", Value::from("WVW1")), ("year", Value::from(2019u16))]);
/// assert_eq!(content, expected);
/// ```
pub trait ToContent {
    /// Returns the canonical field mapping of `self`.
    ///
    /// # Errors
    ///
    /// [`EncodingError::NotAMapping`] if `self` does not serialize to an
    /// object, or any other [`EncodingError`] raised while lowering it.
    fn to_content(&self) -> Result<Content, EncodingError>;
}

impl<T> ToContent for T
where
    T: ?Sized + Serialize,
{
    fn to_content(&self) -> Result<Content, EncodingError> {
        match codec::to_value(self)? {
            Value::Object(map) => Ok(Content(map)),
            other => Err(EncodingError::NotAMapping(other.kind())),
        }
    }
}
