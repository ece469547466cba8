//! Lowering of arbitrary `Serialize` types into a [`Value`] tree.
//!
//! This is how structured objects become asset or metadata content: the
//! fields a type exposes through `serde` are exactly the fields that end up
//! in the ledger. Fields marked `#[serde(skip)]` stay out, renamed fields
//! appear under their wire name, and nested structs recurse.
//!
//! Unlike `serde_json::to_value`, non-finite floats are an error here rather
//! than a quiet `null`.

use serde::ser::{self, Impossible, Serialize};

use super::value::{Map, Value};
use super::EncodingError;

/// Converts any `Serialize` value into a [`Value`].
///
/// # Errors
///
/// [`EncodingError`] if the value contains a non-finite float, a map with
/// non-scalar keys, or a `serde` shape with no JSON equivalent.
pub fn to_value<T>(value: &T) -> Result<Value, EncodingError>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = EncodingError;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = TupleVariantSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = StructVariantSerializer;

    fn serialize_bool(self, v: bool) -> Result<Value, EncodingError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, EncodingError> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Value, EncodingError> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Value, EncodingError> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Value, EncodingError> {
        Ok(Value::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, EncodingError> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Value, EncodingError> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Value, EncodingError> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Value, EncodingError> {
        Ok(Value::UInt(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, EncodingError> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<Value, EncodingError> {
        if !v.is_finite() {
            return Err(EncodingError::NonFiniteNumber(v));
        }
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, EncodingError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, EncodingError> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, EncodingError> {
        Ok(Value::Array(v.iter().map(|b| Value::UInt(*b as u64)).collect()))
    }

    fn serialize_none(self) -> Result<Value, EncodingError> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, EncodingError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, EncodingError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, EncodingError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, EncodingError> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, EncodingError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, EncodingError>
    where
        T: ?Sized + Serialize,
    {
        let mut map = Map::new();
        map.insert(variant.to_owned(), to_value(value)?);
        Ok(Value::Object(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer, EncodingError> {
        Ok(SeqSerializer {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer, EncodingError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqSerializer, EncodingError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleVariantSerializer, EncodingError> {
        Ok(TupleVariantSerializer {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapSerializer, EncodingError> {
        Ok(MapSerializer {
            map: Map::new(),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<MapSerializer, EncodingError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<StructVariantSerializer, EncodingError> {
        Ok(StructVariantSerializer {
            variant,
            map: Map::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// Compound serializers
// ---------------------------------------------------------------------------

struct SeqSerializer {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = EncodingError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodingError>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodingError> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = EncodingError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), EncodingError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodingError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = EncodingError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), EncodingError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, EncodingError> {
        ser::SerializeSeq::end(self)
    }
}

struct TupleVariantSerializer {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for TupleVariantSerializer {
    type Ok = Value;
    type Error = EncodingError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), EncodingError>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodingError> {
        let mut map = Map::new();
        map.insert(self.variant.to_owned(), Value::Array(self.items));
        Ok(Value::Object(map))
    }
}

struct MapSerializer {
    map: Map,
    next_key: Option<String>,
}

impl ser::SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = EncodingError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), EncodingError>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), EncodingError>
    where
        T: ?Sized + Serialize,
    {
        let key = self.next_key.take().ok_or_else(|| {
            EncodingError::Unsupported("map value serialized before its key".to_owned())
        })?;
        // Duplicate keys: the later entry replaces the earlier one.
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodingError> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for MapSerializer {
    type Ok = Value;
    type Error = EncodingError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), EncodingError>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_owned(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodingError> {
        Ok(Value::Object(self.map))
    }
}

struct StructVariantSerializer {
    variant: &'static str,
    map: Map,
}

impl ser::SerializeStructVariant for StructVariantSerializer {
    type Ok = Value;
    type Error = EncodingError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), EncodingError>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_owned(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, EncodingError> {
        let mut outer = Map::new();
        outer.insert(self.variant.to_owned(), Value::Object(self.map));
        Ok(Value::Object(outer))
    }
}

// ---------------------------------------------------------------------------
// Map keys
// ---------------------------------------------------------------------------

/// Accepts strings and scalars that print unambiguously as strings, the same
/// set `serde_json` accepts as object keys.
struct KeySerializer;

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = EncodingError;

    type SerializeSeq = Impossible<String, EncodingError>;
    type SerializeTuple = Impossible<String, EncodingError>;
    type SerializeTupleStruct = Impossible<String, EncodingError>;
    type SerializeTupleVariant = Impossible<String, EncodingError>;
    type SerializeMap = Impossible<String, EncodingError>;
    type SerializeStruct = Impossible<String, EncodingError>;
    type SerializeStructVariant = Impossible<String, EncodingError>;

    fn serialize_bool(self, v: bool) -> Result<String, EncodingError> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String, EncodingError> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String, EncodingError> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String, EncodingError> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String, EncodingError> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String, EncodingError> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String, EncodingError> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String, EncodingError> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String, EncodingError> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String, EncodingError> {
        Err(EncodingError::NonStringKey("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String, EncodingError> {
        Err(EncodingError::NonStringKey("float"))
    }

    fn serialize_char(self, v: char) -> Result<String, EncodingError> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String, EncodingError> {
        Ok(v.to_owned())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, EncodingError> {
        Err(EncodingError::NonStringKey("bytes"))
    }

    fn serialize_none(self) -> Result<String, EncodingError> {
        Err(EncodingError::NonStringKey("null"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<String, EncodingError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String, EncodingError> {
        Err(EncodingError::NonStringKey("null"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, EncodingError> {
        Err(EncodingError::NonStringKey("unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, EncodingError> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, EncodingError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, EncodingError>
    where
        T: ?Sized + Serialize,
    {
        Err(EncodingError::NonStringKey("enum variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, EncodingError> {
        Err(EncodingError::NonStringKey("array"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, EncodingError> {
        Err(EncodingError::NonStringKey("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, EncodingError> {
        Err(EncodingError::NonStringKey("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, EncodingError> {
        Err(EncodingError::NonStringKey("enum variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, EncodingError> {
        Err(EncodingError::NonStringKey("object"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, EncodingError> {
        Err(EncodingError::NonStringKey("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, EncodingError> {
        Err(EncodingError::NonStringKey("enum variant"))
    }
}
