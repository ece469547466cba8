//! The canonical byte writer.
//!
//! Rules, applied at every nesting level:
//!
//! - object keys in ascending code-point order (guaranteed by [`Map`]);
//! - `,` and `:` as the only separators, no whitespace;
//! - integers in plain decimal;
//! - floats holding an exact integer are written as that integer, digit for
//!   digit, so `1e16` and `10000000000000000` encode the same;
//! - other floats use the shortest form that round-trips;
//! - strings are UTF-8 with `serde_json`'s escaping, non-ASCII written raw;
//! - `null` is always written out, never dropped.

use serde::Serialize;

use super::ser::to_value;
use super::value::{Map, Value};
use super::EncodingError;

/// 2^127. Integral floats below this magnitude fit an `i128` exactly.
const I128_FLOAT_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Encodes a [`Value`] as a canonical JSON string.
pub fn to_canonical_string(value: &Value) -> Result<String, EncodingError> {
    let mut out = String::with_capacity(256);
    write_value(&mut out, value)?;
    Ok(out)
}

/// Encodes a [`Value`] as canonical UTF-8 bytes.
pub fn to_canonical_bytes(value: &Value) -> Result<Vec<u8>, EncodingError> {
    to_canonical_string(value).map(String::into_bytes)
}

/// Lowers any `Serialize` type through [`to_value`] and encodes it.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use tessera_driver::codec::encode;
///
/// let mut pairs = HashMap::new();
/// pairs.insert("lastname", "Smith");
/// pairs.insert("firstname", "John");
///
/// let bytes = encode(&pairs).unwrap();
/// assert_eq!(bytes, br#"{"firstname":"John","lastname":"Smith"}"#);
/// ```
pub fn encode<T>(value: &T) -> Result<Vec<u8>, EncodingError>
where
    T: ?Sized + Serialize,
{
    to_canonical_bytes(&to_value(value)?)
}

fn write_value(out: &mut String, value: &Value) -> Result<(), EncodingError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::UInt(n) => out.push_str(&n.to_string()),
        Value::Float(f) => write_float(out, *f)?,
        Value::String(s) => write_string(out, s)?,
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item)?;
            }
            out.push(']');
        }
        Value::Object(map) => write_object(out, map)?,
    }
    Ok(())
}

fn write_object(out: &mut String, map: &Map) -> Result<(), EncodingError> {
    out.push('{');
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(out, key)?;
        out.push(':');
        write_value(out, value)?;
    }
    out.push('}');
    Ok(())
}

fn write_float(out: &mut String, f: f64) -> Result<(), EncodingError> {
    if !f.is_finite() {
        return Err(EncodingError::NonFiniteNumber(f));
    }
    if f.fract() == 0.0 {
        if f.abs() < I128_FLOAT_BOUND {
            // Also folds -0.0 into 0.
            out.push_str(&(f as i128).to_string());
        } else {
            // `Display` for f64 never switches to exponent notation.
            out.push_str(&format!("{}", f));
        }
        return Ok(());
    }
    let number = serde_json::Number::from_f64(f).ok_or(EncodingError::NonFiniteNumber(f))?;
    out.push_str(&number.to_string());
    Ok(())
}

fn write_string(out: &mut String, s: &str) -> Result<(), EncodingError> {
    let quoted =
        serde_json::to_string(s).map_err(|e| EncodingError::Unsupported(e.to_string()))?;
    out.push_str(&quoted);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(json: &str) -> String {
        let value: Value = serde_json::from_str(json).unwrap();
        to_canonical_string(&value).unwrap()
    }

    #[test]
    fn keys_are_sorted_at_every_level() {
        assert_eq!(
            canon(r#"{"z":1,"a":{"y":true,"b":null},"m":[{"d":1,"c":2}]}"#),
            r#"{"a":{"b":null,"y":true},"m":[{"c":2,"d":1}],"z":1}"#
        );
    }

    #[test]
    fn keys_sort_by_code_point_not_locale() {
        // 'Z' (0x5A) < '_' (0x5F) < 'a' (0x61) < 'é' (0xE9)
        assert_eq!(
            canon(r#"{"é":1,"a":2,"_":3,"Z":4}"#),
            r#"{"Z":4,"_":3,"a":2,"é":1}"#
        );
    }

    #[test]
    fn whitespace_is_dropped() {
        assert_eq!(canon("{ \"a\" : [ 1 , 2 ] }"), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn integral_floats_print_as_integers() {
        assert_eq!(to_canonical_string(&Value::Float(1.0)).unwrap(), "1");
        assert_eq!(to_canonical_string(&Value::Float(-0.0)).unwrap(), "0");
        assert_eq!(to_canonical_string(&Value::Float(250.0)).unwrap(), "250");
    }

    #[test]
    fn large_integral_floats_match_integer_spelling() {
        let two_pow_53 = 9_007_199_254_740_992u64;
        assert_eq!(
            to_canonical_string(&Value::Float(two_pow_53 as f64)).unwrap(),
            to_canonical_string(&Value::UInt(two_pow_53)).unwrap()
        );
        assert_eq!(
            to_canonical_string(&Value::Float(1e16)).unwrap(),
            to_canonical_string(&Value::UInt(10_000_000_000_000_000)).unwrap()
        );
        assert_eq!(
            to_canonical_string(&Value::Float(i64::MIN as f64)).unwrap(),
            to_canonical_string(&Value::Int(i64::MIN)).unwrap()
        );
        // 2^64, one past u64::MAX.
        assert_eq!(
            to_canonical_string(&Value::Float(u64::MAX as f64)).unwrap(),
            "18446744073709551616"
        );
    }

    #[test]
    fn huge_integral_floats_have_no_exponent() {
        let out = to_canonical_string(&Value::Float(1e300)).unwrap();
        assert!(out.starts_with('1'));
        assert_eq!(out.len(), 301);
        assert!(out[1..].bytes().all(|b| b == b'0'));
    }

    #[test]
    fn equal_contents_encode_equal_across_number_types() {
        use crate::model::Content;
        let from_float = Content::new().with("n", 1e16f64);
        let from_int = Content::new().with("n", 10_000_000_000_000_000u64);
        assert_eq!(
            from_float.canonical_bytes().unwrap(),
            from_int.canonical_bytes().unwrap()
        );
    }

    #[test]
    fn fractional_floats_use_shortest_form() {
        assert_eq!(to_canonical_string(&Value::Float(0.1)).unwrap(), "0.1");
        assert_eq!(to_canonical_string(&Value::Float(2.50)).unwrap(), "2.5");
    }

    #[test]
    fn same_number_same_bytes_regardless_of_source_type() {
        let from_int = to_canonical_string(&Value::from(3u8)).unwrap();
        let from_float = to_canonical_string(&Value::from(3.0f32)).unwrap();
        assert_eq!(from_int, from_float);
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                to_canonical_string(&Value::Float(f)),
                Err(EncodingError::NonFiniteNumber(_))
            ));
        }
    }

    #[test]
    fn strings_are_escaped() {
        let value = Value::from("quote\" backslash\\ newline\n tab\t bell\u{07} é");
        assert_eq!(
            to_canonical_string(&value).unwrap(),
            r#""quote\" backslash\\ newline\n tab\t bell\u0007 é""#
        );
    }

    #[test]
    fn escaping_matches_serde_json_for_plain_strings() {
        let s = "line1\nline2 \"quoted\" \\ ünïcödé";
        assert_eq!(
            to_canonical_string(&Value::from(s)).unwrap(),
            serde_json::to_string(s).unwrap()
        );
    }

    #[test]
    fn null_is_written_explicitly() {
        assert_eq!(canon(r#"{"metadata":null}"#), r#"{"metadata":null}"#);
    }

    #[test]
    fn empty_containers() {
        assert_eq!(canon("{}"), "{}");
        assert_eq!(canon("[]"), "[]");
    }
}
