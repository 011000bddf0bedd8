//! JSON decoding helpers shared by the value objects.
//!
//! PHP is loose about scalar types: a port may come back as `3306` or
//! `"3306"`, an unset value as `null` or `false`. The string fields of
//! [`crate::Status`] and [`crate::Database`] accept any scalar.

use crate::error::{DrushError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode `bytes` as JSON, tagging failures with `what` was being decoded.
pub(crate) fn decode_json<T: DeserializeOwned>(what: &'static str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|source| DrushError::Decode { what, source })
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Deserialize any JSON scalar into a string; containers become empty.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(scalar_to_string)
}

/// Deserialize a list of scalars, a single scalar, or an object of scalars
/// into a list of strings.
pub(crate) fn lenient_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let strings = match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(scalar_to_string).collect(),
        Value::Object(map) => map.into_iter().map(|(_, v)| scalar_to_string(v)).collect(),
        Value::Null => Vec::new(),
        scalar => vec![scalar_to_string(scalar)],
    };
    Ok(strings)
}
