//! Domain records and DTOs exchanged with the collection store and the UI.

pub mod book;
pub mod comment;
pub mod pagination;
pub mod stats;
pub mod user;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn default_true() -> bool {
    true
}

/// Treat an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Relations arrive either as a bare key or expanded as `{ "id": ... }`.
fn reference_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(mut map) => map.remove("id").and_then(reference_to_string),
        _ => None,
    }
}

fn reference_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(reference_to_string(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn opt_reference_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(reference_to_string(Value::deserialize(deserializer)?).filter(|s| !s.is_empty()))
}
