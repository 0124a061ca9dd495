//! Field deserializers for upstream bodies the pages must render even when a
//! field is `null` or has the wrong type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a field, falling back to `T::default()` for `null` or any value that
/// does not fit `T`.
///
/// # Errors
///
/// Only when the input is not valid JSON at all.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(raw).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "ignoring malformed upstream field");
        T::default()
    }))
}

/// Reads a list, keeping the elements that parse and dropping the rest. A
/// `null` or non-array value reads as an empty list.
///
/// # Errors
///
/// Only when the input is not valid JSON at all.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!(error = %e, "dropping malformed upstream list element");
                None
            }
        })
        .collect())
}
