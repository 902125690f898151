//! Forgiving field decoders for the untrusted payload.
//!
//! A malformed sub-record decodes to `None` with a warning instead of failing
//! the whole payload, so one bad provider never hides the others.

use std::any::type_name;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

fn short_type_name<T>() -> &'static str {
    let name = type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

fn decode_or_drop<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!("Dropping malformed {}: {}", short_type_name::<T>(), e);
            None
        }
    }
}

/// Any sub-record; malformed becomes `None`
pub(crate) fn sub_record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(decode_or_drop))
}

/// A list whose malformed entries are dropped individually
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(entries)) => Ok(Some(
            entries.into_iter().filter_map(decode_or_drop).collect(),
        )),
        Some(other) => {
            warn!(
                "Dropping {} list that is not an array: {}",
                short_type_name::<T>(),
                other
            );
            Ok(None)
        }
    }
}

/// Error text; a non-string value still signals a failure
pub(crate) fn error_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(message)) => Some(message),
        Some(other) => Some(other.to_string()),
    })
}

/// Integer score; integral floats and numeric strings are accepted, other
/// fractional values are rounded
pub(crate) fn score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match &value {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => number.as_i64().or_else(|| number.as_f64().and_then(round)),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok().and_then(round),
        Some(_) => None,
    };
    if number.is_none() {
        if let Some(other) = value.filter(|v| !v.is_null()) {
            warn!("Ignoring unreadable score: {}", other);
        }
    }
    Ok(number)
}

fn round(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.round() as i64)
}

/// Concentration map; a non-numeric value counts as not reported
pub(crate) fn concentrations<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, Option<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(entries)) => Ok(Some(
            entries
                .into_iter()
                .map(|(code, value)| {
                    let concentration = value.as_f64();
                    if concentration.is_none() && !value.is_null() {
                        warn!("Ignoring non-numeric {} concentration: {}", code, value);
                    }
                    (code, concentration)
                })
                .collect(),
        )),
        Some(other) => {
            warn!("Dropping pollutant details that are not a map: {}", other);
            Ok(None)
        }
    }
}
