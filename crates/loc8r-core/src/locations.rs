//! View models for the location pages.
//!
//! `LocationDetail` is deserialized straight from the upstream API body; its
//! `coords` field is normalized during deserialization so callers only ever see
//! `{lng, lat}` or nothing. Null or mistyped fields fall back to their defaults
//! so one bad value never costs the whole page.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::lenient::{lenient, lenient_list};

/// A distance in meters as the upstream API reports it: a JSON number or a
/// numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Distance {
    Meters(f64),
    Text(String),
}

impl Distance {
    /// The distance in meters. Strings are read like `parseFloat`: the longest
    /// numeric prefix after leading whitespace, or NaN when there is none.
    #[must_use]
    pub fn meters(&self) -> f64 {
        match self {
            Distance::Meters(m) => *m,
            Distance::Text(raw) => parse_float_prefix(raw),
        }
    }
}

impl From<f64> for Distance {
    fn from(value: f64) -> Self {
        Distance::Meters(value)
    }
}

impl From<&str> for Distance {
    fn from(value: &str) -> Self {
        Distance::Text(value.to_owned())
    }
}

impl From<String> for Distance {
    fn from(value: String) -> Self {
        Distance::Text(value)
    }
}

/// Reads the longest `parseFloat`-style prefix: an optional sign, then either
/// `Infinity` or digits with an optional fraction and exponent.
fn parse_float_prefix(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Formats a distance for the list page.
///
/// Anything above 1000 m is shown in kilometres with exactly one decimal place,
/// halves rounding away from zero (`1500` → `"1.5km"`, `1250` → `"1.3km"`,
/// `1000000` → `"1000.0km"`). Everything else is floored to whole meters
/// (`999.9` → `"999m"`, `1000` → `"1000m"`).
#[must_use]
pub fn format_distance(distance: impl Into<Distance>) -> String {
    let meters = distance.into().meters();
    if meters > 1000.0 {
        format!("{}km", one_decimal_place(meters / 1000.0))
    } else if meters.is_infinite() {
        "-Infinitym".to_string()
    } else {
        // `+ 0.0` folds -0 into 0 so small negative fractions never print "-0m".
        format!("{}m", meters.floor() + 0.0)
    }
}

/// Rounds the exact binary value of `km` to one place, ties away from zero.
fn one_decimal_place(km: f64) -> String {
    if km.is_infinite() {
        return "Infinity".to_string();
    }
    match Decimal::from_f64_retain(km) {
        Some(exact) => {
            let mut rounded =
                exact.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(1);
            rounded.to_string()
        }
        None => format!("{km:.1}"),
    }
}

/// A point as the pages consume it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lng: f64,
    pub lat: f64,
}

/// Normalizes an upstream `coords` value.
///
/// Accepts a GeoJSON point (`{"type": "Point", "coordinates": [lng, lat]}`),
/// a bare `[lng, lat]` pair, or an already-normalized `{lng, lat}` object.
/// Any other shape yields `None`.
#[must_use]
pub fn normalize_coords(raw: &Value) -> Option<Coords> {
    match raw {
        Value::Array(pair) => coords_from_pair(pair),
        Value::Object(obj) => {
            if obj.get("type").and_then(Value::as_str) == Some("Point") {
                obj.get("coordinates")
                    .and_then(Value::as_array)
                    .and_then(|pair| coords_from_pair(pair))
            } else {
                let lng = obj.get("lng").and_then(Value::as_f64)?;
                let lat = obj.get("lat").and_then(Value::as_f64)?;
                Some(Coords { lng, lat })
            }
        }
        _ => None,
    }
}

fn coords_from_pair(pair: &[Value]) -> Option<Coords> {
    match pair {
        [lng, lat, ..] => Some(Coords {
            lng: lng.as_f64()?,
            lat: lat.as_f64()?,
        }),
        _ => None,
    }
}

fn deserialize_coords<'de, D>(deserializer: D) -> Result<Option<Coords>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let coords = normalize_coords(&raw);
    if coords.is_none() && !raw.is_null() {
        tracing::debug!(coords = %raw, "dropping unrecognized coords shape");
    }
    Ok(coords)
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(raw
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// One row on the home list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub id: String,
    pub name: String,
    pub address: String,
    pub rating: f64,
    pub facilities: Vec<String>,
    pub distance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: f64,
    #[serde(rename = "reviewText", default, deserialize_with = "lenient")]
    pub review_text: String,
    #[serde(
        rename = "createdOn",
        default,
        deserialize_with = "deserialize_timestamp"
    )]
    pub created_on: Option<DateTime<Utc>>,
}

impl Review {
    /// Review date as shown under each review, e.g. `16 February 2017`.
    #[must_use]
    pub fn created_on_display(&self) -> Option<String> {
        self.created_on
            .map(|dt| dt.format("%-d %B %Y").to_string())
    }
}

/// A single location as returned by `GET /api/locations/{id}`.
///
/// Fields the pages do not use directly (opening times and the like) are kept
/// in `extra` so nothing from the upstream body is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDetail {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: f64,
    #[serde(default, deserialize_with = "lenient_list")]
    pub facilities: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_coords")]
    pub coords: Option<Coords>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub reviews: Vec<Review>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[path = "locations_test.rs"]
mod tests;
