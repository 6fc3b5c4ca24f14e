//! Canonical instant decoded from loosely-typed wire timestamps.
//!
//! Backends serialize timestamps as bare numbers, numeric strings, or
//! `{ "_seconds": .. }` / `{ "seconds": .. }` objects. Decoding tries each
//! known shape in a fixed order and never fails: unrecognized input becomes
//! epoch zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Seconds since the Unix epoch. Always serialized as a bare float.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestamp {
    seconds: f64,
}

/// A single wire shape: returns epoch seconds when the value matches.
type ShapeMatcher = fn(&Value) -> Option<f64>;

/// Recognized wire shapes, first match wins.
const SHAPES: &[(&str, ShapeMatcher)] = &[
    ("float", bare_float),
    ("numeric_string", numeric_string),
    ("integer", bare_integer),
    ("object_float_seconds", object_float_seconds),
    ("object_integer_seconds", object_integer_seconds),
];

const SECONDS_KEYS: [&str; 2] = ["_seconds", "seconds"];

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp { seconds: 0.0 };

    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// True when decoding found no recognized shape (or the backend sent 0).
    pub fn is_epoch(&self) -> bool {
        self.seconds == 0.0
    }

    /// Decode any JSON value. Unrecognized shapes yield [`Timestamp::EPOCH`].
    pub fn from_value(value: &Value) -> Self {
        SHAPES
            .iter()
            .find_map(|(_, matcher)| matcher(value))
            .map(Self::from_seconds)
            .unwrap_or(Self::EPOCH)
    }

    /// UTC date-time, or `None` when the seconds fall outside chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let whole = self.seconds.floor();
        let nanos = ((self.seconds - whole) * 1_000_000_000.0).round() as u32;
        DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
    }
}

fn bare_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) if n.is_f64() => n.as_f64(),
        _ => None,
    }
}

fn numeric_string(value: &Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|s| s.is_finite())
}

fn bare_integer(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) if !n.is_f64() => n.as_i64().map(|i| i as f64).or_else(|| n.as_f64()),
        _ => None,
    }
}

fn seconds_field(value: &Value) -> Option<&Value> {
    let object = value.as_object()?;
    SECONDS_KEYS.iter().find_map(|key| object.get(*key))
}

fn object_float_seconds(value: &Value) -> Option<f64> {
    seconds_field(value).and_then(bare_float)
}

fn object_integer_seconds(value: &Value) -> Option<f64> {
    seconds_field(value).and_then(bare_integer)
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.seconds)
    }
}
