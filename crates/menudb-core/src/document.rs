//! Loosely-typed documents as returned by the document store.
//!
//! The store hands back nested key/value structures whose leaves may be
//! store-native types (object ids, decimals, timestamps). They are kept in a
//! tagged tree so every exposed field can be coerced explicitly.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Number};

/// Ordered key/value document. Insertion order is preserved end to end.
pub type Document = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    /// Store-native identifier, kept as its hex text.
    ObjectId(String),
    /// Store-native decimal, kept as its canonical text.
    Decimal(String),
    /// Milliseconds since the Unix epoch.
    DateTime(i64),
    Array(Vec<Value>),
    Object(Document),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Document> {
        match self {
            Self::Object(doc) => Some(doc),
            _ => None,
        }
    }

    /// Render as JSON. Total: store-native leaves fall back to text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::Number((*i).into()),
            Self::Double(d) => Number::from_f64(*d).map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) | Self::ObjectId(s) => serde_json::Value::String(s.clone()),
            Self::Decimal(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map_or_else(|| serde_json::Value::String(text.clone()), serde_json::Value::Number),
            Self::DateTime(millis) => serde_json::Value::String(format_millis(*millis)),
            Self::Array(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(doc) => serde_json::Value::Object(document_to_json(doc)),
        }
    }

    /// Lift plain JSON into the tree. Integers stay integers.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => Self::Array(items.iter().map(Self::from_json).collect()),
            serde_json::Value::Object(map) => Self::Object(
                map.iter().map(|(k, v)| (k.clone(), Self::from_json(v))).collect(),
            ),
        }
    }
}

pub fn document_to_json(doc: &Document) -> Map<String, serde_json::Value> {
    doc.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map_or_else(|| millis.to_string(), |dt| dt.to_rfc3339())
}
