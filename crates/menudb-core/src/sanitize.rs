//! Normalize raw store documents into the stable output contract.
//!
//! Sanitizing never fails: a field that cannot be coerced is left as it was.
//! The input is never mutated, and sanitizing a sanitized document is a
//! no-op.

use crate::document::{Document, Value};
use crate::types::ResultDocument;

const ID: &str = "_id";
const PRODUCT: &str = "product";
const PRICE: &str = "price";
const AMOUNT: &str = "amount";
const SCORE: &str = "score";
const SCORE_DETAILS: &str = "scoreDetails";

pub fn sanitize(raw: &Document) -> Document {
    let mut doc = raw.clone();

    if let Some(id) = doc.get_mut(ID) {
        *id = stringify_id(id);
    }
    if let Some(score) = doc.get_mut(SCORE) {
        *score = coerce_f64(score);
    }
    if let Some(Value::Object(product)) = doc.get_mut(PRODUCT) {
        if let Some(id) = product.get_mut(ID) {
            *id = stringify_id(id);
        }
        if let Some(Value::Object(price)) = product.get_mut(PRICE) {
            if let Some(amount) = price.get_mut(AMOUNT) {
                *amount = coerce_f64(amount);
            }
        }
    }
    if let Some(details) = doc.get_mut(SCORE_DETAILS) {
        *details = to_plain(details);
    }
    doc
}

/// Sanitize and render for output.
pub fn sanitize_result(raw: &Document) -> ResultDocument {
    ResultDocument::from(&sanitize(raw))
}

fn stringify_id(value: &Value) -> Value {
    match value {
        Value::ObjectId(hex) => Value::String(hex.clone()),
        Value::Int(i) => Value::String(i.to_string()),
        Value::Decimal(text) => Value::String(text.clone()),
        other => other.clone(),
    }
}

fn coerce_f64(value: &Value) -> Value {
    match value {
        #[allow(clippy::cast_precision_loss)]
        Value::Int(i) => Value::Double(*i as f64),
        Value::Decimal(text) => match finite(text) {
            Some(f) => Value::Double(f),
            None => value.clone(),
        },
        other => other.clone(),
    }
}

/// Rebuild a nested structure from JSON-safe leaves only, keeping key and
/// element order.
fn to_plain(value: &Value) -> Value {
    match value {
        Value::ObjectId(hex) => Value::String(hex.clone()),
        Value::Decimal(text) => match finite(text) {
            Some(f) => Value::Double(f),
            None => Value::String(text.clone()),
        },
        Value::DateTime(_) => match value.to_json() {
            serde_json::Value::String(s) => Value::String(s),
            other => Value::from_json(&other),
        },
        Value::Array(items) => Value::Array(items.iter().map(to_plain).collect()),
        Value::Object(doc) => Value::Object(doc.iter().map(|(k, v)| (k.clone(), to_plain(v))).collect()),
        other => other.clone(),
    }
}

/// `NaN` and infinities parse but have no JSON number form.
fn finite(text: &str) -> Option<f64> { text.trim().parse::<f64>().ok().filter(|f| f.is_finite()) }
