//! Conversions between aggregation JSON, BSON and the value tree.

use anyhow::{Context, Result};
use mongodb::bson::{self, Bson, Document as BsonDocument};

use menudb_core::document::{Document, Value};

pub fn to_bson_pipeline(pipeline: &[serde_json::Value]) -> Result<Vec<BsonDocument>> {
    pipeline
        .iter()
        .enumerate()
        .map(|(i, stage)| bson::to_document(stage).with_context(|| format!("stage {i} is not a document")))
        .collect()
}

pub fn from_bson_document(doc: &BsonDocument) -> Document {
    doc.iter().map(|(k, v)| (k.clone(), from_bson(v))).collect()
}

pub fn from_bson(value: &Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::Int(i64::from(*i)),
        Bson::Int64(i) => Value::Int(*i),
        Bson::Double(d) => Value::Double(*d),
        Bson::String(s) => Value::String(s.clone()),
        Bson::ObjectId(oid) => Value::ObjectId(oid.to_hex()),
        Bson::Decimal128(d) => Value::Decimal(d.to_string()),
        Bson::DateTime(dt) => Value::DateTime(dt.timestamp_millis()),
        Bson::Array(items) => Value::Array(items.iter().map(from_bson).collect()),
        Bson::Document(doc) => Value::Object(from_bson_document(doc)),
        other => Value::String(other.to_string()),
    }
}
