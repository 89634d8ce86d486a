use pretty_assertions::assert_eq;
use serde_json::json;

use menudb_core::document::{Document, Value};
use menudb_core::sanitize::{sanitize, sanitize_result};

fn obj(pairs: Vec<(&str, Value)>) -> Value {
    Value::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

fn raw_document() -> Document {
    let Value::Object(doc) = obj(vec![
        ("_id", Value::ObjectId("665f1c2ab3e4d5f6a7b8c9d0".into())),
        ("restaurantName", Value::String("Pardos Chicken".into())),
        (
            "product",
            obj(vec![
                ("_id", Value::ObjectId("665f1c2ab3e4d5f6a7b8c9d1".into())),
                ("name", Value::String("Pollo a la brasa".into())),
                ("price", obj(vec![("amount", Value::Decimal("24.90".into())), ("currency", Value::String("PEN".into()))])),
                ("available", Value::Bool(true)),
            ]),
        ),
        ("title", Value::String("Menu Ejecutivo".into())),
        ("score", Value::Decimal("0.8731".into())),
    ]) else {
        unreachable!()
    };
    doc
}

#[test]
fn identifiers_become_strings_and_numbers_become_floats() {
    let raw = raw_document();
    let clean = sanitize(&raw);

    assert_eq!(clean["_id"], Value::String("665f1c2ab3e4d5f6a7b8c9d0".into()));
    assert_eq!(clean["score"], Value::Double(0.8731));
    let product = clean["product"].as_object().expect("product");
    assert_eq!(product["_id"], Value::String("665f1c2ab3e4d5f6a7b8c9d1".into()));
    let price = product["price"].as_object().expect("price");
    assert_eq!(price["amount"], Value::Double(24.90));
    assert_eq!(price["currency"], Value::String("PEN".into()));

    // input untouched
    assert_eq!(raw["_id"], Value::ObjectId("665f1c2ab3e4d5f6a7b8c9d0".into()));
}

#[test]
fn sanitizing_twice_changes_nothing() {
    let once = sanitize(&raw_document());
    let twice = sanitize(&once);
    assert_eq!(once, twice);
}

#[test]
fn uncoercible_fields_are_left_in_place() {
    let mut raw = raw_document();
    raw.insert("score".into(), Value::Decimal("not-a-number".into()));
    let clean = sanitize(&raw);
    assert_eq!(clean["score"], Value::Decimal("not-a-number".into()));

    raw.insert("product".into(), Value::String("legacy".into()));
    let clean = sanitize(&raw);
    assert_eq!(clean["product"], Value::String("legacy".into()));
}

#[test]
fn non_finite_decimals_keep_their_text() {
    let mut raw = raw_document();
    raw.insert("score".into(), Value::Decimal("Infinity".into()));
    if let Some(Value::Object(product)) = raw.get_mut("product") {
        product.insert("price".into(), obj(vec![("amount", Value::Decimal("NaN".into()))]));
    }
    raw.insert("scoreDetails".into(), obj(vec![("value", Value::Decimal("-Infinity".into()))]));

    let clean = sanitize(&raw);
    assert_eq!(clean["score"], Value::Decimal("Infinity".into()));
    assert_eq!(clean["scoreDetails"], obj(vec![("value", Value::String("-Infinity".into()))]));

    let rendered = serde_json::to_value(sanitize_result(&raw)).unwrap();
    assert_eq!(rendered["score"], json!("Infinity"));
    assert_eq!(rendered["product"]["price"]["amount"], json!("NaN"));
    assert_eq!(rendered["scoreDetails"]["value"], json!("-Infinity"));
}

#[test]
fn score_details_are_flattened_to_plain_json() {
    let mut raw = raw_document();
    raw.shift_remove("score");
    raw.insert(
        "scoreDetails".into(),
        obj(vec![
            ("value", Value::Decimal("9.5".into())),
            ("description", Value::String("the value calculated by combining the scores".into())),
            (
                "details",
                Value::Array(vec![
                    obj(vec![("inputPipelineName", Value::String("vectorPipeline".into())), ("value", Value::Double(0.9))]),
                    obj(vec![("inputPipelineName", Value::String("fullTextPipeline".into())), ("value", Value::Int(1))]),
                ]),
            ),
            ("ref", Value::ObjectId("abc123".into())),
        ]),
    );

    let result = sanitize_result(&raw);
    assert_eq!(result.score(), None);
    assert_eq!(
        result.score_details().cloned(),
        Some(json!({
            "value": 9.5,
            "description": "the value calculated by combining the scores",
            "details": [
                { "inputPipelineName": "vectorPipeline", "value": 0.9 },
                { "inputPipelineName": "fullTextPipeline", "value": 1 },
            ],
            "ref": "abc123",
        }))
    );
    assert_eq!(result.ranking_score(), Some(9.5));
}

#[test]
fn result_document_exposes_plain_fields() {
    let result = sanitize_result(&raw_document());
    assert_eq!(result.id(), Some("665f1c2ab3e4d5f6a7b8c9d0"));
    assert_eq!(result.restaurant_name(), Some("Pardos Chicken"));
    assert_eq!(result.title(), Some("Menu Ejecutivo"));
    assert_eq!(result.score(), Some(0.8731));
    let product = result.product().expect("product");
    assert_eq!(product["price"]["amount"], json!(24.90));
    assert_eq!(product["available"], json!(true));
}
