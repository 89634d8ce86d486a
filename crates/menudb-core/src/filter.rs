//! Structured product filters.
//!
//! A single predicate is produced in two placements: embedded inside a
//! similarity stage, or as a standalone `$match` after retrieval/fusion.
//! Both placements render the same MQL, so they select the same documents.

use serde_json::{json, Map, Value};

pub const AVAILABLE_PATH: &str = "product.available";
pub const PRICE_PATH: &str = "product.price.amount";
pub const RESTAURANT_PATH: &str = "restaurantName";

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `product.available == value`
    Available(bool),
    /// `product.price.amount < value`
    MaxPrice(f64),
    /// `restaurantName == value`
    Restaurant(String),
}

impl Condition {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Available(_) => AVAILABLE_PATH,
            Self::MaxPrice(_) => PRICE_PATH,
            Self::Restaurant(_) => RESTAURANT_PATH,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut clause = Map::new();
        let op = match self {
            Self::Available(v) => json!({ "$eq": v }),
            Self::MaxPrice(v) => json!({ "$lt": v }),
            Self::Restaurant(v) => json!({ "$eq": v }),
        };
        clause.insert(self.path().to_string(), op);
        Value::Object(clause)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterPredicate {
    Single(Condition),
    And(Vec<Condition>),
}

impl FilterPredicate {
    /// Conditions in their deterministic order.
    pub fn conditions(&self) -> &[Condition] {
        match self {
            Self::Single(c) => std::slice::from_ref(c),
            Self::And(cs) => cs,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Single(c) => c.to_json(),
            Self::And(cs) => json!({ "$and": cs.iter().map(Condition::to_json).collect::<Vec<_>>() }),
        }
    }
}

/// Both placements of the same predicate. `None` on both sides when no
/// constraint was requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterClauses {
    pub embedded: Option<FilterPredicate>,
    pub post_match: Option<FilterPredicate>,
}

impl FilterClauses {
    pub fn is_empty(&self) -> bool { self.embedded.is_none() && self.post_match.is_none() }
}

/// Compose the optional constraints. Conditions always appear in the order
/// available, max price, restaurant. `restaurant` must already be trimmed.
pub fn build_filter(available: Option<bool>, max_price: Option<f64>, restaurant: Option<&str>) -> FilterClauses {
    let mut conditions = Vec::with_capacity(3);
    if let Some(available) = available {
        conditions.push(Condition::Available(available));
    }
    if let Some(max_price) = max_price {
        conditions.push(Condition::MaxPrice(max_price));
    }
    if let Some(restaurant) = restaurant.filter(|r| !r.is_empty()) {
        conditions.push(Condition::Restaurant(restaurant.to_string()));
    }

    let predicate = match conditions.len() {
        0 => None,
        1 => conditions.pop().map(FilterPredicate::Single),
        _ => Some(FilterPredicate::And(conditions)),
    };
    FilterClauses { embedded: predicate.clone(), post_match: predicate }
}
