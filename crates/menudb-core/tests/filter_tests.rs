use serde_json::json;

use menudb_core::filter::{build_filter, Condition, FilterPredicate};

#[test]
fn no_constraints_yield_no_filter() {
    let clauses = build_filter(None, None, None);
    assert!(clauses.embedded.is_none());
    assert!(clauses.post_match.is_none());
    assert!(clauses.is_empty());
}

#[test]
fn every_subset_composes_in_fixed_order() {
    let availables = [None, Some(true)];
    let prices = [None, Some(12.5)];
    let restaurants = [None, Some("La Lucha")];

    for available in availables {
        for price in prices {
            for restaurant in restaurants {
                let clauses = build_filter(available, price, restaurant);
                let mut expected = Vec::new();
                if let Some(a) = available { expected.push(Condition::Available(a)); }
                if let Some(p) = price { expected.push(Condition::MaxPrice(p)); }
                if let Some(r) = restaurant { expected.push(Condition::Restaurant(r.to_string())); }

                match expected.len() {
                    0 => assert!(clauses.is_empty()),
                    1 => assert_eq!(clauses.embedded, Some(FilterPredicate::Single(expected[0].clone()))),
                    _ => assert_eq!(clauses.embedded, Some(FilterPredicate::And(expected.clone()))),
                }
                assert_eq!(clauses.embedded, clauses.post_match, "both placements carry the same predicate");
            }
        }
    }
}

#[test]
fn single_condition_renders_bare() {
    let clauses = build_filter(Some(false), None, None);
    let predicate = clauses.post_match.expect("predicate");
    assert_eq!(predicate.to_json(), json!({ "product.available": { "$eq": false } }));
}

#[test]
fn multiple_conditions_render_as_conjunction() {
    let clauses = build_filter(Some(true), Some(20.0), Some("Pardos"));
    let predicate = clauses.embedded.expect("predicate");
    assert_eq!(
        predicate.to_json(),
        json!({ "$and": [
            { "product.available": { "$eq": true } },
            { "product.price.amount": { "$lt": 20.0 } },
            { "restaurantName": { "$eq": "Pardos" } },
        ]})
    );
    assert_eq!(predicate.conditions().len(), 3);
}

#[test]
fn empty_restaurant_is_ignored() {
    assert!(build_filter(None, None, Some("")).is_empty());
}
