//! Purpose: Encode fully populated records with serde and decode them back strictly.
//! Exports: Integration tests only.
//! Role: Guard that anything the serde encoder emits for a record is accepted unchanged.
//! Invariants: Optional fields that are unset are skipped on encode (absent, not null).
//! Notes: Uses `report_json` to show failures in a stable form.

use std::collections::BTreeMap;

use serde::Serialize;
use strictjson::Strict;
use strictjson::api::decode;
use strictjson::report::report_json;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Strict)]
struct Order {
    id: u64,
    customer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    lines: Vec<Line>,
    #[serde(rename = "shipTo")]
    #[strict(rename = "shipTo")]
    ship_to: Destination,
    #[strict(omit_empty)]
    attributes: BTreeMap<String, String>,
    total: f64,
    paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    discount: Option<Box<Discount>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Strict)]
struct Line {
    sku: String,
    quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    gift: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Strict)]
struct Destination {
    city: String,
    #[serde(rename = "postalCode", skip_serializing_if = "Option::is_none")]
    #[strict(rename = "postalCode")]
    postal_code: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Strict)]
struct Discount {
    code: String,
    percent: i16,
}

fn round_trip(order: &Order) {
    let bytes = serde_json::to_vec(order).expect("encode");
    let mut decoded = Order::default();
    let errs = decode(&bytes, &mut decoded);
    assert!(errs.is_empty(), "{}", report_json(&errs));
    assert_eq!(&decoded, order);
}

fn sample() -> Order {
    let mut attributes = BTreeMap::new();
    attributes.insert("channel".to_string(), "web".to_string());
    Order {
        id: 42,
        customer: "Ada".to_string(),
        note: Some("leave at door".to_string()),
        lines: vec![
            Line {
                sku: "A-1".to_string(),
                quantity: 2,
                gift: Some(true),
            },
            Line {
                sku: "B-7".to_string(),
                quantity: 1,
                gift: None,
            },
        ],
        ship_to: Destination {
            city: "Lisbon".to_string(),
            postal_code: Some("1100-148".to_string()),
        },
        attributes,
        total: 129.5,
        paid: true,
        discount: Some(Box::new(Discount {
            code: "SPRING".to_string(),
            percent: -15,
        })),
    }
}

#[test]
fn fully_populated_record_round_trips() {
    round_trip(&sample());
}

#[test]
fn record_with_unset_optionals_round_trips() {
    let mut order = sample();
    order.note = None;
    order.discount = None;
    order.ship_to.postal_code = None;
    order.attributes.clear();
    for line in &mut order.lines {
        line.gift = None;
    }
    round_trip(&order);
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Strict)]
struct Shelf {
    slots: Vec<Option<Line>>,
    counts: BTreeMap<String, Option<u32>>,
}

#[test]
fn none_elements_round_trip_as_none() {
    let mut counts = BTreeMap::new();
    counts.insert("A-1".to_string(), Some(3));
    counts.insert("B-7".to_string(), None);
    let shelf = Shelf {
        slots: vec![
            None,
            Some(Line {
                sku: "A-1".to_string(),
                quantity: 3,
                gift: None,
            }),
            None,
        ],
        counts,
    };

    let bytes = serde_json::to_vec(&shelf).expect("encode");
    let mut decoded = Shelf::default();
    let errs = decode(&bytes, &mut decoded);
    assert!(errs.is_empty(), "{}", report_json(&errs));
    assert_eq!(decoded, shelf);
}

#[test]
fn extra_key_after_encode_is_rejected() {
    let mut value = serde_json::to_value(sample()).expect("encode");
    value
        .as_object_mut()
        .expect("object")
        .insert("coupon".to_string(), serde_json::json!("X"));
    let bytes = serde_json::to_vec(&value).expect("encode");

    let mut decoded = Order::default();
    let errs = decode(&bytes, &mut decoded);
    let report = report_json(&errs);
    assert_eq!(report.get("count").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(
        report["errors"][0].get("path").and_then(|v| v.as_str()),
        Some("coupon")
    );
}
