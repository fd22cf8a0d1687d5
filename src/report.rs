//! Purpose: Render an `Errors` list as a stable, structured JSON diagnostics document.
//! Exports: `report_json`, `error_json`.
//! Role: Shared contract helper for logging and API responses that surface decode failures.
//! Invariants: Field names are additive-only; kinds use the kebab-case labels of `ErrorKind`.
//! Invariants: Optional details (expected/got/category) appear only when set.
use serde_json::{Map, Value, json};

use crate::api::{Error, Errors};

pub fn report_json(errors: &Errors) -> Value {
    let items: Vec<Value> = errors.iter().map(error_json).collect();

    let mut outer = Map::new();
    let status = if errors.is_empty() { "ok" } else { "invalid" };
    outer.insert("status".to_string(), json!(status));
    outer.insert("count".to_string(), json!(errors.len()));
    outer.insert("summary".to_string(), json!(errors.summary()));
    outer.insert("errors".to_string(), Value::Array(items));
    Value::Object(outer)
}

pub fn error_json(error: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(error.kind().label()));
    inner.insert("path".to_string(), json!(error.path().unwrap_or("")));
    inner.insert("message".to_string(), json!(error.to_string()));
    if let Some(expected) = error.expected() {
        inner.insert("expected".to_string(), json!(expected));
    }
    if let Some(got) = error.got() {
        inner.insert("got".to_string(), json!(got));
    }
    if let Some(category) = error.category() {
        inner.insert("category".to_string(), json!(category.label()));
    }
    Value::Object(inner)
}

#[cfg(test)]
mod tests {
    use super::report_json;
    use crate::api::Errors;

    #[test]
    fn empty_report_is_ok() {
        let value = report_json(&Errors::new());
        assert_eq!(value.get("status").and_then(|v| v.as_str()), Some("ok"));
        assert_eq!(value.get("count").and_then(|v| v.as_u64()), Some(0));
        assert_eq!(
            value.get("summary").and_then(|v| v.as_str()),
            Some("no errors")
        );
        assert!(
            value
                .get("errors")
                .and_then(|v| v.as_array())
                .is_some_and(|items| items.is_empty())
        );
    }

    #[test]
    fn report_lists_each_error_with_details() {
        let errs = Errors::new()
            .with_required("FirstName")
            .with_invalid_type("age", "integer", "string");
        let value = report_json(&errs);
        assert_eq!(value.get("status").and_then(|v| v.as_str()), Some("invalid"));
        assert_eq!(value.get("count").and_then(|v| v.as_u64()), Some(2));

        let items = value
            .get("errors")
            .and_then(|v| v.as_array())
            .expect("errors array");
        assert_eq!(items[0].get("kind").and_then(|v| v.as_str()), Some("required"));
        assert_eq!(items[0].get("path").and_then(|v| v.as_str()), Some("FirstName"));
        assert!(items[0].get("expected").is_none());
        assert_eq!(
            items[1].get("kind").and_then(|v| v.as_str()),
            Some("invalid-type")
        );
        assert_eq!(items[1].get("expected").and_then(|v| v.as_str()), Some("integer"));
        assert_eq!(items[1].get("got").and_then(|v| v.as_str()), Some("string"));
    }
}
