//! Purpose: Regression coverage for parse-failure category mapping.
//! Exports: Integration tests only.
//! Role: Verify stable category labels used by structural error diagnostics.
//! Invariants: Category mapping remains deterministic for representative errors.
//! Invariants: Tests avoid payload leakage; assertions target category/hint text only.
//! Notes: Uses source include to exercise internal helper logic without widening API surface.

#[allow(dead_code)]
#[path = "../src/json/parse.rs"]
mod parse;

use parse::ParseFailureCategory;
use serde_json::Value;

#[test]
fn category_mapping_handles_syntax_eof_and_numeric_errors() {
    let syntax_err = serde_json::from_str::<Value>(r#"{"a":}"#).unwrap_err();
    assert_eq!(
        parse::categorize_error(&syntax_err),
        ParseFailureCategory::Syntax
    );

    let eof_err = serde_json::from_str::<Value>(r#"{"a":1"#).unwrap_err();
    assert_eq!(parse::categorize_error(&eof_err), ParseFailureCategory::Eof);

    let number_err = serde_json::from_str::<Value>(r#"{"n":1e400}"#).unwrap_err();
    assert_eq!(
        parse::categorize_error(&number_err),
        ParseFailureCategory::NumericRange
    );
}

#[test]
fn category_mapping_handles_depth_and_utf8_messages() {
    let depth = 256usize;
    let mut payload = String::with_capacity(depth * 2 + 1);
    for _ in 0..depth {
        payload.push('[');
    }
    payload.push('0');
    for _ in 0..depth {
        payload.push(']');
    }
    let depth_err = serde_json::from_str::<Value>(&payload).unwrap_err();
    assert_eq!(
        parse::categorize_error(&depth_err),
        ParseFailureCategory::DepthLimit
    );

    assert_eq!(
        parse::categorize_message("invalid unicode code point"),
        ParseFailureCategory::Utf8
    );
}

#[test]
fn hint_contains_category_and_context() {
    let err = serde_json::from_str::<Value>(r#"{"n":1e400}"#).unwrap_err();
    let hint = parse::hint_for_error(&err, "Address.City");
    assert!(hint.contains("parse category: numeric-range"));
    assert!(hint.contains("context: Address.City"));
}

#[test]
fn unknown_category_fallback_is_stable() {
    assert_eq!(
        parse::categorize_message("opaque parser issue"),
        ParseFailureCategory::Unknown
    );
}
