//! Assertion helpers for tests.

use pretty_assertions::assert_eq;
use serde_json::Value;

use artist_assist::api::Response;

/// Assert the request succeeded and return its result
pub fn assert_ok(response: &Response) -> Value {
    assert!(
        response.error.is_none(),
        "Expected success, got error {:?}",
        response.error
    );
    response.result.clone().unwrap_or(Value::Null)
}

/// Assert the request failed with the given error kind
pub fn assert_error_kind(response: &Response, kind: &str) {
    let error = response
        .error
        .as_ref()
        .unwrap_or_else(|| panic!("Expected {kind} error, got result {:?}", response.result));
    assert_eq!(error.kind, kind, "message: {}", error.message);
    assert!(response.result.is_none());
}

/// Assert a hex color string is well formed (`#RRGGBB`, upper case)
pub fn assert_hex_color(value: &Value) {
    let hex = value.as_str().expect("color should be a string");
    assert_eq!(hex.len(), 7, "bad color {hex}");
    assert!(hex.starts_with('#'), "bad color {hex}");
    assert!(
        hex[1..].chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)),
        "bad color {hex}"
    );
}
