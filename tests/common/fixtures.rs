//! Test fixtures: paint set definitions and colors from the embedded catalog.

use serde_json::{json, Value};

/// Colors used across tests
pub mod colors {
    pub const RED: &str = "#FF0000";
    pub const YELLOW: &str = "#FFFF00";
    pub const BLUE: &str = "#0000FF";
    pub const OFF_WHITE: &str = "#F7F5EF";
    pub const DARK_BLUE: &str = "#3C5AC8";
}

/// Oil primaries of the studio brand: red 1, yellow 2, blue 3
pub fn studio_primaries() -> Value {
    json!({
        "medium": "oil",
        "brands": ["studio"],
        "colors": {"studio": [1, 2, 3]}
    })
}

/// A store-bought watercolor set
pub fn aqua_store_bought() -> Value {
    json!({
        "type": "watercolor",
        "storeBoughtPaintSet": {"brand": "aqua", "name": "Cotman 8"}
    })
}

/// A composition of studio oil paints
pub fn studio_mix(ids: &[u32], fractions: &[u8]) -> Value {
    let paints: Vec<Value> = ids
        .iter()
        .map(|id| json!({"brand": "studio", "id": id}))
        .collect();
    json!({"paints": paints, "fractions": fractions})
}
