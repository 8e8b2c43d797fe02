//! Test utilities for routing providers.
//!
//! Builders for OSRM-shaped JSON bodies, so mock servers in this crate and
//! in the CLI crate answer with the same wire format the real service uses.
//!
//! # Example
//!
//! ```
//! use tourgate_data::routing::test_support::{route_body, table_body};
//!
//! let table = table_body(&[vec![0.0, 12.0], vec![11.0, 0.0]]);
//! assert_eq!(table["code"], "Ok");
//! assert_eq!(table["distances"][0][1], 12.0);
//!
//! let route = route_body(&["poly0", "poly1"]);
//! assert_eq!(route["routes"][0]["legs"][1]["geometry"], "poly1");
//! ```

use serde_json::{Value, json};

/// A successful Table response carrying `rows` as the distance matrix.
#[must_use]
pub fn table_body(rows: &[Vec<f64>]) -> Value {
    json!({ "code": "Ok", "distances": rows })
}

/// A successful Table response where `rows` may contain unroutable pairs.
#[must_use]
pub fn sparse_table_body(rows: &[Vec<Option<f64>>]) -> Value {
    json!({ "code": "Ok", "distances": rows })
}

/// A successful Route response with one geometry per leg.
///
/// The overview geometry joins the leg geometries so fallbacks are visible
/// in assertions.
#[must_use]
pub fn route_body(legs: &[&str]) -> Value {
    let leg_values: Vec<Value> = legs.iter().map(|leg| json!({ "geometry": leg })).collect();
    json!({
        "code": "Ok",
        "routes": [{ "geometry": legs.concat(), "legs": leg_values }]
    })
}

/// A successful Route response whose legs carry no geometry.
#[must_use]
pub fn overview_only_body(overview: &str, leg_count: usize) -> Value {
    let legs: Vec<Value> = (0..leg_count).map(|_| json!({})).collect();
    json!({
        "code": "Ok",
        "routes": [{ "geometry": overview, "legs": legs }]
    })
}

/// An OSRM error body, e.g. `{"code": "NoRoute", "message": "..."}`.
#[must_use]
pub fn error_body(code: &str, message: &str) -> Value {
    json!({ "code": code, "message": message })
}
