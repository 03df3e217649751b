//! Identifier generation.

use uuid::Uuid;

pub const PRODUCT_ID_PREFIX: &str = "pr-";

/// A random (v4) UUID in its hyphenated form.
pub fn guid() -> String {
    Uuid::new_v4().to_string()
}

/// A fresh product id: `prefix` (default `pr-`) followed by a [`guid`].
pub fn product_id(prefix: Option<&str>) -> String {
    format!("{}{}", prefix.unwrap_or(PRODUCT_ID_PREFIX), guid())
}
