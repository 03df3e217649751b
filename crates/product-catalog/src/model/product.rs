//! Product records and the request used to create them.
//!
//! # Persistence
//! Products are stored by a [`JsonFileRepository`](json_repository::JsonFileRepository)
//! as one JSON array with camelCase field names. Fields added after a file was
//! written (or written as `null`) fall back to their defaults when read.
//! Prices are JSON numbers carrying every digit of the [`Decimal`], never
//! rounded through a float.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Represents a product in the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Category,
    #[serde(default, deserialize_with = "null_as_default")]
    pub manufacture: Manufacture,
}

impl Product {
    /// Builds a product from a request, under an id chosen by the caller.
    pub fn from_request(id: impl Into<String>, request: ProductRequest) -> Self {
        Self {
            id: id.into(),
            name: request.name,
            price: request.price,
            category: request.category,
            manufacture: request.manufacture,
        }
    }

    /// True when `name` collides with this product's name, ignoring case and
    /// surrounding whitespace.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

/// DTO for product creation: a [`Product`] without its id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Category,
    #[serde(default, deserialize_with = "null_as_default")]
    pub manufacture: Manufacture,
}

impl ProductRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Category {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Manufacture {
    pub name: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
