//! Data structures for the catalog.

pub mod product;

pub use product::{Category, Manufacture, Product, ProductRequest};
