//! # Product Catalog Library
//!
//! Creates, lists, updates, and deletes products persisted as a JSON array in
//! a single file. This library exposes the core modules of the application for
//! the console binary and for integration testing.
//!
//! - [`model`] - [`Product`](model::Product) and [`ProductRequest`](model::ProductRequest)
//! - [`product_service`] - The cache, uniqueness rules, and cancellation
//! - [`validators`] / [`id`] - Pure helpers for names, prices, and product ids
//! - [`config`] - Environment-driven settings
//! - [`lifecycle`] - Starting and stopping the repository actor, tracing setup

pub mod config;
pub mod id;
pub mod lifecycle;
pub mod model;
pub mod product_service;
pub mod validators;
