//! # JSON Repository
//!
//! This crate persists a homogeneous collection of records as one JSON array in
//! a single file, and exposes it through a uniform, non-panicking API.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Storage Layer** ([`JsonFileRepository`]) - Reads and atomically rewrites the file
//! 2. **Runtime Layer** ([`RepositoryActor`]) - Owns the storage and processes requests one at a time
//! 3. **Interface Layer** ([`RepositoryClient`]) - Cloneable handle that sends requests to the actor
//!
//! All three meet at the [`FileRepository`] trait, so code written against the
//! trait runs unchanged on the direct repository, on the actor client, or on
//! the [`mock`] test doubles.
//!
//! ## The Result Envelope
//!
//! Operations never panic and never return a bare error. Each one answers with
//! a [`ResponseResult`] carrying a success flag, a [`StatusCode`], an optional
//! message, and an optional payload:
//!
//! | Situation | Status |
//! |-----------|--------|
//! | Success | 200 |
//! | Update target missing, or file unreadable before update/delete | 404 |
//! | Other I/O or serialization fault, cancellation | 500 |
//!
//! ## Example
//!
//! ```rust
//! use json_repository::{FileRepository, JsonFileRepository, RepositoryActor};
//! use serde::{Deserialize, Serialize};
//! use tokio_util::sync::CancellationToken;
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Item {
//!     id: u32,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let dir = std::env::temp_dir().join("json-repository-example");
//!     let repository = JsonFileRepository::<Item>::in_dir(&dir, "items.json").unwrap();
//!     let (actor, client) = RepositoryActor::new(repository, 16);
//!     let handle = tokio::spawn(actor.run());
//!
//!     let cancel = CancellationToken::new();
//!     let items = vec![
//!         Item { id: 1, name: "Alice".into() },
//!         Item { id: 2, name: "Bob".into() },
//!     ];
//!     assert!(client.write(items, &cancel).await.success);
//!
//!     let bobby = Item { id: 2, name: "Bobby".into() };
//!     let updated = client.update(Box::new(|i: &Item| i.id == 2), bobby, &cancel).await;
//!     assert!(updated.success);
//!
//!     let removed = client.delete(Box::new(|i: &Item| i.id == 1), &cancel).await;
//!     assert_eq!(removed.content, Some(1));
//!
//!     let all = client.read(&cancel).await.content.unwrap();
//!     assert_eq!(all, vec![Item { id: 2, name: "Bobby".into() }]);
//!
//!     drop(client);
//!     handle.await.unwrap();
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - The actor runs in its own Tokio task and handles its mailbox **sequentially**
//! - Every clone of a client shares that mailbox, so read-modify-write cycles never overlap
//! - Separate processes sharing a file are not coordinated; the last writer wins
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockRepository`](mock::MockRepository), a fluent
//! expectation-based double, plus raw helpers for inspecting individual requests.

pub mod actor;
pub mod client;
pub mod error;
pub mod file;
pub mod message;
pub mod mock;
pub mod record;
pub mod repository;
pub mod response;

// Re-export core types for convenience
pub use actor::RepositoryActor;
pub use client::RepositoryClient;
pub use error::RepositoryError;
pub use file::JsonFileRepository;
pub use message::{RepositoryRequest, Responder};
pub use record::{Predicate, Record};
pub use repository::FileRepository;
pub use response::{Failure, ResponseResult, StatusCode, StatusError};
