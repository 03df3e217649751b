//! # Record Trait
//!
//! The `Record` trait is the contract a type must satisfy to be stored by the
//! repository. The repository never looks inside a record: it only needs to
//! serialize it, deserialize it, clone it and move it between tasks. Selection
//! of individual records happens through caller-supplied predicates.
//!
//! The trait is blanket-implemented, so any suitable serde type is a record:
//!
//! ```rust
//! use json_repository::Record;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Note {
//!     id: u32,
//!     body_text: String,
//! }
//!
//! fn assert_record<T: Record>() {}
//! assert_record::<Note>();
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A homogeneous item persisted by a [`JsonFileRepository`](crate::JsonFileRepository).
///
/// Field casing on the wire is the record's own business; types meant for the
/// catalog file use `#[serde(rename_all = "camelCase")]`.
pub trait Record: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {}

impl<T> Record for T where
    T: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static
{
}

/// Selects records for update and delete.
///
/// Boxed so it can travel inside a [`RepositoryRequest`](crate::RepositoryRequest).
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
