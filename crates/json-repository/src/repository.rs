//! # FileRepository Trait
//!
//! The common interface over a JSON-file collection. It is implemented by the
//! direct [`JsonFileRepository`](crate::JsonFileRepository), by the
//! channel-backed [`RepositoryClient`](crate::RepositoryClient), and therefore
//! also by the test doubles in [`mock`](crate::mock). Services depend on this
//! trait rather than on a concrete storage type.
//!
//! Every method answers with a [`ResponseResult`] and takes a
//! [`CancellationToken`]; a cancelled token makes the operation give up at
//! the next await point.

use crate::record::{Predicate, Record};
use crate::response::ResponseResult;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait FileRepository<T: Record>: Send + Sync {
    /// Reads the whole collection, in file order.
    async fn read(&self, cancel: &CancellationToken) -> ResponseResult<Vec<T>>;

    /// Replaces the whole collection with `items`.
    async fn write(&self, items: Vec<T>, cancel: &CancellationToken) -> ResponseResult<()>;

    /// Replaces the first record matching `predicate` with `item`.
    ///
    /// Fails with 404 when the collection cannot be read or nothing matches.
    async fn update(
        &self,
        predicate: Predicate<T>,
        item: T,
        cancel: &CancellationToken,
    ) -> ResponseResult<()>;

    /// Removes every record matching `predicate` and returns how many went.
    ///
    /// Matching nothing is a success.
    async fn delete(&self, predicate: Predicate<T>, cancel: &CancellationToken)
        -> ResponseResult<usize>;
}
