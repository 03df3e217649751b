//! # JSON File Repository
//!
//! This module defines [`JsonFileRepository`], the component that actually
//! touches the disk. It stores an ordered collection of records as one
//! pretty-printed JSON array.
//!
//! ## Operations
//!
//! * **Read**: loads and deserializes the whole file. An empty or missing file
//!   is an empty collection.
//! * **Write**: serializes the collection to a uniquely named temporary file in
//!   the same directory and renames it over the target, so a reader sees
//!   either the old array or the new one.
//! * **Update**: read, replace the first match, rewrite.
//! * **Delete**: read, drop every match, rewrite (skipped when nothing matched).
//!
//! ## Cancellation
//!
//! The token is honored up to the moment a rewrite starts. Once the temporary
//! file is being written the operation runs to completion, so an operation
//! reported as cancelled has never changed the file.
//!
//! ## Concurrency
//!
//! Update and delete are read-modify-write cycles with no lock around them.
//! Two callers driving the same file directly can interleave and one change is
//! lost. Use the repository from a single writer, or put it behind a
//! [`RepositoryActor`](crate::RepositoryActor), which runs requests one at a
//! time.

use crate::error::RepositoryError;
use crate::record::{Predicate, Record};
use crate::repository::FileRepository;
use crate::response::{ResponseResult, StatusError};
use async_trait::async_trait;
use std::future::Future;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const EMPTY_COLLECTION: &str = "[]";

/// A collection of `T` persisted as a JSON array in a single file.
pub struct JsonFileRepository<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for JsonFileRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileRepository")
            .field("path", &self.path)
            .finish()
    }
}

impl<T: Record> JsonFileRepository<T> {
    /// Opens the repository at `path`, creating the parent directory and an
    /// empty array if the file does not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        Self::ensure_initialized(&path)?;
        Ok(Self {
            path,
            _record: PhantomData,
        })
    }

    /// Opens `file_name` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, file_name: &str) -> Result<Self, RepositoryError> {
        Self::new(dir.as_ref().join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the parent directory and seeds the file with `[]` when absent.
    pub fn ensure_initialized(path: &Path) -> Result<(), RepositoryError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        if !path.exists() {
            std::fs::write(path, EMPTY_COLLECTION)?;
            info!(path = %path.display(), "Initialized data file");
        }
        Ok(())
    }

    async fn read_items(&self) -> Result<Vec<T>, RepositoryError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_items(&self, items: &[T]) -> Result<(), RepositoryError> {
        let json = serde_json::to_vec_pretty(items)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, &json))
            .await
            .map_err(|e| RepositoryError::Io(std::io::Error::other(e)))?
    }

    /// Writes `items` unless `cancel` has already fired. Never interrupted once begun.
    async fn write_unless_cancelled(
        &self,
        items: &[T],
        cancel: &CancellationToken,
    ) -> Result<(), RepositoryError> {
        ensure_live(cancel)?;
        self.write_items(items).await
    }

    /// Reads the collection ahead of a rewrite. A read fault here is reported
    /// as "not found" rather than as an internal error.
    async fn read_for_rewrite(&self) -> Result<Vec<T>, RepositoryError> {
        self.read_items()
            .await
            .map_err(|e| RepositoryError::Unreadable(e.to_string()))
    }

    async fn update_item(
        &self,
        predicate: Predicate<T>,
        item: T,
        cancel: &CancellationToken,
    ) -> Result<(), RepositoryError> {
        let mut items = cancellable(cancel, self.read_for_rewrite()).await?;
        let index = items
            .iter()
            .position(|candidate| predicate(candidate))
            .ok_or(RepositoryError::ItemNotFound)?;
        items[index] = item;
        self.write_unless_cancelled(&items, cancel).await
    }

    async fn delete_items(
        &self,
        predicate: Predicate<T>,
        cancel: &CancellationToken,
    ) -> Result<usize, RepositoryError> {
        let mut items = cancellable(cancel, self.read_for_rewrite()).await?;
        let before = items.len();
        items.retain(|candidate| !predicate(candidate));
        let removed = before - items.len();
        if removed > 0 {
            self.write_unless_cancelled(&items, cancel).await?;
        }
        Ok(removed)
    }
}

/// Replaces `path` with `contents` through a temporary file in the same directory.
fn replace_file(path: &Path, contents: &[u8]) -> Result<(), RepositoryError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn ensure_live(cancel: &CancellationToken) -> Result<(), RepositoryError> {
    if cancel.is_cancelled() {
        return Err(RepositoryError::Cancelled);
    }
    Ok(())
}

/// Runs `operation` unless `cancel` fires first. Only for operations that
/// leave the file untouched when dropped.
async fn cancellable<R>(
    cancel: &CancellationToken,
    operation: impl Future<Output = Result<R, RepositoryError>>,
) -> Result<R, RepositoryError> {
    ensure_live(cancel)?;
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RepositoryError::Cancelled),
        result = operation => result,
    }
}

fn settle<R>(
    path: &Path,
    op: &'static str,
    result: Result<R, RepositoryError>,
) -> ResponseResult<R> {
    if let Err(e) = &result {
        warn!(path = %path.display(), op, status = %e.status_code(), error = %e, "Repository operation failed");
    }
    result.into()
}

#[async_trait]
impl<T: Record> FileRepository<T> for JsonFileRepository<T> {
    async fn read(&self, cancel: &CancellationToken) -> ResponseResult<Vec<T>> {
        let result = cancellable(cancel, self.read_items()).await;
        if let Ok(items) = &result {
            debug!(path = %self.path.display(), size = items.len(), "Read");
        }
        settle(&self.path, "read", result)
    }

    async fn write(&self, items: Vec<T>, cancel: &CancellationToken) -> ResponseResult<()> {
        let result = self.write_unless_cancelled(&items, cancel).await;
        if result.is_ok() {
            debug!(path = %self.path.display(), size = items.len(), "Wrote");
        }
        settle(&self.path, "write", result)
    }

    async fn update(
        &self,
        predicate: Predicate<T>,
        item: T,
        cancel: &CancellationToken,
    ) -> ResponseResult<()> {
        let result = self.update_item(predicate, item, cancel).await;
        if result.is_ok() {
            info!(path = %self.path.display(), "Updated");
        }
        settle(&self.path, "update", result)
    }

    async fn delete(
        &self,
        predicate: Predicate<T>,
        cancel: &CancellationToken,
    ) -> ResponseResult<usize> {
        let result = self.delete_items(predicate, cancel).await;
        if let Ok(removed) = &result {
            info!(path = %self.path.display(), removed, "Deleted");
        }
        settle(&self.path, "delete", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: u32,
    }

    #[test]
    fn test_new_seeds_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("entries.json");

        let repo = JsonFileRepository::<Entry>::new(&path).unwrap();

        assert_eq!(repo.path(), path.as_path());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_new_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");
        std::fs::write(&path, r#"[{"id":3}]"#).unwrap();

        JsonFileRepository::<Entry>::new(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"[{"id":3}]"#);
    }

    #[tokio::test]
    async fn test_whitespace_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::<Entry>::in_dir(dir.path(), "entries.json").unwrap();
        std::fs::write(repo.path(), "  \n").unwrap();

        let result = repo.read(&CancellationToken::new()).await;

        assert!(result.success);
        assert_eq!(result.content, Some(vec![]));
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::<Entry>::in_dir(dir.path(), "entries.json").unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = repo.write(vec![Entry { id: 1 }], &cancel).await;

        assert!(!result.success);
        assert_eq!(result.status_code.as_u16(), 500);
        assert_eq!(result.error.as_deref(), Some("Operation cancelled"));
        assert_eq!(std::fs::read_to_string(repo.path()).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_cancelled_rewrites_leave_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::<Entry>::in_dir(dir.path(), "entries.json").unwrap();
        std::fs::write(repo.path(), r#"[{"id":1},{"id":2}]"#).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let updated = repo
            .update(Box::new(|e: &Entry| e.id == 1), Entry { id: 9 }, &cancel)
            .await;
        let deleted = repo.delete(Box::new(|_: &Entry| true), &cancel).await;

        assert_eq!(updated.error.as_deref(), Some("Operation cancelled"));
        assert_eq!(deleted.error.as_deref(), Some("Operation cancelled"));
        assert_eq!(
            std::fs::read_to_string(repo.path()).unwrap(),
            r#"[{"id":1},{"id":2}]"#
        );
    }

    #[tokio::test]
    async fn test_cancel_after_write_completes_is_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::<Entry>::in_dir(dir.path(), "entries.json").unwrap();
        let cancel = CancellationToken::new();

        let written = repo.write(vec![Entry { id: 4 }], &cancel).await;
        cancel.cancel();

        assert!(written.success);
        let on_disk: Vec<Entry> =
            serde_json::from_str(&std::fs::read_to_string(repo.path()).unwrap()).unwrap();
        assert_eq!(on_disk, vec![Entry { id: 4 }]);
    }

    #[test]
    fn test_replace_file_leaves_only_the_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entries.json");
        std::fs::write(&path, "[]").unwrap();

        replace_file(&path, b"[{\"id\":5}]").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"[{"id":5}]"#);
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
