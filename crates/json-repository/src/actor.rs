//! # Repository Actor
//!
//! This module defines the `RepositoryActor`, the task that owns a
//! [`JsonFileRepository`] and serves requests from any number of
//! [`RepositoryClient`]s.
//!
//! ## Why an actor?
//!
//! The file repository's update and delete are read-modify-write cycles. If
//! two of them overlap on the same file, one of the rewrites silently loses
//! the other's change. The actor processes its mailbox *sequentially*, so every
//! cycle issued through its clients completes before the next one starts.
//! No `Mutex` guards the file: exclusive ownership inside the task does.
//!
//! This only serializes callers that share the actor. A second actor (or a
//! second process) pointed at the same path can still interleave, and the last
//! writer wins.

use crate::client::RepositoryClient;
use crate::file::JsonFileRepository;
use crate::message::RepositoryRequest;
use crate::record::Record;
use crate::repository::FileRepository;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The server half: owns the repository and the receiving end of the mailbox.
///
/// # Usage Pattern
///
/// 1. **Create**: `RepositoryActor::new(repository, buffer)` returns the actor
///    and a client.
/// 2. **Run**: spawn `actor.run()` on the runtime.
/// 3. **Use**: clone the client wherever access is needed.
/// 4. **Stop**: drop every client; the loop ends once the mailbox is closed
///    and drained.
///
/// ```rust
/// use json_repository::{FileRepository, JsonFileRepository, RepositoryActor};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() {
/// let dir = std::env::temp_dir().join("json-repository-doc");
/// let repository = JsonFileRepository::<String>::in_dir(&dir, "names.json").unwrap();
/// let (actor, client) = RepositoryActor::new(repository, 8);
/// let handle = tokio::spawn(actor.run());
///
/// let cancel = CancellationToken::new();
/// client.write(vec!["Alice".to_string()], &cancel).await;
/// let names = client.read(&cancel).await;
/// assert_eq!(names.content, Some(vec!["Alice".to_string()]));
///
/// drop(client);
/// handle.await.unwrap();
/// # }
/// ```
pub struct RepositoryActor<T: Record> {
    receiver: mpsc::Receiver<RepositoryRequest<T>>,
    repository: JsonFileRepository<T>,
}

impl<T: Record> RepositoryActor<T> {
    /// Creates the actor and its first client.
    ///
    /// `buffer_size` is the mailbox capacity; callers wait when it is full.
    /// It must be greater than zero.
    pub fn new(
        repository: JsonFileRepository<T>,
        buffer_size: usize,
    ) -> (Self, RepositoryClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            repository,
        };
        (actor, RepositoryClient::new(sender))
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "Product" instead of "product_catalog::model::product::Product")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        let path = self.repository.path().display().to_string();
        info!(entity_type, %path, "Repository actor started");

        let mut handled: u64 = 0;
        while let Some(msg) = self.receiver.recv().await {
            debug!(entity_type, request = ?msg, "Request");
            handled += 1;
            match msg {
                RepositoryRequest::Read { cancel, respond_to } => {
                    let result = self.repository.read(&cancel).await;
                    let _ = respond_to.send(result);
                }
                RepositoryRequest::Write {
                    items,
                    cancel,
                    respond_to,
                } => {
                    let result = self.repository.write(items, &cancel).await;
                    let _ = respond_to.send(result);
                }
                RepositoryRequest::Update {
                    predicate,
                    item,
                    cancel,
                    respond_to,
                } => {
                    let result = self.repository.update(predicate, item, &cancel).await;
                    let _ = respond_to.send(result);
                }
                RepositoryRequest::Delete {
                    predicate,
                    cancel,
                    respond_to,
                } => {
                    let result = self.repository.delete(predicate, &cancel).await;
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, %path, handled, "Repository actor shutdown");
    }
}
