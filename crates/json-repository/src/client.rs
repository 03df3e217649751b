//! # Repository Client
//!
//! This module defines the client half of the repository actor.

use crate::error::RepositoryError;
use crate::message::{RepositoryRequest, Responder};
use crate::record::{Predicate, Record};
use crate::repository::FileRepository;
use crate::response::ResponseResult;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// A [`FileRepository`] that forwards every call to a
/// [`RepositoryActor`](crate::RepositoryActor).
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Serialized** – all clones of one client share one mailbox, so their
///   read-modify-write cycles never overlap.
/// * **Fault-free** – a stopped actor is reported as a 500 envelope, never as
///   a panic.
#[derive(Clone)]
pub struct RepositoryClient<T: Record> {
    sender: mpsc::Sender<RepositoryRequest<T>>,
}

impl<T: Record> RepositoryClient<T> {
    pub fn new(sender: mpsc::Sender<RepositoryRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R: Send>(
        &self,
        build: impl FnOnce(Responder<R>) -> RepositoryRequest<T> + Send,
    ) -> ResponseResult<R> {
        let (respond_to, response) = oneshot::channel();
        if self.sender.send(build(respond_to)).await.is_err() {
            return ResponseResult::failure(&RepositoryError::ActorClosed);
        }
        response
            .await
            .unwrap_or_else(|_| ResponseResult::failure(&RepositoryError::ActorDropped))
    }
}

#[async_trait]
impl<T: Record> FileRepository<T> for RepositoryClient<T> {
    async fn read(&self, cancel: &CancellationToken) -> ResponseResult<Vec<T>> {
        let cancel = cancel.clone();
        self.request(|respond_to| RepositoryRequest::Read { cancel, respond_to })
            .await
    }

    async fn write(&self, items: Vec<T>, cancel: &CancellationToken) -> ResponseResult<()> {
        let cancel = cancel.clone();
        self.request(|respond_to| RepositoryRequest::Write {
            items,
            cancel,
            respond_to,
        })
        .await
    }

    async fn update(
        &self,
        predicate: Predicate<T>,
        item: T,
        cancel: &CancellationToken,
    ) -> ResponseResult<()> {
        let cancel = cancel.clone();
        self.request(|respond_to| RepositoryRequest::Update {
            predicate,
            item,
            cancel,
            respond_to,
        })
        .await
    }

    async fn delete(
        &self,
        predicate: Predicate<T>,
        cancel: &CancellationToken,
    ) -> ResponseResult<usize> {
        let cancel = cancel.clone();
        self.request(|respond_to| RepositoryRequest::Delete {
            predicate,
            cancel,
            respond_to,
        })
        .await
    }
}
