//! # Repository Messages
//!
//! This module defines the requests a [`RepositoryClient`](crate::RepositoryClient)
//! sends to a [`RepositoryActor`](crate::RepositoryActor).
//!
//! The variants mirror the four [`FileRepository`](crate::FileRepository)
//! operations one-to-one. Each carries the caller's cancellation token and a
//! one-shot channel for the reply, so the actor never needs to know who asked.

use crate::record::{Predicate, Record};
use crate::response::ResponseResult;
use std::fmt;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Type alias for the one-shot reply channel used by the actor.
pub type Responder<T> = oneshot::Sender<ResponseResult<T>>;

pub enum RepositoryRequest<T: Record> {
    Read {
        cancel: CancellationToken,
        respond_to: Responder<Vec<T>>,
    },
    Write {
        items: Vec<T>,
        cancel: CancellationToken,
        respond_to: Responder<()>,
    },
    Update {
        predicate: Predicate<T>,
        item: T,
        cancel: CancellationToken,
        respond_to: Responder<()>,
    },
    Delete {
        predicate: Predicate<T>,
        cancel: CancellationToken,
        respond_to: Responder<usize>,
    },
}

impl<T: Record> RepositoryRequest<T> {
    pub fn kind(&self) -> &'static str {
        match self {
            RepositoryRequest::Read { .. } => "Read",
            RepositoryRequest::Write { .. } => "Write",
            RepositoryRequest::Update { .. } => "Update",
            RepositoryRequest::Delete { .. } => "Delete",
        }
    }
}

// Predicates are opaque closures, so only the shape of the request is shown.
impl<T: Record> fmt::Debug for RepositoryRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryRequest::Write { items, .. } => f
                .debug_struct("Write")
                .field("size", &items.len())
                .finish_non_exhaustive(),
            RepositoryRequest::Update { item, .. } => f
                .debug_struct("Update")
                .field("item", item)
                .finish_non_exhaustive(),
            other => f.debug_struct(other.kind()).finish_non_exhaustive(),
        }
    }
}
