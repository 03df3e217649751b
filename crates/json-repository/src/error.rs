//! # Repository Errors
//!
//! This module defines the error type produced by the file repository and the
//! actor plumbing around it. Every variant maps onto an HTTP-style status code
//! through [`StatusError`], which is how errors cross into a
//! [`ResponseResult`](crate::ResponseResult).

use crate::response::{StatusCode, StatusError};

/// Errors that can occur while reading or rewriting the JSON file.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The collection could not be read before an update or delete.
    #[error("File not found or empty: {0}")]
    Unreadable(String),
    #[error("Item not found")]
    ItemNotFound,
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Repository actor closed")]
    ActorClosed,
    #[error("Repository actor dropped response channel")]
    ActorDropped,
}

impl StatusError for RepositoryError {
    fn status_code(&self) -> StatusCode {
        match self {
            RepositoryError::Unreadable(_) | RepositoryError::ItemNotFound => StatusCode::NotFound,
            _ => StatusCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(RepositoryError::ItemNotFound.status_code(), StatusCode::NotFound);
        assert_eq!(
            RepositoryError::Unreadable("bad json".into()).status_code(),
            StatusCode::NotFound
        );
        assert_eq!(RepositoryError::Cancelled.status_code(), StatusCode::InternalServerError);
        let io = RepositoryError::from(std::io::Error::other("disk full"));
        assert_eq!(io.status_code(), StatusCode::InternalServerError);
        assert!(io.to_string().contains("disk full"));
    }
}
