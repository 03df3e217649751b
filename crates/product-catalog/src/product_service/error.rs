//! Error types for the product service.

use crate::validators::ValidationError;
use json_repository::{Failure, StatusCode, StatusError};
use thiserror::Error;

/// Errors that can occur during product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    /// The request failed field validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A new product reused the name of an existing one.
    #[error("Product name already exists.")]
    DuplicateName,

    /// An update renamed a product to another product's name.
    #[error("Product name is already taken.")]
    NameTaken,

    /// The repository answered with a failed envelope.
    #[error(transparent)]
    Repository(#[from] Failure),
}

impl StatusError for ProductError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProductError::Validation(_) => StatusCode::BadRequest,
            ProductError::DuplicateName | ProductError::NameTaken => StatusCode::Conflict,
            ProductError::Repository(failure) => failure.status_code,
        }
    }
}
