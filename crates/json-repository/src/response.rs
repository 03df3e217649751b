//! # Result Envelope
//!
//! Every public repository and service operation answers with a
//! [`ResponseResult`]: a success flag, an HTTP-style status code, an optional
//! error message and an optional payload. Faults never escape as panics or raw
//! errors; they are folded into the envelope at the boundary.
//!
//! Inside the crates, fallible steps use ordinary `Result`s. Any error type
//! implementing [`StatusError`] converts into an envelope with `.into()`, and
//! [`ResponseResult::into_result`] goes the other way so callers can keep
//! using `?`.

use serde::{Serialize, Serializer};
use std::fmt;

/// HTTP-style status codes used by the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum StatusCode {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
    Conflict = 409,
    InternalServerError = 500,
}

impl StatusCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn is_success(self) -> bool {
        self == StatusCode::Ok
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

/// An error that knows which status code it should be reported with.
pub trait StatusError: std::error::Error {
    fn status_code(&self) -> StatusCode;
}

/// A failed envelope, detached from its payload type.
///
/// This is what [`ResponseResult::into_result`] yields on failure, so a
/// failure read from one layer can be re-raised unchanged by the next.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    pub status_code: StatusCode,
    pub message: String,
}

impl StatusError for Failure {
    fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

/// The uniform outcome of every operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseResult<T> {
    pub success: bool,
    pub status_code: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<T>,
}

impl<T> ResponseResult<T> {
    pub fn ok(content: T) -> Self {
        Self {
            success: true,
            status_code: StatusCode::Ok,
            error: None,
            content: Some(content),
        }
    }

    pub fn fail(status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            error: Some(message.into()),
            content: None,
        }
    }

    /// Builds a failed envelope from any status-aware error.
    pub fn failure<E: StatusError + ?Sized>(error: &E) -> Self {
        Self::fail(error.status_code(), error.to_string())
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResponseResult<U> {
        ResponseResult {
            success: self.success,
            status_code: self.status_code,
            error: self.error,
            content: self.content.map(f),
        }
    }

    /// Unwraps the envelope into a `Result`.
    ///
    /// A successful envelope without content is treated as an internal
    /// failure: `ok` always sets the payload.
    pub fn into_result(self) -> Result<T, Failure> {
        match (self.success, self.content) {
            (true, Some(content)) => Ok(content),
            (true, None) => Err(Failure {
                status_code: StatusCode::InternalServerError,
                message: "Response carried no content".to_string(),
            }),
            (false, _) => Err(Failure {
                status_code: self.status_code,
                message: self.error.unwrap_or_default(),
            }),
        }
    }
}

impl<T, E: StatusError> From<Result<T, E>> for ResponseResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(content) => Self::ok(content),
            Err(e) => Self::failure(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serializes_camel_case() {
        let ok = ResponseResult::ok(vec![1, 2]);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["content"], serde_json::json!([1, 2]));
        assert!(json.get("error").is_none());

        let failed: ResponseResult<()> = ResponseResult::fail(StatusCode::Conflict, "taken");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["statusCode"], 409);
        assert_eq!(json["error"], "taken");
    }

    #[test]
    fn test_into_result_keeps_status() {
        let failed: ResponseResult<u32> =
            ResponseResult::fail(StatusCode::NotFound, "Item not found");
        let failure = failed.into_result().unwrap_err();
        assert_eq!(failure.status_code, StatusCode::NotFound);
        assert_eq!(failure.to_string(), "Item not found");

        let back: ResponseResult<u32> = Err::<u32, _>(failure).into();
        assert_eq!(back.status_code, StatusCode::NotFound);
        assert_eq!(ResponseResult::ok(7).into_result(), Ok(7));
    }
}
