//! # Mock Repository & Testing Guide
//!
//! Utilities for testing code that depends on a [`FileRepository`] without
//! touching the disk.
//!
//! ## When to use Mocks vs a Real File
//!
//! | Feature | MockRepository | JsonFileRepository + tempdir |
//! |---------|----------------|------------------------------|
//! | **Speed** | Instant (in-memory) | Fast (real I/O) |
//! | **State** | No real state (expectations) | Real file contents |
//! | **Error Injection** | Easy (`return_err`) | Hard (needs a broken file) |
//! | **Use Case** | Logic *around* the repository | The repository or the full system |
//!
//! ## Fluent expectations
//!
//! ```rust
//! use json_repository::mock::MockRepository;
//! use json_repository::{FileRepository, StatusCode};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut mock = MockRepository::<String>::new();
//! mock.expect_read().return_ok(vec!["Alice".to_string()]);
//! mock.expect_write().return_err(StatusCode::InternalServerError, "disk full");
//!
//! let client = mock.client();
//! let cancel = CancellationToken::new();
//! assert_eq!(client.read(&cancel).await.content.unwrap().len(), 1);
//! assert!(!client.write(vec![], &cancel).await.success);
//!
//! mock.verify();
//! # }
//! ```
//!
//! ## Raw requests
//!
//! When a test needs to look at what was sent (the predicate of an update, or
//! the token of an in-flight read) use [`create_mock_client`] and the
//! `expect_*` helpers, then answer through the returned responder.

use crate::client::RepositoryClient;
use crate::message::{RepositoryRequest, Responder};
use crate::record::{Predicate, Record};
use crate::response::{ResponseResult, StatusCode};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the envelope to answer it with.
enum Expectation<T> {
    Read(ResponseResult<Vec<T>>),
    Write(ResponseResult<()>),
    Update(ResponseResult<()>),
    Delete(ResponseResult<usize>),
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock repository with expectation tracking for fluent testing.
///
/// Requests are answered in the order expectations were registered. A request
/// that does not match the next expectation is answered with a 500 envelope
/// and recorded; [`MockRepository::verify`] then fails.
pub struct MockRepository<T: Record> {
    client: RepositoryClient<T>,
    expectations: Expectations<T>,
    written: Arc<Mutex<Vec<Vec<T>>>>,
    updated: Arc<Mutex<Vec<T>>>,
    unexpected: Arc<Mutex<Vec<&'static str>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Record> MockRepository<T> {
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<RepositoryRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let written = Arc::new(Mutex::new(Vec::new()));
        let updated = Arc::new(Mutex::new(Vec::new()));
        let unexpected = Arc::new(Mutex::new(Vec::new()));

        let task_expectations = expectations.clone();
        let task_written = written.clone();
        let task_updated = updated.clone();
        let task_unexpected = unexpected.clone();

        // Spawn background task to handle requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = task_expectations.lock().unwrap().pop_front();
                let kind = request.kind();

                match (request, expectation) {
                    (
                        RepositoryRequest::Read { respond_to, .. },
                        Some(Expectation::Read(response)),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        RepositoryRequest::Write {
                            items, respond_to, ..
                        },
                        Some(Expectation::Write(response)),
                    ) => {
                        task_written.lock().unwrap().push(items);
                        let _ = respond_to.send(response);
                    }
                    (
                        RepositoryRequest::Update {
                            item, respond_to, ..
                        },
                        Some(Expectation::Update(response)),
                    ) => {
                        task_updated.lock().unwrap().push(item);
                        let _ = respond_to.send(response);
                    }
                    (
                        RepositoryRequest::Delete { respond_to, .. },
                        Some(Expectation::Delete(response)),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        task_unexpected.lock().unwrap().push(kind);
                        reject(request);
                    }
                }
            }
        });

        Self {
            client: RepositoryClient::new(sender),
            expectations,
            written,
            updated,
            unexpected,
            _handle: handle,
        }
    }

    /// Returns a client that talks to this mock.
    pub fn client(&self) -> RepositoryClient<T> {
        self.client.clone()
    }

    pub fn expect_read(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Read)
    }

    pub fn expect_write(&mut self) -> ExpectationBuilder<T, ()> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Write)
    }

    pub fn expect_update(&mut self) -> ExpectationBuilder<T, ()> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Update)
    }

    pub fn expect_delete(&mut self) -> ExpectationBuilder<T, usize> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Delete)
    }

    /// Every collection passed to `write`, in call order.
    pub fn written(&self) -> Vec<Vec<T>> {
        self.written.lock().unwrap().clone()
    }

    /// Every replacement item passed to `update`, in call order.
    pub fn updated(&self) -> Vec<T> {
        self.updated.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let unexpected = self.unexpected.lock().unwrap();
        if !unexpected.is_empty() {
            panic!("Unexpected requests: {:?}", *unexpected);
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

impl<T: Record> Default for MockRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn reject<T: Record>(request: RepositoryRequest<T>) {
    let message = format!("Unexpected {} request", request.kind());
    match request {
        RepositoryRequest::Read { respond_to, .. } => {
            let _ = respond_to.send(ResponseResult::fail(StatusCode::InternalServerError, message));
        }
        RepositoryRequest::Write { respond_to, .. }
        | RepositoryRequest::Update { respond_to, .. } => {
            let _ = respond_to.send(ResponseResult::fail(StatusCode::InternalServerError, message));
        }
        RepositoryRequest::Delete { respond_to, .. } => {
            let _ = respond_to.send(ResponseResult::fail(StatusCode::InternalServerError, message));
        }
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder<T, R> {
    expectations: Expectations<T>,
    wrap: fn(ResponseResult<R>) -> Expectation<T>,
}

impl<T, R> ExpectationBuilder<T, R> {
    fn new(expectations: Expectations<T>, wrap: fn(ResponseResult<R>) -> Expectation<T>) -> Self {
        Self { expectations, wrap }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, content: R) {
        self.respond(ResponseResult::ok(content));
    }

    /// Sets the expectation to return a failure.
    pub fn return_err(self, status_code: StatusCode, message: &str) {
        self.respond(ResponseResult::fail(status_code, message));
    }

    pub fn respond(self, response: ResponseResult<R>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back((self.wrap)(response));
    }
}

// =============================================================================
// RAW HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// The test plays the actor: it pulls requests with the `expect_*` helpers,
/// inspects them, and answers through the responder.
pub fn create_mock_client<T: Record>(
    buffer_size: usize,
) -> (RepositoryClient<T>, mpsc::Receiver<RepositoryRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (RepositoryClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Read request
pub async fn expect_read<T: Record>(
    receiver: &mut mpsc::Receiver<RepositoryRequest<T>>,
) -> Option<(CancellationToken, Responder<Vec<T>>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::Read { cancel, respond_to }) => Some((cancel, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Write request
pub async fn expect_write<T: Record>(
    receiver: &mut mpsc::Receiver<RepositoryRequest<T>>,
) -> Option<(Vec<T>, CancellationToken, Responder<()>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::Write {
            items,
            cancel,
            respond_to,
        }) => Some((items, cancel, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Record>(
    receiver: &mut mpsc::Receiver<RepositoryRequest<T>>,
) -> Option<(Predicate<T>, T, Responder<()>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::Update {
            predicate,
            item,
            respond_to,
            ..
        }) => Some((predicate, item, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: Record>(
    receiver: &mut mpsc::Receiver<RepositoryRequest<T>>,
) -> Option<(Predicate<T>, Responder<usize>)> {
    match receiver.recv().await {
        Some(RepositoryRequest::Delete {
            predicate,
            respond_to,
            ..
        }) => Some((predicate, respond_to)),
        _ => None,
    }
}
