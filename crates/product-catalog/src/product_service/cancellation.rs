//! # Cancellation Scope
//!
//! Each service operation arms a fresh [`CancellationToken`] for its duration
//! and releases it when it finishes, whatever the exit path. The token sits in
//! a shared slot so that a [`CancelHandle`] held elsewhere (another task, a
//! UI callback) can cancel the operation currently in flight.
//!
//! ```text
//! Idle ──arm()──▶ Armed ──operation ends──▶ Idle
//!                   │
//!                   └──cancel()──▶ token cancelled, repository call gives up
//! ```
//!
//! Cancelling while idle is a no-op. Cancelling at the same moment the scope
//! is released is harmless: the slot is guarded, so either the token is
//! cancelled before removal or the slot is already empty.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Cloneable handle to the service's cancellation slot.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    slot: Arc<Mutex<Option<CancellationToken>>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the armed operation, if any. Returns whether one was armed.
    pub fn cancel(&self) -> bool {
        match self.slot.lock().as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Installs a fresh token for one operation.
    pub(crate) fn arm(&self) -> CancellationScope {
        let token = CancellationToken::new();
        *self.slot.lock() = Some(token.clone());
        CancellationScope {
            slot: self.slot.clone(),
            token,
        }
    }
}

/// The token of one running operation. Dropping it empties the slot.
pub(crate) struct CancellationScope {
    slot: Arc<Mutex<Option<CancellationToken>>>,
    token: CancellationToken,
}

impl CancellationScope {
    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for CancellationScope {
    fn drop(&mut self) {
        self.slot.lock().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_when_idle_is_noop() {
        let handle = CancelHandle::new();
        assert!(!handle.cancel());
        assert!(!handle.is_armed());
    }

    #[test]
    fn test_scope_lifecycle() {
        let handle = CancelHandle::new();
        let scope = handle.arm();
        assert!(handle.is_armed());

        let remote = handle.clone();
        assert!(remote.cancel());
        assert!(scope.token().is_cancelled());

        drop(scope);
        assert!(!handle.is_armed());
        assert!(!remote.cancel());
    }

    #[test]
    fn test_cancel_racing_release() {
        let handle = CancelHandle::new();
        let canceller = handle.clone();
        let worker = std::thread::spawn(move || {
            for _ in 0..1_000 {
                canceller.cancel();
            }
        });
        for _ in 0..1_000 {
            let scope = handle.arm();
            drop(scope);
        }
        worker.join().unwrap();
        assert!(!handle.is_armed());
    }
}
