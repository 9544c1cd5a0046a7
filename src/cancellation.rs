//! Cooperative cancellation for host-driven re-evaluation.
//!
//! The generator runs inside a host incremental-computation graph that may
//! abandon an evaluation at any time. Every long-running enumeration checks
//! a token at each iteration and aborts by propagating [`Cancelled`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A token that signals cancellation of an in-flight generator evaluation.
///
/// Tokens are cheap to clone and may form parent/child chains: cancelling a
/// parent cancels every child derived from it.
///
/// # Examples
///
/// ```rust
/// use regchain::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(token.checkpoint().is_ok());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.checkpoint().is_err());
/// ```
#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

#[derive(Default)]
struct TokenInner {
    cancelled: AtomicBool,
    parent: Option<CancellationToken>,
}

impl CancellationToken {
    /// Creates a new, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a child token that is cancelled when either it or this token
    /// is cancelled.
    pub fn child_token(&self) -> Self {
        Self {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Signals that associated work should stop.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    /// Returns true if cancellation has been requested on this token or any
    /// ancestor.
    pub fn is_cancelled(&self) -> bool {
        if self.inner.cancelled.load(Ordering::Acquire) {
            return true;
        }
        match &self.inner.parent {
            Some(parent) => parent.is_cancelled(),
            None => false,
        }
    }

    /// Aborts the current evaluation if cancellation has been requested.
    ///
    /// Call sites propagate the error with `?`; it is never swallowed.
    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Raised when an evaluation observes a cancelled [`CancellationToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("generator evaluation was cancelled")]
pub struct Cancelled;
