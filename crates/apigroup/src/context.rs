//! Per-call context forwarded unchanged from the transport to the implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Notify;

use crate::CallId;

/// Everything the caller attached to one call: its identity, an optional
/// deadline, and a cancellation signal.
///
/// Adapters never alter a context; they hand the same value to the internal
/// implementation so its blocking and cancellation behaviour is exactly the
/// caller's.
#[derive(Debug, Clone)]
pub struct CallContext {
    call_id: CallId,
    deadline: Option<Instant>,
    cancellation: Cancellation,
}

impl CallContext {
    /// Creates a context with a fresh [`CallId`], no deadline, and a
    /// cancellation signal that has not fired.
    pub fn new() -> Self {
        Self {
            call_id: CallId::new_random(),
            deadline: None,
            cancellation: Cancellation::new(),
        }
    }

    /// Sets an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Replaces the cancellation signal, e.g. to share one across calls of a
    /// single connection.
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Identifier for correlating this call in logs.
    pub fn call_id(&self) -> CallId {
        self.call_id
    }

    /// The instant after which the call is abandoned, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The signal that aborts this call.
    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    /// Returns `true` once the caller has cancelled this call.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------

/// A one-shot, cloneable cancellation signal.
///
/// Clones observe the same state. Once fired it stays fired.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    inner: Arc<CancellationState>,
}

#[derive(Debug, Default)]
struct CancellationState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl Cancellation {
    /// Creates a signal that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the signal. Returns `true` if this call was the one that fired it.
    pub fn cancel(&self) -> bool {
        if self
            .inner
            .cancelled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.inner.notify.notify_waiters();
            true
        } else {
            false
        }
    }

    /// Returns `true` once any clone has fired the signal.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Completes once the signal has fired.
    pub async fn cancelled(&self) {
        // Register before checking the flag so a concurrent `cancel` is not missed.
        let notified = self.inner.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_cancellation_state() {
        let ctx = CallContext::new();
        let clone = ctx.clone();
        assert!(!clone.is_cancelled());
        assert!(ctx.cancellation().cancel());
        assert!(!ctx.cancellation().cancel());
        assert!(clone.is_cancelled());
        assert_eq!(ctx.call_id(), clone.call_id());
    }

    #[test]
    fn timeout_sets_a_future_deadline() {
        let before = Instant::now();
        let ctx = CallContext::new().with_timeout(Duration::from_secs(5));
        let deadline = ctx.deadline().unwrap();
        assert!(deadline >= before + Duration::from_secs(5));
    }

    #[tokio::test]
    async fn cancelled_wakes_waiters() {
        let cancellation = Cancellation::new();
        let waiter = {
            let cancellation = cancellation.clone();
            tokio::spawn(async move { cancellation.cancelled().await })
        };
        tokio::task::yield_now().await;
        cancellation.cancel();
        waiter.await.unwrap();

        // Already fired: returns immediately.
        cancellation.cancelled().await;
    }
}
