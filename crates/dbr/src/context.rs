//! Caller-supplied execution context.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancellation context handed through to the [`GenericClient`](crate::GenericClient).
///
/// Statements never inspect it; clients decide whether and when to honour
/// cancellation. Clones share the same flag, so a context can be cancelled
/// from another task while a query is in flight.
#[derive(Debug, Clone)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
