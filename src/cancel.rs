//! Cooperative cancellation
//!
//! Every unbounded loop in the engine calls [`CancellationToken::check`] before each
//! unit of work. The flag only ever moves from "running" to "cancelled".

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

/// A one-shot, shareable "cancellation requested" flag
///
/// Clones share the same flag, so the token handed to a worker can be cancelled
/// from the thread that started it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Calling it again has no further effect.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Fail with [`Error::Cancelled`] once cancellation has been requested
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            tracing::trace!(target: "cancel", "cancellation observed");
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}
