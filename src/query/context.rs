use crate::error::{Result, ShardwiseError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation and deadline shared by every shard task of one search.
///
/// Clones share the cancellation flag, so cancelling any clone stops all
/// shards at their next check.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl SearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        SearchContext {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ShardwiseError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(ShardwiseError::DeadlineExceeded);
            }
        }
        Ok(())
    }
}
