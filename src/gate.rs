use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds the number of simultaneously in-flight commit fetches
///
/// Distinct from [`crate::rate_limiter::RateLimiter`]: the limiter throttles
/// call rate, the gate throttles how many calls are outstanding at once.
/// Cloning is cheap; clones share the same capacity.
#[derive(Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
}

impl ConcurrencyGate {
    /// Creates a gate admitting at most `max_concurrent` simultaneous holders
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// Acquires a slot, suspending until one is free; the slot is released
    /// when the returned permit drops
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("gate semaphore closed")
    }
}
