use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

/// Limits the global rate of outbound GitHub API calls
///
/// Sliding-window admission: a call is admitted once fewer than the configured
/// maximum have been admitted within the trailing window. Every outbound
/// request passes through [`RateLimiter::acquire`]; no request bypasses it.
pub struct RateLimiter {
    max_per_window: usize,
    window: Duration,
    admitted: Mutex<Vec<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter admitting at most `requests_per_second` calls over
    /// any trailing one-second window
    pub fn new(requests_per_second: usize) -> Self {
        Self::with_window(requests_per_second, Duration::from_secs(1))
    }

    /// Creates a limiter with an explicit window length
    pub fn with_window(max_per_window: usize, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            admitted: Mutex::new(Vec::new()),
        }
    }

    /// Suspends the calling task until issuing one more request stays within
    /// the configured ceiling
    pub async fn acquire(&self) {
        loop {
            {
                let mut admitted = self.admitted.lock().await;
                let now = Instant::now();
                admitted.retain(|&t| now.duration_since(t) < self.window);

                if admitted.len() < self.max_per_window {
                    admitted.push(now);
                    return;
                }
            }
            // Lock released while we wait for the window to roll over
            sleep(Duration::from_millis(10)).await;
        }
    }
}
