//! Sliding-window rate limiting for outbound API calls.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Allows at most `max_requests` acquisitions per rolling `window`. Callers
/// over the limit queue on [`acquire`](Self::acquire) until a slot frees up;
/// nothing is ever rejected or dropped.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    sent: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            sent: Mutex::new(VecDeque::with_capacity(max_requests)),
        }
    }

    /// Wait until a request slot is free, then claim it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut sent = self.sent.lock().await;
                let now = Instant::now();

                while let Some(oldest) = sent.front() {
                    if now.duration_since(*oldest) >= self.window {
                        sent.pop_front();
                    } else {
                        break;
                    }
                }

                if sent.len() < self.max_requests {
                    sent.push_back(now);
                    return;
                }

                // The oldest in-window send decides when the next slot opens.
                match sent.front() {
                    Some(oldest) => self.window.saturating_sub(now.duration_since(*oldest)),
                    None => Duration::ZERO,
                }
            };

            debug!("Rate limit reached, waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_burst_within_window() {
        let limiter = RateLimiter::new(4, Duration::from_millis(200));
        let start = Instant::now();
        for _ in 0..4 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn fifth_call_waits_for_the_window() {
        let limiter = RateLimiter::new(4, Duration::from_millis(200));
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn slots_free_up_after_the_window_passes() {
        let limiter = RateLimiter::new(2, Duration::from_millis(50));
        limiter.acquire().await;
        limiter.acquire().await;

        tokio::time::sleep(Duration::from_millis(60)).await;

        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(20));
    }
}
