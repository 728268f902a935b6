//! Sliding-window rate limiter for the metered classification service.
//!
//! Admission is bounded over a trailing window: at most `max_calls` calls in
//! any `window`-long interval, as opposed to a fixed reset period. The
//! prune-check-append sequence runs under one lock so concurrent callers can
//! never both take the last slot.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Limiter admitting at most `max_calls` per trailing `window`.
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            window,
            calls: Mutex::new(VecDeque::new()),
        }
    }

    /// Suspend until a call slot is free, then claim it. Safe under
    /// concurrent callers.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut calls = self.calls.lock().await;
                let now = Instant::now();
                while calls
                    .front()
                    .is_some_and(|t| now.duration_since(*t) >= self.window)
                {
                    calls.pop_front();
                }
                if calls.len() < self.max_calls {
                    calls.push_back(now);
                    return;
                }
                // Window is full: the oldest call ages out first. Re-check
                // after sleeping since another caller may claim the slot.
                match calls.front() {
                    Some(oldest) => self.window - now.duration_since(*oldest),
                    None => continue,
                }
            };
            tokio::time::sleep(wait).await;
        }
    }

    /// Calls currently counted in the window (diagnostics).
    pub async fn in_window(&self) -> usize {
        let mut calls = self.calls.lock().await;
        let now = Instant::now();
        while calls
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            calls.pop_front();
        }
        calls.len()
    }
}
