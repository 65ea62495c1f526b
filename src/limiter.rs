// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding window rate limiter keyed by client identity.
//!
//! Every identity owns the timestamps of its admitted requests. A check
//! discards timestamps that fell out of the trailing window, then either
//! admits (recording `now`) or rejects without recording anything.
//!
//! Filtering and recording happen under one lock, so concurrent requests
//! for the same identity can never exceed the quota.

use crate::clock::Clock;
use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests left in the current window
    pub remaining: u32,
    /// Epoch milliseconds at which the oldest counted request expires
    pub reset_at: i64,
}

impl RateLimitResult {
    /// `reset_at` in whole Unix seconds, rounded up.
    pub fn reset_at_secs(&self) -> i64 {
        ceil_div(self.reset_at, 1000)
    }

    /// Seconds a rejected client should wait, never less than one.
    pub fn retry_after_secs(&self, now_millis: i64) -> i64 {
        ceil_div(self.reset_at - now_millis, 1000).max(1)
    }
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    (value + divisor - 1).div_euclid(divisor)
}

/// Admitted request timestamps for one identity.
#[derive(Debug)]
struct WindowRecord {
    /// Epoch milliseconds, oldest first
    timestamps: Vec<i64>,
    /// Window length of the most recent check, used by the sweep
    window_ms: i64,
}

impl WindowRecord {
    fn prune(&mut self, now: i64) {
        let window = self.window_ms;
        self.timestamps.retain(|&t| now - t < window);
    }
}

/// Thread-safe sliding window rate limiter.
pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    records: Mutex<HashMap<String, WindowRecord>>,
}

impl RateLimiter {
    /// Create a new rate limiter reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Check and, if admitted, record a request for `identity`.
    ///
    /// The identity is an opaque key; no format validation is applied.
    pub async fn check(&self, identity: &str, config: &RateLimitConfig) -> RateLimitResult {
        let now = self.clock.now_millis();
        let window_ms = config.window_ms as i64;
        let max = config.max_requests as usize;

        let mut records = self.records.lock().await;

        if let Some(record) = records.get_mut(identity) {
            record.window_ms = window_ms;
            record.prune(now);

            if record.timestamps.len() >= max {
                let oldest = record.timestamps.first().copied().unwrap_or(now);
                let reset_at = oldest + window_ms;
                debug!(%identity, reset_at, "Identity over quota");
                return RateLimitResult {
                    allowed: false,
                    remaining: 0,
                    reset_at,
                };
            }

            record.timestamps.push(now);
            return RateLimitResult {
                allowed: true,
                remaining: (max - record.timestamps.len()) as u32,
                reset_at: now + window_ms,
            };
        }

        if max == 0 {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_at: now + window_ms,
            };
        }

        records.insert(
            identity.to_string(),
            WindowRecord {
                timestamps: vec![now],
                window_ms,
            },
        );

        RateLimitResult {
            allowed: true,
            remaining: (max - 1) as u32,
            reset_at: now + window_ms,
        }
    }

    /// Forget `identity`, or every identity when `None`.
    pub async fn reset(&self, identity: Option<&str>) {
        let mut records = self.records.lock().await;
        match identity {
            Some(id) => {
                records.remove(id);
            }
            None => records.clear(),
        }
    }

    /// Drop expired timestamps and identities left with none.
    ///
    /// Returns the number of identities removed. Has no effect on the
    /// outcome of [`check`](Self::check), which always re-filters.
    pub async fn cleanup(&self) -> usize {
        let now = self.clock.now_millis();
        let mut records = self.records.lock().await;
        let before = records.len();

        records.retain(|_, record| {
            record.prune(now);
            !record.timestamps.is_empty()
        });

        before - records.len()
    }

    /// Number of identities currently tracked.
    pub async fn tracked_identities(&self) -> usize {
        self.records.lock().await.len()
    }
}

/// Background sweep calling [`RateLimiter::cleanup`] on a fixed interval.
///
/// Started explicitly and stopped with [`CleanupTask::stop`].
pub struct CleanupTask {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl CleanupTask {
    /// Spawn the sweep on the current tokio runtime.
    pub fn spawn(limiter: Arc<RateLimiter>, every: Duration) -> Self {
        let (shutdown, mut stop) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            // The first tick completes immediately
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let removed = limiter.cleanup().await;
                        if removed > 0 {
                            debug!(removed, "Swept idle rate limit entries");
                        }
                    }
                    _ = &mut stop => break,
                }
            }
        });

        Self {
            shutdown: Some(shutdown),
            handle,
        }
    }

    /// Signal the sweep to stop and wait for it to finish.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let _ = self.handle.await;
    }
}
