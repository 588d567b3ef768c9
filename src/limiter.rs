// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter for contact-form submissions.
//!
//! Tracks a per-IP request count inside a fixed window (60 s default). The
//! first request from an address opens a window; requests past the cap are
//! denied until the window rolls over. Windows expire lazily on access, with
//! a periodic sweep evicting entries for addresses that went quiet.
//!
//! The limiter is owned by the server's composition root and takes the
//! current time as a parameter, so tests can run isolated instances against
//! a simulated clock.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in the current window
        remaining: u32,
        /// Time until the window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Time until the window rolls over
        retry_after: Duration,
    },
}

/// Per-IP submission window.
#[derive(Debug)]
struct Window {
    /// When the window opened
    started: Instant,
    /// Requests counted in this window
    count: u32,
}

/// Thread-safe fixed-window rate limiter.
///
/// All read-modify-write of a window happens under one write lock, so
/// concurrent bursts from the same address cannot undercount.
pub struct RateLimiter {
    /// Configuration
    config: RateLimitConfig,
    /// Per-IP windows
    windows: Arc<RwLock<HashMap<IpAddr, Window>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Check whether a request from `ip` at time `now` is within quota.
    pub async fn check(&self, ip: IpAddr, now: Instant) -> RateLimitResult {
        let window_len = self.config.window_duration();
        let max = self.config.max_per_window;

        let mut windows = self.windows.write().await;
        match windows.get_mut(&ip) {
            Some(window) if now.duration_since(window.started) < window_len => {
                let elapsed = now.duration_since(window.started);
                if window.count >= max {
                    let retry_after = window_len - elapsed;
                    debug!(%ip, count = window.count, ?retry_after, "Rate limit exceeded");
                    RateLimitResult::Limited { retry_after }
                } else {
                    window.count += 1;
                    RateLimitResult::Allowed {
                        remaining: max - window.count,
                        reset_in: window_len - elapsed,
                    }
                }
            }
            _ => {
                // No window yet, or the previous one elapsed
                windows.insert(
                    ip,
                    Window {
                        started: now,
                        count: 1,
                    },
                );
                RateLimitResult::Allowed {
                    remaining: max.saturating_sub(1),
                    reset_in: window_len,
                }
            }
        }
    }

    /// Evict windows that elapsed before `now` (called periodically).
    pub async fn cleanup(&self, now: Instant) {
        let window_len = self.config.window_duration();
        let mut windows = self.windows.write().await;
        windows.retain(|_, window| now.duration_since(window.started) < window_len);
    }
}
