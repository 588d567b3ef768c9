// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact-form gate.
//!
//! Source deployments disagreed on some limits (message minimum of 5 vs 10,
//! rate cap of 3 vs 5 per minute, expiry check present or absent). Those are
//! exposed as configuration rather than silently picking one.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the contact-form gate service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Bot heuristic configuration
    #[serde(default)]
    pub bot: BotConfig,

    /// Field validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Fixed-window rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum submissions per window per IP (default: 5)
    #[serde(default = "default_max_per_window")]
    pub max_per_window: u32,

    /// Window length in milliseconds (default: 60000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

/// Bot heuristic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Minimum milliseconds between form load and submission (default: 3000)
    #[serde(default = "default_min_elapsed_ms")]
    pub min_elapsed_ms: i64,

    /// Milliseconds after which the form is considered expired
    /// (default: 3600000, one hour)
    #[serde(default = "default_max_elapsed_ms")]
    pub max_elapsed_ms: i64,

    /// Enforce the expiry check (default: true). One deployed variant ran
    /// without it; set false to reproduce that behavior.
    #[serde(default = "default_true")]
    pub enforce_expiry: bool,
}

/// Field validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum length of first/last name after trimming (default: 50)
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,

    /// Maximum length of the normalized email address (default: 100)
    #[serde(default = "default_max_email_len")]
    pub max_email_len: usize,

    /// Minimum message length after trimming (default: 10)
    #[serde(default = "default_min_message_len")]
    pub min_message_len: usize,

    /// Maximum message length after trimming (default: 2000)
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_per_window() -> u32 {
    5
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_min_elapsed_ms() -> i64 {
    3_000
}

fn default_max_elapsed_ms() -> i64 {
    3_600_000
}

fn default_max_name_len() -> usize {
    50
}

fn default_max_email_len() -> usize {
    100
}

fn default_min_message_len() -> usize {
    10
}

fn default_max_message_len() -> usize {
    2_000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            bot: BotConfig::default(),
            validation: ValidationConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_window: default_max_per_window(),
            window_ms: default_window_ms(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            min_elapsed_ms: default_min_elapsed_ms(),
            max_elapsed_ms: default_max_elapsed_ms(),
            enforce_expiry: default_true(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_name_len: default_max_name_len(),
            max_email_len: default_max_email_len(),
            min_message_len: default_min_message_len(),
            max_message_len: default_max_message_len(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}
