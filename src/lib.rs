// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact-Form Gate
//!
//! This crate provides the backend for a contact form: a single
//! `POST /api/contact` endpoint that runs each submission through a
//! fixed-order pipeline before logging it:
//!
//! - Per-IP fixed-window rate limiting (5 per minute default)
//! - Honeypot field check
//! - Elapsed-time bot heuristic (3 s minimum, 1 h expiry)
//! - Per-field syntactic validation with full error reporting
//!
//! Submissions are not persisted; the accept side effect is a structured
//! log record.

pub mod bot;
pub mod config;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod validator;

pub use bot::{BotChecker, BotSignal, BotVerdict};
pub use config::Config;
pub use limiter::{RateLimitResult, RateLimiter};
pub use validator::{FieldValidator, Submission, ValidationError};
