// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Anti-automation heuristics for contact-form submissions.
//!
//! Two signals, checked in order:
//! 1. A honeypot field rendered invisibly in the form; humans leave it empty.
//! 2. A client-set timestamp from page load; the elapsed time at submission
//!    must fall inside a configured window (too fast = scripted fill, too old
//!    = replayed form).
//!
//! The current time is an explicit parameter so the checks are deterministic
//! under test.

use crate::config::BotConfig;
use crate::validator::ValidationError;
use thiserror::Error;
use tracing::debug;

/// Reason a submission was flagged as automated.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BotSignal {
    #[error("Bot detected via honeypot")]
    HoneypotTripped,

    #[error("Missing or invalid timestamp")]
    InvalidTimestamp,

    #[error("Form submitted too quickly")]
    TooQuick,

    #[error("Form expired, please reload the page")]
    Expired,
}

impl BotSignal {
    /// The field path reported in the error payload. The frontend keys its
    /// generic "submission blocked" display off these two paths.
    pub fn path(&self) -> &'static str {
        match self {
            Self::HoneypotTripped => "honeypot",
            Self::InvalidTimestamp | Self::TooQuick | Self::Expired => "form_timestamp",
        }
    }
}

impl From<BotSignal> for ValidationError {
    fn from(signal: BotSignal) -> Self {
        ValidationError::new(signal.path(), signal.to_string())
    }
}

/// Result of a bot check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotVerdict {
    /// No automation signal detected
    Pass,
    /// Submission flagged as automated
    Rejected(BotSignal),
}

impl BotVerdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, BotVerdict::Pass)
    }
}

/// Contact-form bot heuristic checker.
pub struct BotChecker {
    config: BotConfig,
}

impl BotChecker {
    /// Create a new checker with the given configuration.
    pub fn new(config: BotConfig) -> Self {
        Self { config }
    }

    /// Evaluate both signals for a submission. `now_ms` is the server's
    /// current wall-clock time in epoch milliseconds. The first failing
    /// signal wins; the honeypot is checked before the timestamp.
    pub fn check(&self, honeypot: &str, form_timestamp: &str, now_ms: i64) -> BotVerdict {
        if !honeypot.trim().is_empty() {
            debug!("Honeypot field filled, flagging as bot");
            return BotVerdict::Rejected(BotSignal::HoneypotTripped);
        }

        let submitted_at: i64 = match form_timestamp.trim().parse() {
            Ok(ts) => ts,
            Err(_) => {
                debug!(form_timestamp, "Unparsable form timestamp");
                return BotVerdict::Rejected(BotSignal::InvalidTimestamp);
            }
        };

        // A client clock ahead of the server makes elapsed negative, which
        // lands in the too-quick branch. Known false-positive source, kept
        // as-is from the original heuristic.
        let elapsed = now_ms - submitted_at;
        if elapsed < self.config.min_elapsed_ms {
            debug!(elapsed, "Form submitted below minimum elapsed time");
            return BotVerdict::Rejected(BotSignal::TooQuick);
        }
        if self.config.enforce_expiry && elapsed > self.config.max_elapsed_ms {
            debug!(elapsed, "Form past maximum elapsed time");
            return BotVerdict::Rejected(BotSignal::Expired);
        }

        BotVerdict::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MS: i64 = 1_700_000_000_000;

    fn default_checker() -> BotChecker {
        BotChecker::new(BotConfig::default())
    }

    fn ts(elapsed_ms: i64) -> String {
        (NOW_MS - elapsed_ms).to_string()
    }

    #[test]
    fn test_honeypot_trips_regardless_of_timestamp() {
        let checker = default_checker();
        let verdict = checker.check("http://spam.example", &ts(10_000), NOW_MS);
        assert_eq!(verdict, BotVerdict::Rejected(BotSignal::HoneypotTripped));
    }

    #[test]
    fn test_missing_timestamp_rejected() {
        let checker = default_checker();
        assert_eq!(
            checker.check("", "", NOW_MS),
            BotVerdict::Rejected(BotSignal::InvalidTimestamp)
        );
        assert_eq!(
            checker.check("", "not-a-number", NOW_MS),
            BotVerdict::Rejected(BotSignal::InvalidTimestamp)
        );
    }

    #[test]
    fn test_too_quick_rejected() {
        let checker = default_checker();
        assert_eq!(
            checker.check("", &ts(2_999), NOW_MS),
            BotVerdict::Rejected(BotSignal::TooQuick)
        );
    }

    #[test]
    fn test_expired_rejected() {
        let checker = default_checker();
        assert_eq!(
            checker.check("", &ts(3_600_001), NOW_MS),
            BotVerdict::Rejected(BotSignal::Expired)
        );
    }

    #[test]
    fn test_elapsed_inside_window_passes() {
        let checker = default_checker();
        assert!(checker.check("", &ts(3_000), NOW_MS).is_pass());
        assert!(checker.check("", &ts(10_000), NOW_MS).is_pass());
        assert!(checker.check("", &ts(3_600_000), NOW_MS).is_pass());
    }

    #[test]
    fn test_client_clock_ahead_counts_as_too_quick() {
        let checker = default_checker();
        // Timestamp five seconds in the server's future
        assert_eq!(
            checker.check("", &ts(-5_000), NOW_MS),
            BotVerdict::Rejected(BotSignal::TooQuick)
        );
    }

    #[test]
    fn test_expiry_check_can_be_disabled() {
        let checker = BotChecker::new(BotConfig {
            enforce_expiry: false,
            ..Default::default()
        });
        assert!(checker.check("", &ts(7_200_000), NOW_MS).is_pass());
    }

    #[test]
    fn test_signal_paths() {
        assert_eq!(BotSignal::HoneypotTripped.path(), "honeypot");
        assert_eq!(BotSignal::TooQuick.path(), "form_timestamp");
        assert_eq!(BotSignal::Expired.path(), "form_timestamp");
        assert_eq!(BotSignal::InvalidTimestamp.path(), "form_timestamp");
    }
}
