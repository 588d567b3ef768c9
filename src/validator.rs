// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact-form field validator.
//!
//! Applies per-field syntactic rules to a submission:
//! - name fields: presence, length, restricted character class
//! - email: presence, address shape, length after normalization
//! - message: presence, minimum and maximum length
//!
//! Validation is a pure function of the submission: all rules run, in
//! declaration order, and every failure is reported. Nothing here sanitizes
//! input beyond trimming and email normalization; downstream sinks must treat
//! field content as untrusted.

use crate::config::ValidationConfig;
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A contact-form submission as received off the wire.
///
/// All fields default to empty so missing keys surface as "required" errors
/// instead of deserialization failures. `form_timestamp` is a string-encoded
/// integer in epoch milliseconds, set client-side at page load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub honeypot: String,
    #[serde(default)]
    pub form_timestamp: String,
}

/// One failed rule, serialized as `{ "path": ..., "msg": ... }`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the offending field
    pub path: &'static str,
    /// Human-readable message
    pub msg: String,
}

impl ValidationError {
    pub fn new(path: &'static str, msg: impl Into<String>) -> Self {
        Self {
            path,
            msg: msg.into(),
        }
    }
}

/// Contact-form field validator.
pub struct FieldValidator {
    config: ValidationConfig,
}

impl FieldValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a submission, returning every rule failure in declaration
    /// order: `first_name`, `last_name`, `email`, `message`. An empty result
    /// means the submission is valid.
    pub fn validate(&self, submission: &Submission) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        errors.extend(self.check_name("first_name", "First name", &submission.first_name));
        errors.extend(self.check_name("last_name", "Last name", &submission.last_name));
        errors.extend(self.check_email(&submission.email));
        errors.extend(self.check_message(&submission.message));
        errors
    }

    fn check_name(&self, path: &'static str, label: &str, raw: &str) -> Vec<ValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return vec![ValidationError::new(path, format!("{label} is required"))];
        }

        let mut errors = Vec::new();
        if value.chars().count() > self.config.max_name_len {
            errors.push(ValidationError::new(
                path,
                format!(
                    "{label} must be {} characters or fewer",
                    self.config.max_name_len
                ),
            ));
        }
        if !value.chars().all(is_name_char) {
            errors.push(ValidationError::new(
                path,
                format!("{label} may only contain letters, spaces, hyphens, apostrophes, and periods"),
            ));
        }
        errors
    }

    fn check_email(&self, raw: &str) -> Vec<ValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return vec![ValidationError::new("email", "Email is required")];
        }

        let normalized = match normalize_email(value) {
            Some(n) => n,
            None => {
                return vec![ValidationError::new(
                    "email",
                    "Email must be a valid email address",
                )];
            }
        };

        let mut errors = Vec::new();
        if normalized.chars().count() > self.config.max_email_len {
            errors.push(ValidationError::new(
                "email",
                format!(
                    "Email must be {} characters or fewer",
                    self.config.max_email_len
                ),
            ));
        }
        errors
    }

    fn check_message(&self, raw: &str) -> Vec<ValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return vec![ValidationError::new("message", "Message is required")];
        }

        let mut errors = Vec::new();
        let len = value.chars().count();
        if len < self.config.min_message_len {
            errors.push(ValidationError::new(
                "message",
                format!(
                    "Message must be at least {} characters",
                    self.config.min_message_len
                ),
            ));
        }
        if len > self.config.max_message_len {
            errors.push(ValidationError::new(
                "message",
                format!(
                    "Message must be {} characters or fewer",
                    self.config.max_message_len
                ),
            ));
        }
        errors
    }
}

/// Characters allowed in name fields.
fn is_name_char(c: char) -> bool {
    c.is_alphabetic() || c.is_whitespace() || matches!(c, '-' | '\'' | '.')
}

/// Normalize an email address: case-fold the domain and strip a trailing
/// root dot. Returns `None` when the address does not parse or the domain
/// carries no TLD. The local part is left intact; provider-specific local
/// rewrites (Gmail dot-stripping and the like) are not attempted.
pub fn normalize_email(raw: &str) -> Option<String> {
    // Normalize before parsing: the address parser rejects a root dot, so a
    // trailing-dot domain must be stripped first or it never reaches the
    // shape check.
    let (local, domain) = raw.rsplit_once('@')?;
    let domain = domain.trim_end_matches('.').to_lowercase();
    if local.is_empty() || !domain.contains('.') {
        return None;
    }

    let candidate = format!("{local}@{domain}");
    if EmailAddress::from_str(&candidate).is_err() {
        return None;
    }
    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_validator() -> FieldValidator {
        FieldValidator::new(ValidationConfig::default())
    }

    fn valid_submission() -> Submission {
        Submission {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            message: "I would like to get in touch about your service.".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_submission_passes() {
        let validator = default_validator();
        assert!(validator.validate(&valid_submission()).is_empty());
    }

    #[test]
    fn test_missing_first_name_reports_required() {
        let validator = default_validator();
        let submission = Submission {
            first_name: "   ".to_string(),
            ..valid_submission()
        };

        let errors = validator.validate(&submission);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "first_name");
        assert!(errors[0].msg.contains("required"));
    }

    #[test]
    fn test_name_character_class() {
        let validator = default_validator();

        // Accented letters, hyphens, apostrophes, and periods are all fine
        for name in ["Anne-Marie", "O'Brien", "J. R.", "Søren"] {
            let submission = Submission {
                last_name: name.to_string(),
                ..valid_submission()
            };
            assert!(
                validator.validate(&submission).is_empty(),
                "{name} should be accepted"
            );
        }

        let submission = Submission {
            last_name: "Robert; DROP TABLE".to_string(),
            ..valid_submission()
        };
        let errors = validator.validate(&submission);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "last_name");
    }

    #[test]
    fn test_name_too_long() {
        let validator = default_validator();
        let submission = Submission {
            first_name: "a".repeat(51),
            ..valid_submission()
        };

        let errors = validator.validate(&submission);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "first_name");
        assert!(errors[0].msg.contains("50"));
    }

    #[test]
    fn test_invalid_email_shapes_rejected() {
        let validator = default_validator();

        for email in ["not-an-email", "missing@tld", "@example.com", "a b@example.com"] {
            let submission = Submission {
                email: email.to_string(),
                ..valid_submission()
            };
            let errors = validator.validate(&submission);
            assert_eq!(errors.len(), 1, "{email} should be rejected");
            assert_eq!(errors[0].path, "email");
        }
    }

    #[test]
    fn test_trailing_dot_domain_accepted_after_normalization() {
        let validator = default_validator();
        let submission = Submission {
            email: "Ada@Example.COM.".to_string(),
            ..valid_submission()
        };
        assert!(validator.validate(&submission).is_empty());
    }

    #[test]
    fn test_email_over_length_cap() {
        let validator = default_validator();
        // Well-formed (labels under 63, local under 64) but 123 characters
        // after normalization
        let submission = Submission {
            email: format!("{}@{}.example.com", "a".repeat(60), "b".repeat(50)),
            ..valid_submission()
        };

        let errors = validator.validate(&submission);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "email");
        assert!(errors[0].msg.contains("100"));
    }

    #[test]
    fn test_message_too_short() {
        let validator = default_validator();
        let submission = Submission {
            message: "Hi".to_string(),
            ..valid_submission()
        };

        let errors = validator.validate(&submission);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "message");
        assert!(errors[0].msg.contains("at least 10"));
    }

    #[test]
    fn test_message_over_maximum_length() {
        let validator = default_validator();
        let submission = Submission {
            message: "a".repeat(2001),
            ..valid_submission()
        };

        let errors = validator.validate(&submission);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "message");
        assert!(errors[0].msg.contains("2000"));
    }

    #[test]
    fn test_configurable_message_minimum() {
        // One deployed variant allowed five-character messages
        let validator = FieldValidator::new(ValidationConfig {
            min_message_len: 5,
            ..Default::default()
        });
        let submission = Submission {
            message: "Hello".to_string(),
            ..valid_submission()
        };
        assert!(validator.validate(&submission).is_empty());
    }

    #[test]
    fn test_errors_reported_in_declaration_order() {
        let validator = default_validator();
        let submission = Submission {
            honeypot: String::new(),
            form_timestamp: String::new(),
            ..Default::default()
        };

        let errors = validator.validate(&submission);
        let paths: Vec<_> = errors.iter().map(|e| e.path).collect();
        assert_eq!(paths, vec!["first_name", "last_name", "email", "message"]);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let validator = default_validator();
        let submission = Submission {
            first_name: String::new(),
            message: "Hi".to_string(),
            ..valid_submission()
        };

        let first = validator.validate(&submission);
        let second = validator.validate(&submission);
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("Ada@Example.COM.").as_deref(),
            Some("Ada@example.com")
        );
        assert_eq!(normalize_email("ada@localhost"), None);
        assert_eq!(normalize_email("not-an-email"), None);
    }
}
