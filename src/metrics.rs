// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the contact-form gate.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Pipeline stage that rejected a submission, used as a metric label.
#[derive(Debug, Clone, Copy)]
pub enum RejectStage {
    RateLimit,
    Bot,
    Validation,
}

impl RejectStage {
    fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimit => "rate_limit",
            Self::Bot => "bot",
            Self::Validation => "validation",
        }
    }
}

/// Counters for the submission pipeline.
pub struct Metrics {
    registry: Registry,
    received: IntCounter,
    accepted: IntCounter,
    rejected: IntCounterVec,
}

impl Metrics {
    /// Create a registry with the pipeline counters registered.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let received = IntCounter::with_opts(Opts::new(
            "contact_submissions_received_total",
            "Contact-form submissions received",
        ))?;
        let accepted = IntCounter::with_opts(Opts::new(
            "contact_submissions_accepted_total",
            "Contact-form submissions accepted",
        ))?;
        let rejected = IntCounterVec::new(
            Opts::new(
                "contact_submissions_rejected_total",
                "Contact-form submissions rejected, by pipeline stage",
            ),
            &["stage"],
        )?;

        registry.register(Box::new(received.clone()))?;
        registry.register(Box::new(accepted.clone()))?;
        registry.register(Box::new(rejected.clone()))?;

        Ok(Self {
            registry,
            received,
            accepted,
            rejected,
        })
    }

    pub fn record_received(&self) {
        self.received.inc();
    }

    pub fn record_accepted(&self) {
        self.accepted.inc();
    }

    pub fn record_rejected(&self, stage: RejectStage) {
        self.rejected.with_label_values(&[stage.as_str()]).inc();
    }

    /// Render the registry in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if encoder.encode(&self.registry.gather(), &mut buf).is_err() {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}
