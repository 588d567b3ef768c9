// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact-form gate.
//!
//! One business endpoint, `POST /api/contact`, runs the submission pipeline
//! in fixed order: rate limiter, bot heuristics, field validation. The first
//! failing stage determines the response; the field validator is the
//! exception and reports its full error set at once.

use crate::bot::{BotChecker, BotVerdict};
use crate::config::Config;
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::metrics::{Metrics, RejectStage};
use crate::validator::{FieldValidator, Submission, ValidationError};
use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Body of the 429 response. The wording is load-bearing: the frontend
/// surfaces it verbatim.
pub const RATE_LIMIT_MESSAGE: &str =
    "Too many contact form submissions. Please try again later.";

/// Body of the 200 response.
pub const CONFIRMATION_MESSAGE: &str =
    "Thank you for your message! We'll get back to you soon.";

/// Shared application state, assembled by the composition root.
pub struct AppState {
    pub limiter: RateLimiter,
    pub bot: BotChecker,
    pub validator: FieldValidator,
    pub metrics: Metrics,
    pub config: Config,
}

/// Single-message response body (200 confirmations, 429 denials).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Structured error response body (400). One entry per failed rule; bot
/// rejections use the same shape so the frontend can key its generic
/// "submission blocked" display off the `honeypot` / `form_timestamp` paths.
#[derive(Debug, Serialize)]
pub struct ErrorsResponse {
    pub errors: Vec<ValidationError>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-form-gate",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handle a contact-form submission.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.metrics.record_received();
    let ip = addr.ip();

    // Rate limit before spending any parsing work on the body
    match state.limiter.check(ip, Instant::now()).await {
        RateLimitResult::Limited { retry_after } => {
            info!(
                %ip,
                retry_after_secs = retry_after.as_secs(),
                "Submission rate limited"
            );
            state.metrics.record_rejected(RejectStage::RateLimit);
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after.as_secs().to_string())],
                Json(MessageResponse {
                    message: RATE_LIMIT_MESSAGE.to_string(),
                }),
            )
                .into_response();
        }
        RateLimitResult::Allowed { remaining, .. } => {
            debug!(%ip, remaining, "Within rate limit");
        }
    }

    let submission = match decode_submission(&headers, &body) {
        Ok(submission) => submission,
        Err(response) => return response,
    };

    let verdict = state.bot.check(
        &submission.honeypot,
        &submission.form_timestamp,
        Utc::now().timestamp_millis(),
    );
    if let BotVerdict::Rejected(signal) = verdict {
        info!(%ip, %signal, "Submission flagged as automated");
        state.metrics.record_rejected(RejectStage::Bot);
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorsResponse {
                errors: vec![signal.into()],
            }),
        )
            .into_response();
    }

    let errors = state.validator.validate(&submission);
    if !errors.is_empty() {
        debug!(%ip, error_count = errors.len(), "Submission failed field validation");
        state.metrics.record_rejected(RejectStage::Validation);
        return (StatusCode::BAD_REQUEST, Json(ErrorsResponse { errors })).into_response();
    }

    // The accept side effect: a structured log record. Field content is
    // untrusted and goes in fields, never interpolated into the message.
    info!(
        %ip,
        first_name = %submission.first_name.trim(),
        last_name = %submission.last_name.trim(),
        email = %submission.email.trim(),
        message = %submission.message.trim(),
        "Contact form submission accepted"
    );
    state.metrics.record_accepted();

    (
        StatusCode::OK,
        Json(MessageResponse {
            message: CONFIRMATION_MESSAGE.to_string(),
        }),
    )
        .into_response()
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    if !state.config.metrics.enabled {
        return StatusCode::NOT_FOUND.into_response();
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
        .into_response()
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let metrics_path = state.config.metrics.path.clone();
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/contact", post(submit))
        .route(&metrics_path, get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Decode a submission from a JSON or form-encoded request body.
fn decode_submission(headers: &HeaderMap, body: &Bytes) -> Result<Submission, Response> {
    // Media type only; charset parameters are irrelevant here
    let media_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.split(';').next().unwrap_or(s).trim().to_lowercase());

    let parsed = match media_type.as_deref() {
        Some("application/json") => {
            serde_json::from_slice::<Submission>(body).map_err(|e| e.to_string())
        }
        Some("application/x-www-form-urlencoded") => {
            serde_urlencoded::from_bytes::<Submission>(body).map_err(|e| e.to_string())
        }
        other => {
            warn!(content_type = ?other, "Unsupported content type");
            return Err((
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(MessageResponse {
                    message: "Content-Type must be application/json or \
                              application/x-www-form-urlencoded"
                        .to_string(),
                }),
            )
                .into_response());
        }
    };

    parsed.map_err(|err| {
        warn!(error = %err, "Malformed request body");
        (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse {
                message: "Malformed request body".to_string(),
            }),
        )
            .into_response()
    })
}
