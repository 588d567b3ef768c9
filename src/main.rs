// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact-Form Gate Service
//!
//! Validates, bot-screens, rate-limits, and logs contact-form submissions.
//!
//! ## Endpoints
//!
//! - `POST /api/contact`: submission pipeline (rate limit, bot heuristics,
//!   field validation)
//! - `GET /health`, `GET /healthz`: liveness
//! - `GET /metrics`: Prometheus counters (configurable)
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_LIMIT_MAX`: Max submissions per window per IP (default: 5)
//! - `RATE_LIMIT_WINDOW_MS`: Rate window in milliseconds (default: 60000)
//! - `MIN_ELAPSED_MS`: Minimum form-fill time in milliseconds (default: 3000)
//! - `MAX_ELAPSED_MS`: Form expiry in milliseconds (default: 3600000)
//! - `MIN_MESSAGE_LEN`: Minimum message length (default: 10)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_form_gate::{
    config::Config,
    handlers::{router, AppState},
    metrics::Metrics,
    BotChecker, FieldValidator, RateLimiter,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        max_per_window = config.rate_limit.max_per_window,
        window_ms = config.rate_limit.window_ms,
        min_elapsed_ms = config.bot.min_elapsed_ms,
        max_elapsed_ms = config.bot.max_elapsed_ms,
        min_message_len = config.validation.min_message_len,
        "Starting contact-form gate"
    );

    // Create application state
    let state = Arc::new(AppState {
        limiter: RateLimiter::new(config.rate_limit.clone()),
        bot: BotChecker::new(config.bot.clone()),
        validator: FieldValidator::new(config.validation.clone()),
        metrics: Metrics::new()?,
        config: config.clone(),
    });

    // Spawn cleanup task for elapsed rate-limit windows
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            cleanup_state.limiter.cleanup(Instant::now()).await;
        }
    });

    // Build router
    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let mut config = Config::default();
    if let Ok(addr) = std::env::var("BIND_ADDR") {
        config.bind_addr = addr;
    }
    config.rate_limit.max_per_window = env_or("RATE_LIMIT_MAX", config.rate_limit.max_per_window);
    config.rate_limit.window_ms = env_or("RATE_LIMIT_WINDOW_MS", config.rate_limit.window_ms);
    config.bot.min_elapsed_ms = env_or("MIN_ELAPSED_MS", config.bot.min_elapsed_ms);
    config.bot.max_elapsed_ms = env_or("MAX_ELAPSED_MS", config.bot.max_elapsed_ms);
    config.validation.min_message_len =
        env_or("MIN_MESSAGE_LEN", config.validation.min_message_len);
    config
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
