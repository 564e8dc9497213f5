//! Shared helpers: tracing/env bootstrap, HTTP client construction, and the
//! application state handed to every handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::GatewayConfig;
use crate::rate_limit::{RateLimitStore, RateLimiter, RedisStore};
use crate::upstream::UpstreamClient;

/// Initialize dotenv and structured tracing based on RUST_LOG.
///
/// `.env` is optional; values already present in the process environment
/// always win.
pub fn init_tracing() {
    let env_source = match dotenvy::dotenv() {
        Ok(path) => path.display().to_string(),
        Err(_) => "none".into(),
    };

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let subscriber = fmt().with_env_filter(EnvFilter::new(filter)).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!("Environment loaded from: {}", env_source);
}

/// Get the bind address for the HTTP server from env or default to
/// 0.0.0.0:8088.
pub fn env_bind_addr() -> String {
    std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8088".into())
}

/// Build the outbound HTTP client.
///
/// Environment:
/// - COUPLET_HTTP_TIMEOUT_SECONDS -> overall request timeout (u64)
pub fn build_http_client_from_env() -> reqwest::Client {
    let mut builder = reqwest::Client::builder();

    if let Ok(secs) = std::env::var("COUPLET_HTTP_TIMEOUT_SECONDS") {
        if let Ok(n) = secs.trim().parse::<u64>() {
            builder = builder.timeout(std::time::Duration::from_secs(n));
        }
    }

    // User-Agent for observability
    builder = builder.user_agent(format!("couplet-gateway/{}", env!("CARGO_PKG_VERSION")));

    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

/// Shared application state used by the HTTP server and handlers.
pub struct AppState {
    pub config: GatewayConfig,
    pub upstream: UpstreamClient,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Wire the full state from configuration.
    ///
    /// An absent redis URL disables rate limiting; a configured but
    /// unreachable one fails startup rather than silently running unlimited.
    pub fn from_config(config: GatewayConfig) -> Result<Self> {
        let store: Option<Arc<dyn RateLimitStore>> = match config.redis_url.as_deref() {
            Some(url) => {
                let store = RedisStore::connect_url(url)
                    .with_context(|| format!("connecting rate-limit store at {url}"))?;
                Some(Arc::new(store))
            }
            None => {
                tracing::warn!("COUPLET_REDIS_URL not set; rate limiting disabled");
                None
            }
        };

        let http = build_http_client_from_env();
        let upstream = UpstreamClient::new(http, &config);

        Ok(Self {
            config,
            upstream,
            rate_limiter: RateLimiter::new(store),
        })
    }
}
