//! Startup configuration, read once from the environment.

use anyhow::{anyhow, Result};

/// Model used for every operation unless `COUPLET_MODEL` overrides it.
const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";

/// Environment-provided configuration, injected into the app state at
/// startup. Nothing in the request path reads the environment directly.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Static shared secret expected in `Authorization: Bearer <token>`.
    pub api_token: String,
    /// Provider API key for outbound chat-completion calls.
    pub openai_api_key: String,
    /// Provider base URL, e.g. `https://api.openai.com/v1`.
    pub openai_base_url: String,
    /// Model id sent with every chat-completion request.
    pub model: String,
    /// Redis URL for the rate-limit store. Absent disables rate limiting.
    pub redis_url: Option<String>,
}

impl GatewayConfig {
    /// Read the full configuration from the environment.
    ///
    /// `COUPLET_API_TOKEN` and `OPENAI_API_KEY` are required; everything else
    /// has a default. An absent `COUPLET_REDIS_URL` is a deployment-time
    /// opt-out of rate limiting, not an error.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_token: require_env("COUPLET_API_TOKEN")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: openai_base_url(),
            model: env_or("COUPLET_MODEL", DEFAULT_MODEL),
            redis_url: env_nonempty("COUPLET_REDIS_URL"),
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    env_nonempty(name).ok_or_else(|| anyhow!("{name} must be set"))
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_nonempty(name).unwrap_or_else(|| default.to_string())
}

/// Resolve the provider base URL from environment or use the default public
/// endpoint.
pub fn openai_base_url() -> String {
    match env_nonempty("OPENAI_BASE_URL") {
        Some(val) => val,
        None => {
            static LOGGED: std::sync::OnceLock<()> = std::sync::OnceLock::new();
            LOGGED.get_or_init(|| {
                tracing::warn!("OPENAI_BASE_URL not set; defaulting to https://api.openai.com/v1");
            });
            "https://api.openai.com/v1".into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_var_is_an_error() {
        std::env::remove_var("COUPLET_API_TOKEN");
        let err = require_env("COUPLET_API_TOKEN").unwrap_err();
        assert!(err.to_string().contains("COUPLET_API_TOKEN"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        std::env::set_var("COUPLET_TEST_BLANK", "   ");
        assert_eq!(env_nonempty("COUPLET_TEST_BLANK"), None);
        assert_eq!(env_or("COUPLET_TEST_BLANK", "fallback"), "fallback");
        std::env::remove_var("COUPLET_TEST_BLANK");
    }
}
