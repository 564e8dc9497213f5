//! Provider client: one chat-completion call per gateway operation.
//!
//! Each operation carries a fixed system instruction and sampling settings.
//! An empty reply substitutes the operation's fallback instead of failing —
//! the caller always receives usable text. Provider error detail stays in
//! [`UpstreamError`] for server-side logging; handlers surface only a
//! generic per-operation message.

use http::StatusCode;
use thiserror::Error;

use crate::config::GatewayConfig;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Moment};

const POLISH_SYSTEM_PROMPT: &str = "You are a romantic writing assistant. Rewrite the given text \
     in a soft, loving, romantic tone while preserving its core meaning and sentiment. Be gentle \
     and tender.";

const DAILY_PROMPT_SYSTEM_PROMPT: &str = "Generate a gentle, romantic daily prompt for couples \
     to reflect on their relationship. Keep it sweet, meaningful, and easy to respond to. Return \
     only the prompt, no extra text.";

const WEEKLY_SUMMARY_SYSTEM_PROMPT: &str = "You are a romantic assistant for couples. Create a \
     sweet, heartfelt weekly summary of their moments together. Highlight themes of love, \
     connection, and growth. Be warm and tender.";

/// Served when the provider returns no text for a daily prompt.
const DEFAULT_DAILY_PROMPT: &str = "What's on your mind today?";
/// Served when the provider returns no text for a weekly summary.
const DEFAULT_WEEKLY_SUMMARY: &str = "A beautiful week together.";

/// Transport or provider failure on the upstream call. Logged server-side;
/// never shown to the caller.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Client for the chat-completion provider.
pub struct UpstreamClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl UpstreamClient {
    pub fn new(http: reqwest::Client, config: &GatewayConfig) -> Self {
        Self {
            http,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    /// Rewrite a draft message in a softer, romantic register. Falls back to
    /// the caller's own text when the provider returns nothing.
    pub async fn polish_message(&self, text: &str) -> Result<String, UpstreamError> {
        let reply = self
            .chat_completion(POLISH_SYSTEM_PROMPT, text.to_string(), 0.7, 500)
            .await?;
        Ok(reply.unwrap_or_else(|| text.to_string()))
    }

    /// Generate a reflective prompt for couples.
    pub async fn daily_prompt(&self) -> Result<String, UpstreamError> {
        let reply = self
            .chat_completion(
                DAILY_PROMPT_SYSTEM_PROMPT,
                "Generate today's daily prompt for couples.".to_string(),
                0.8,
                200,
            )
            .await?;
        Ok(reply.unwrap_or_else(|| DEFAULT_DAILY_PROMPT.to_string()))
    }

    /// Summarize a week of moments as a warm narrative.
    pub async fn weekly_summary(&self, moments: &[Moment]) -> Result<String, UpstreamError> {
        let user = format!(
            "Create a weekly summary from these moments:\n\n{}",
            render_moments(moments)
        );
        let reply = self
            .chat_completion(WEEKLY_SUMMARY_SYSTEM_PROMPT, user, 0.7, 800)
            .await?;
        Ok(reply.unwrap_or_else(|| DEFAULT_WEEKLY_SUMMARY.to_string()))
    }

    /// Issue a single chat-completion call and extract the first choice's
    /// text. `Ok(None)` means the provider answered without usable content.
    async fn chat_completion(
        &self,
        system: &str,
        user: String,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<Option<String>, UpstreamError> {
        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        let reply: ChatCompletionResponse = response.json().await?;
        Ok(reply.first_content())
    }
}

/// Render moments one per line, caller order preserved:
/// `[<createdAt>] <type>: <content>`.
fn render_moments(moments: &[Moment]) -> String {
    moments
        .iter()
        .map(|m| format!("[{}] {}: {}", m.created_at, m.kind, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}
