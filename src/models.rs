//! Gateway DTOs and the provider wire types.
//!
//! The gateway owns no durable entities; everything here lives for one
//! request. Input shapes mirror what the mobile client sends, unknown fields
//! are ignored, and missing scalar fields decode to empty strings so a
//! partially-filled moment still renders into the prompt.

use serde::{Deserialize, Serialize};

// ==============================
// Gateway surface
// ==============================

/// One journal moment, supplied by the caller for a weekly digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Moment {
    #[serde(default)]
    pub id: String,
    /// Kind tag ("text", "photo", "voice", ...).
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: String,
    /// ISO-8601 creation timestamp, rendered verbatim into the prompt.
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "authorID", default)]
    pub author_id: String,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(rename = "voiceURL", default, skip_serializing_if = "Option::is_none")]
    pub voice_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mood {
    pub emoji: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct MessagePolishResponse {
    #[serde(rename = "polishedText")]
    pub polished_text: String,
}

#[derive(Debug, Serialize)]
pub struct DailyPromptResponse {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct WeeklySummaryResponse {
    pub summary: String,
}

// ==============================
// Provider wire types
// ==============================

/// Chat-completion request sent upstream. Sampling settings are fixed per
/// operation by the upstream client.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// The slice of the provider reply the gateway reads; everything else in the
/// payload is ignored.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatReplyMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatReplyMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// The first choice's message content, if the provider returned any text.
    /// An empty string counts as no reply so the per-operation fallbacks
    /// apply.
    pub fn first_content(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.clone())
            .filter(|content| !content.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn moment_decodes_the_client_wire_shape() {
        let moment: Moment = serde_json::from_value(json!({
            "id": "m1",
            "type": "text",
            "content": "coffee together",
            "createdAt": "2026-08-01T09:00:00Z",
            "authorID": "user-a",
            "photoURL": "https://example.com/p.jpg",
            "mood": {"emoji": "🥰", "label": "loved"}
        }))
        .unwrap();

        assert_eq!(moment.kind, "text");
        assert_eq!(moment.created_at, "2026-08-01T09:00:00Z");
        assert_eq!(moment.author_id, "user-a");
        assert_eq!(moment.photo_url.as_deref(), Some("https://example.com/p.jpg"));
        assert_eq!(moment.mood.unwrap().label, "loved");
    }

    #[test]
    fn partial_moment_decodes_with_defaults() {
        let moment: Moment = serde_json::from_value(json!({"content": "hi"})).unwrap();
        assert_eq!(moment.content, "hi");
        assert_eq!(moment.kind, "");
        assert_eq!(moment.created_at, "");
        assert!(moment.mood.is_none());
    }

    #[test]
    fn first_content_skips_empty_replies() {
        let empty: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": ""}}]
        }))
        .unwrap();
        assert_eq!(empty.first_content(), None);

        let null: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert_eq!(null.first_content(), None);

        let missing: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.first_content(), None);

        let present: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "hello"}}]
        }))
        .unwrap();
        assert_eq!(present.first_content(), Some("hello".to_string()));
    }

    #[test]
    fn polish_response_uses_the_camel_case_field() {
        let body = serde_json::to_value(MessagePolishResponse {
            polished_text: "softer words".into(),
        })
        .unwrap();
        assert_eq!(body, json!({"polishedText": "softer words"}));
    }
}
