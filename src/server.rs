//! HTTP surface: the route table and the three operation handlers.
//!
//! Flow per request: auth gate → rate limiter → body validation → one
//! upstream call → JSON response. Failures short-circuit at their origin;
//! the CORS responder stamps headers on every exit path, including the 404
//! fallback and OPTIONS preflights.

use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::Value;
use tracing::error;

use crate::auth::require_bearer;
use crate::error::GatewayError;
use crate::models::{
    DailyPromptResponse, MessagePolishResponse, Moment, WeeklySummaryResponse,
};
use crate::upstream::UpstreamError;
use crate::util::AppState;

/// Configure Actix-web routes with AppState.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ai")
            .route("/message-polish", web::post().to(message_polish))
            .route("/daily-prompt", web::get().to(daily_prompt))
            .route("/weekly-summary", web::post().to(weekly_summary)),
    )
    .default_service(web::route().to(fallback));
}

/// Terminal for everything the route table doesn't match: any OPTIONS gets
/// an empty 204 with no auth or rate-limit check; anything else is 404.
async fn fallback(req: HttpRequest) -> Result<HttpResponse, GatewayError> {
    if req.method() == Method::OPTIONS {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(GatewayError::NotFound)
    }
}

/// POST /ai/message-polish — rewrite a draft message in a romantic register.
async fn message_polish(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, GatewayError> {
    require_bearer(&req, &state.config.api_token)?;
    state.rate_limiter.check_limit(&req)?;

    // `text` must be a non-empty string; anything else is the documented 400.
    let text = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v.get("text").and_then(Value::as_str).map(str::to_owned))
        .filter(|t| !t.is_empty())
        .ok_or(GatewayError::BadRequest)?;

    let polished = state
        .upstream
        .polish_message(&text)
        .await
        .map_err(|err| upstream_failure("Failed to polish message", err))?;

    Ok(HttpResponse::Ok().json(MessagePolishResponse {
        polished_text: polished,
    }))
}

/// GET /ai/daily-prompt — generate a reflective prompt for couples.
async fn daily_prompt(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, GatewayError> {
    require_bearer(&req, &state.config.api_token)?;
    state.rate_limiter.check_limit(&req)?;

    let prompt = state
        .upstream
        .daily_prompt()
        .await
        .map_err(|err| upstream_failure("Failed to generate prompt", err))?;

    Ok(HttpResponse::Ok().json(DailyPromptResponse { prompt }))
}

/// POST /ai/weekly-summary — summarize a caller-supplied list of moments.
async fn weekly_summary(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, GatewayError> {
    require_bearer(&req, &state.config.api_token)?;
    state.rate_limiter.check_limit(&req)?;

    let moments = parse_moments(&body).ok_or(GatewayError::BadRequest)?;

    let summary = state
        .upstream
        .weekly_summary(&moments)
        .await
        .map_err(|err| upstream_failure("Failed to generate summary", err))?;

    Ok(HttpResponse::Ok().json(WeeklySummaryResponse { summary }))
}

/// `moments` must be an array of moment objects; order is preserved as given.
fn parse_moments(body: &[u8]) -> Option<Vec<Moment>> {
    let mut value = serde_json::from_slice::<Value>(body).ok()?;
    let moments = value.get_mut("moments").map(Value::take)?;
    if !moments.is_array() {
        return None;
    }
    serde_json::from_value(moments).ok()
}

/// Log provider detail server-side; hand the caller only the generic
/// per-operation message.
fn upstream_failure(message: &'static str, err: UpstreamError) -> GatewayError {
    error!("{message}: {err}");
    GatewayError::Upstream(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn moments_parse_preserves_order() {
        let body = serde_json::to_vec(&json!({
            "moments": [
                {"content": "b", "createdAt": "2"},
                {"content": "a", "createdAt": "1"}
            ]
        }))
        .unwrap();
        let moments = parse_moments(&body).unwrap();
        assert_eq!(moments.len(), 2);
        assert_eq!(moments[0].content, "b");
        assert_eq!(moments[1].content, "a");
    }

    #[test]
    fn moments_must_be_an_array() {
        let body = serde_json::to_vec(&json!({"moments": "not-an-array"})).unwrap();
        assert!(parse_moments(&body).is_none());

        let body = serde_json::to_vec(&json!({})).unwrap();
        assert!(parse_moments(&body).is_none());

        assert!(parse_moments(b"not json").is_none());
    }

    #[test]
    fn empty_moment_array_is_valid() {
        let body = serde_json::to_vec(&json!({"moments": []})).unwrap();
        assert_eq!(parse_moments(&body).unwrap().len(), 0);
    }
}
