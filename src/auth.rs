//! Bearer-token gate for inbound requests.
//!
//! The gateway authenticates callers against a single static token shared
//! with the mobile client. The check is pure: no side effects, no external
//! state.

use actix_web::http::header;
use actix_web::HttpRequest;

use crate::error::GatewayError;

/// Validate the `Authorization` header against the configured static token.
///
/// A missing header and a wrong token are reported with distinct messages so
/// client logs stay actionable; both map to 401. The bearer value is the
/// header with a literal `"Bearer "` prefix stripped, compared by exact
/// match.
pub fn require_bearer(req: &HttpRequest, expected_token: &str) -> Result<(), GatewayError> {
    let raw = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(raw) = raw else {
        return Err(GatewayError::Unauthorized("Missing Authorization header"));
    };

    let token = raw.strip_prefix("Bearer ").unwrap_or(raw);
    if token != expected_token {
        return Err(GatewayError::Unauthorized("Invalid API token"));
    }
    Ok(())
}
