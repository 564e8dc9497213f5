//! Error taxonomy for the request path.
//!
//! Every failure a handler can surface is converted into a `GatewayError` at
//! its origin and rendered as a structured response. The mobile client only
//! inspects the status code, but the `error` field keeps server and client
//! logs readable.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// All client-visible failures.
///
/// Each variant renders as JSON with a single `error` string field, except
/// [`GatewayError::NotFound`], which stays plain text for unknown paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Missing or invalid bearer token (401).
    #[error("{0}")]
    Unauthorized(&'static str),
    /// Client is over quota for the current window (429).
    #[error("Rate limit exceeded")]
    RateLimited,
    /// Malformed body or missing required field (400).
    #[error("Invalid request body")]
    BadRequest,
    /// Unknown path (404).
    #[error("Not Found")]
    NotFound,
    /// Provider call failed; the message is the generic per-operation text,
    /// provider detail stays in the server log (500).
    #[error("{0}")]
    Upstream(&'static str),
    /// Any other uncaught fault (500).
    #[error("Internal Server Error")]
    Internal,
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::NotFound => HttpResponse::NotFound().body("Not Found"),
            other => HttpResponse::build(other.status_code())
                .json(serde_json::json!({ "error": other.to_string() })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_the_taxonomy() {
        assert_eq!(
            GatewayError::Unauthorized("Invalid API token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            GatewayError::BadRequest.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(GatewayError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            GatewayError::Upstream("Failed to polish message").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_render_verbatim() {
        assert_eq!(
            GatewayError::Unauthorized("Missing Authorization header").to_string(),
            "Missing Authorization header"
        );
        assert_eq!(GatewayError::RateLimited.to_string(), "Rate limit exceeded");
        assert_eq!(
            GatewayError::BadRequest.to_string(),
            "Invalid request body"
        );
        assert_eq!(
            GatewayError::Internal.to_string(),
            "Internal Server Error"
        );
    }
}
