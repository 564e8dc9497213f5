#![forbid(unsafe_code)]
#![doc = r#"
Couplet Gateway

Authenticated, rate-limited HTTP gateway that fronts an OpenAI-compatible
chat-completion provider for the Couplet companion app.

Crate highlights
- Three endpoints: `/ai/message-polish`, `/ai/daily-prompt`, `/ai/weekly-summary`.
- Static bearer-token auth and a rolling per-client rate limit backed by an
  expiring key-value store (Redis in production, in-memory for tests).
- Every response, success or failure, leaves through the CORS responder so
  browser-based callers can always read the result.

Modules
- `models`: Gateway DTOs and the provider wire types.
- `upstream`: Provider client (one chat-completion call per operation).
- `rate_limit`: Rolling-window limiter over a pluggable expiring store.
- `auth`: Bearer-token gate.
- `server`: Actix router/handlers.
- `cors`: Terminal middleware stamping permissive CORS headers.
- `config` / `util`: Startup configuration and shared helpers (tracing, env,
  app state).

Note: the upstream provider is an external collaborator; the gateway issues a
single chat-completion call per request and reads back one text field.
"#]

pub mod auth;
pub mod config;
pub mod cors;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod server;
pub mod upstream;
pub mod util;

// Re-export the primary types for ergonomic library use.
pub use crate::config::GatewayConfig;
pub use crate::cors::CorsHeaders;
pub use crate::error::GatewayError;
pub use crate::rate_limit::{MemoryStore, RateLimitStore, RateLimiter, RedisStore};
pub use crate::upstream::UpstreamClient;
pub use crate::util::AppState;

// Re-export the DTO namespace for convenience (downstream users can do
// `use couplet_gateway::models::Moment`).
pub use crate::models::{Moment, Mood};
