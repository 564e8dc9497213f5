//! Rolling-window rate limiting backed by an expiring key-value store.
//!
//! The store contract is a keyed counter with time-to-live semantics: the
//! store itself deletes an entry once its window lapses, so a quiet client's
//! count resets to absent, not zero. Production deployments point this at
//! Redis; tests use the in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use actix_web::HttpRequest;
use anyhow::Result;
use tracing::warn;

use crate::error::GatewayError;

/// Requests allowed per client key within one window.
const MAX_REQUESTS: u32 = 100;
/// Window length. The TTL is refreshed on every write, so the window rolls
/// with the client's most recent request rather than a calendar boundary.
const WINDOW: Duration = Duration::from_secs(15 * 60);

/// Headers consulted for the client key, most trusted first.
const CLIENT_IP_HEADERS: [&str; 2] = ["CF-Connecting-IP", "X-Real-IP"];

// ==============================
// Storage trait
// ==============================

/// An external keyed counter service with expiring entries.
///
/// Implementations may be an in-memory map (tests), a networked cache, or a
/// durable store; the limiter only relies on `get` returning `None` once an
/// entry's TTL has lapsed.
pub trait RateLimitStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}

// ==============================
// In-memory store
// ==============================

/// Process-local store for tests and single-instance deployments.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self.inner.read().expect("lock");
        Ok(guard.get(key).and_then(|(value, expires_at)| {
            if Instant::now() < *expires_at {
                Some(value.clone())
            } else {
                None
            }
        }))
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut guard = self.inner.write().expect("lock");
        // Lapsed entries are dropped opportunistically on writes.
        let now = Instant::now();
        guard.retain(|_, (_, expires_at)| now < *expires_at);
        guard.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }
}

// ==============================
// Redis store
// ==============================

pub struct RedisConnectionManager {
    client: redis::Client,
}

impl r2d2::ManageConnection for RedisConnectionManager {
    type Connection = redis::Connection;
    type Error = redis::RedisError;

    fn connect(&self) -> Result<Self::Connection, Self::Error> {
        self.client.get_connection()
    }

    fn is_valid(&self, conn: &mut Self::Connection) -> Result<(), Self::Error> {
        let _: String = redis::cmd("PING").query(conn)?;
        Ok(())
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        // r2d2 recycles on command errors.
        false
    }
}

/// Redis-backed store using `SET key value EX <ttl>`.
pub struct RedisStore {
    pool: r2d2::Pool<RedisConnectionManager>,
}

impl RedisStore {
    pub fn connect_url(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let manager = RedisConnectionManager { client };
        let max_size = std::env::var("COUPLET_REDIS_POOL_MAX")
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(16);
        let pool = r2d2::Pool::builder().max_size(max_size).build(manager)?;
        Ok(Self { pool })
    }
}

impl RateLimitStore for RedisStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.pool.get()?;
        let val: Option<String> = redis::cmd("GET").arg(key).query(&mut *conn)?;
        Ok(val)
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.pool.get()?;
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs())
            .query(&mut *conn)?;
        Ok(())
    }
}

// ==============================
// Limiter
// ==============================

/// Per-client sliding-window counter. Limits are fixed at construction:
/// 100 requests per rolling 15-minute window.
pub struct RateLimiter {
    store: Option<Arc<dyn RateLimitStore>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    /// Build the limiter. `None` disables rate limiting entirely — the
    /// documented deployment-time opt-out.
    pub fn new(store: Option<Arc<dyn RateLimitStore>>) -> Self {
        Self {
            store,
            max_requests: MAX_REQUESTS,
            window: WINDOW,
        }
    }

    #[cfg(test)]
    fn with_limits(store: Arc<dyn RateLimitStore>, max_requests: u32, window: Duration) -> Self {
        Self {
            store: Some(store),
            max_requests,
            window,
        }
    }

    /// Count this request against the caller's window.
    ///
    /// The read-then-write pair is not atomic; concurrent requests on one key
    /// may slip past the cap by a small margin. The write refreshes the TTL,
    /// which is what makes the window roll.
    pub fn check_limit(&self, req: &HttpRequest) -> Result<(), GatewayError> {
        let Some(store) = &self.store else {
            return Ok(());
        };

        let key = format!("rate_limit:{}", client_key(req));

        let count = store
            .get(&key)
            .map_err(|err| {
                warn!("rate-limit store read failed: {err}");
                GatewayError::Internal
            })?
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);

        if count >= self.max_requests {
            return Err(GatewayError::RateLimited);
        }

        store
            .put(&key, &(count + 1).to_string(), self.window)
            .map_err(|err| {
                warn!("rate-limit store write failed: {err}");
                GatewayError::Internal
            })
    }
}

/// Client identity for the limiter: trusted proxy header first, then the
/// generic real-IP header, then a shared "unknown" bucket.
fn client_key(req: &HttpRequest) -> String {
    for name in CLIENT_IP_HEADERS {
        if let Some(ip) = req.headers().get(name).and_then(|v| v.to_str().ok()) {
            let ip = ip.trim();
            if !ip.is_empty() {
                return ip.to_string();
            }
        }
    }
    "unknown".to_string()
}
