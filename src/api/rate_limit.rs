//! Fixed-window request limiting for `/api` routes.
//!
//! Counters live in process memory and reset when the window for a client
//! expires. Clients are keyed by peer address, falling back to the first
//! `X-Forwarded-For` entry.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::config::RateLimitConfig;

/// Above this many tracked clients, expired windows are swept on insert.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    clients: RwLock<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            clients: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(Duration::from_secs(config.window_secs), config.max_requests)
    }

    /// Count a request for `client`.
    ///
    /// Returns the seconds until the window resets when the client is over
    /// its limit.
    pub async fn check(&self, client: &str) -> Result<(), u64> {
        self.check_at(client, Instant::now()).await
    }

    async fn check_at(&self, client: &str, now: Instant) -> Result<(), u64> {
        let mut clients = self.clients.write().await;

        if clients.len() > SWEEP_THRESHOLD {
            let window = self.window;
            clients.retain(|_, w| now.duration_since(w.started) < window);
            debug!("Rate limiter swept, {} clients tracked", clients.len());
        }

        let entry = clients.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.duration_since(entry.started);
        if elapsed >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= self.max_requests {
            let remaining = self.window.saturating_sub(now.duration_since(entry.started));
            return Err(remaining.as_secs().max(1));
        }

        entry.count += 1;
        Ok(())
    }
}

fn client_key(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware rejecting clients over their request budget with 429.
pub async fn enforce(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = client_key(&request);

    if let Err(retry_after_secs) = state.rate_limiter.check(&client).await {
        warn!("Rate limit exceeded for {}", client);
        return Err(ApiError::RateLimited { retry_after_secs });
    }

    Ok(next.run(request).await)
}
