use std::sync::Arc;

use crate::api::rate_limit::RateLimiter;
use crate::config::{AppConfig, ServerConfig};
use crate::planner::Planner;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<Planner>,
    pub rate_limiter: Arc<RateLimiter>,
    pub server: ServerConfig,
}

impl AppState {
    pub fn new(planner: Planner, config: &AppConfig) -> Self {
        Self {
            planner: Arc::new(planner),
            rate_limiter: Arc::new(RateLimiter::from_config(&config.rate_limit)),
            server: config.server.clone(),
        }
    }

    /// Name reported by `/health`; "catalog" when no AI backend is configured.
    pub fn ai_backend_name(&self) -> &'static str {
        self.planner.backend_name().unwrap_or("catalog")
    }
}
