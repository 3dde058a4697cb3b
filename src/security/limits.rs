//! In-flight request limits.
//!
//! # Responsibilities
//! - Bound the number of requests being forwarded at once
//!
//! # Design Decisions
//! - Semaphore-based: excess requests wait for a slot instead of failing
//! - The permit is held until the response head is produced

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Semaphore;

/// Shared limiter state.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimit {
    permits: Arc<Semaphore>,
}

impl ConcurrencyLimit {
    /// Allow at most `max` requests in flight.
    pub fn new(max: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max)),
        }
    }
}

/// Middleware enforcing [`ConcurrencyLimit`].
pub async fn concurrency_limit_middleware(
    State(limit): State<ConcurrencyLimit>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Ok(_permit) = limit.permits.clone().acquire_owned().await else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };
    next.run(request).await
}
