use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

/// Header carrying the correlation ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation ID for one request, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug)]
struct SearchWindow {
    opened_at: Instant,
    used: usize,
}

/// Fixed-window budget shared by every search request.
///
/// Layered on the search routes only.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    current: Arc<Mutex<SearchWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            current: Arc::new(Mutex::new(SearchWindow {
                opened_at: Instant::now(),
                used: 0,
            })),
        }
    }

    #[must_use]
    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }

    /// Take one slot from the current window.
    ///
    /// Returns the time left until the window reopens when it is full.
    async fn try_acquire(&self) -> Result<(), Duration> {
        let mut current = self.current.lock().await;
        let elapsed = current.opened_at.elapsed();
        if elapsed >= self.window {
            current.opened_at = Instant::now();
            current.used = 0;
        } else if current.used >= self.max_requests {
            return Err(self.window - elapsed);
        }
        current.used += 1;
        Ok(())
    }
}

/// Reuse the caller's `x-request-id` or mint a `UUIDv4`.
///
/// The ID goes into request extensions as [`RequestId`] and is echoed on the
/// response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

/// Reject searches past the window budget with 429 `rate_limited`.
///
/// The rejection uses the same error envelope as the handlers and carries a
/// `retry-after` header in whole seconds.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let retry_in = match rate_limit.try_acquire().await {
        Ok(()) => return next.run(req).await,
        Err(retry_in) => retry_in,
    };

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map_or_else(String::new, |id| id.0.clone());
    let retry_secs = retry_in.as_secs().max(1);
    tracing::warn!(
        request_id = %request_id,
        path = %req.uri().path(),
        retry_secs,
        "search rate limit exceeded"
    );

    let mut res = ApiError::new(
        request_id,
        "rate_limited",
        format!("too many searches; try again in {retry_secs}s"),
    )
    .into_response();
    res.headers_mut()
        .insert(RETRY_AFTER, HeaderValue::from(retry_secs));
    res
}
