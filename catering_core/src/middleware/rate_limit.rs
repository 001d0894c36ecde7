//! Per-IP sliding-window rate limiting for form submissions

use crate::config::RateLimitConfig;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

struct ClientWindows {
    hits: HashMap<IpAddr, Vec<Instant>>,
    last_sweep: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    clients: Arc<Mutex<ClientWindows>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window_seconds: u64) -> Self {
        Self {
            clients: Arc::new(Mutex::new(ClientWindows {
                hits: HashMap::new(),
                last_sweep: Instant::now(),
            })),
            max_requests,
            window: Duration::from_secs(window_seconds),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window_seconds)
    }

    /// Number of client addresses currently holding a window.
    pub fn tracked_clients(&self) -> usize {
        self.clients.lock().hits.len()
    }

    /// Records the request and returns how many remain in the window.
    pub fn check(&self, ip: IpAddr) -> Result<usize, RateLimitError> {
        let now = Instant::now();
        let window = self.window;
        let mut clients = self.clients.lock();

        // At most once per window, forget clients whose last hit has expired.
        if now.duration_since(clients.last_sweep) >= window {
            clients
                .hits
                .retain(|_, hits| hits.last().is_some_and(|&last| now.duration_since(last) < window));
            clients.last_sweep = now;
        }

        let entries = clients.hits.entry(ip).or_default();
        entries.retain(|&instant| now.duration_since(instant) < self.window);

        if entries.len() >= self.max_requests {
            let oldest = entries.first().copied().unwrap_or(now);
            let reset_in = self.window.saturating_sub(now.duration_since(oldest));

            return Err(RateLimitError {
                retry_after_seconds: reset_in.as_secs().max(1),
                limit: self.max_requests,
            });
        }

        entries.push(now);
        Ok(self.max_requests - entries.len())
    }
}

#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after_seconds: u64,
    pub limit: usize,
}

fn header_value(value: impl ToString) -> HeaderValue {
    HeaderValue::from_str(&value.to_string()).unwrap_or_else(|_| HeaderValue::from_static("0"))
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": format!(
                "Too many submissions. Please retry after {} seconds",
                self.retry_after_seconds
            ),
            "status": StatusCode::TOO_MANY_REQUESTS.as_u16(),
            "retry_after": self.retry_after_seconds,
        }));

        let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
        let headers = response.headers_mut();
        headers.insert("x-ratelimit-limit", header_value(self.limit));
        headers.insert("x-ratelimit-remaining", header_value(0));
        headers.insert("retry-after", header_value(self.retry_after_seconds));
        response
    }
}

/// Only POST requests count against the limit; reads pass straight through.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, RateLimitError> {
    if request.method() != Method::POST {
        return Ok(next.run(request).await);
    }

    let ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    let remaining = limiter.check(ip)?;

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", header_value(limiter.max_requests));
    headers.insert("x-ratelimit-remaining", header_value(remaining));

    Ok(response)
}
