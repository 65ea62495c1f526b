// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the newsletter service.
//!
//! `POST /api/newsletter` runs a fixed pipeline: identify the client, apply
//! the rate limit, check the Content-Type, parse and validate the body, then
//! record the subscriber. Each step ends the request on failure.

use crate::blog;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{ApiError, StartupError, INTERNAL_MESSAGE};
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::metrics::Metrics;
use crate::provider::{self, SubscriptionProvider, WebhookProvider};
use crate::subscribers::SubscriberSet;
use crate::validator::EmailValidator;
use axum::{
    body::{to_bytes, Body},
    extract::{Path, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Identity used when no forwarding header names the client.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Upper bound on a submission body; anything larger is treated as garbage.
const MAX_BODY_BYTES: usize = 16 * 1024;

const SUBSCRIBED_MESSAGE: &str = "Subscribed successfully!";
const ALREADY_SUBSCRIBED_MESSAGE: &str = "This email is already subscribed!";

/// Shared application state.
pub struct AppState {
    pub limiter: Arc<RateLimiter>,
    pub subscribers: SubscriberSet,
    pub validator: EmailValidator,
    pub provider: Option<Arc<dyn SubscriptionProvider>>,
    pub clock: Arc<dyn Clock>,
    pub metrics: Metrics,
    pub config: Config,
}

impl AppState {
    /// Build state with the system clock and the configured provider.
    pub fn new(config: Config) -> Result<Self, StartupError> {
        let provider = WebhookProvider::from_config(&config.provider)?;
        Self::with_parts(config, Arc::new(SystemClock), provider)
    }

    /// Build state from explicit collaborators.
    pub fn with_parts(
        config: Config,
        clock: Arc<dyn Clock>,
        provider: Option<Arc<dyn SubscriptionProvider>>,
    ) -> Result<Self, StartupError> {
        Ok(Self {
            limiter: Arc::new(RateLimiter::new(clock.clone())),
            subscribers: SubscriberSet::new(),
            validator: EmailValidator::new(config.validation.clone()),
            provider,
            clock,
            metrics: Metrics::new()?,
            config,
        })
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Success response body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Outcome of an accepted submission.
#[derive(Debug)]
enum Subscription {
    Created,
    AlreadySubscribed,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/api/newsletter", post(subscribe))
        .route("/api/blog", get(blog_index))
        .route("/api/blog/:slug", get(blog_post));

    if state.config.metrics.enabled {
        app = app.route(&state.config.metrics.path, get(metrics));
    }

    let mut app = app
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&state.config.server.allowed_origins) {
        app = app.layer(cors);
    }

    app.with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "newsletter-gate",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Derive the rate limit identity from forwarding headers.
///
/// First entry of `X-Forwarded-For`, then `X-Real-IP`, then
/// [`UNKNOWN_IDENTITY`]. Blank values fall through to the next source.
pub fn client_identity(headers: &HeaderMap) -> String {
    header_str(headers, "x-forwarded-for")
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
        .unwrap_or(UNKNOWN_IDENTITY)
        .to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Newsletter sign-up endpoint.
pub async fn subscribe(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let identity = client_identity(&parts.headers);

    let rate = state
        .limiter
        .check(&identity, &state.config.rate_limit)
        .await;

    if !rate.allowed {
        let retry_after = rate.retry_after_secs(state.clock.now_millis());
        info!(%identity, retry_after, "Newsletter submission rate limited");

        let mut response = error_response(&ApiError::RateLimited, 0, &rate);
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        return finish(&state, response);
    }

    debug!(%identity, remaining = rate.remaining, "Processing newsletter submission");

    let response = match process_submission(&state, &parts.headers, body).await {
        Ok(Subscription::Created) => json_response(
            StatusCode::CREATED,
            MessageResponse {
                message: SUBSCRIBED_MESSAGE,
            },
            rate.remaining,
            &rate,
        ),
        Ok(Subscription::AlreadySubscribed) => json_response(
            StatusCode::OK,
            MessageResponse {
                message: ALREADY_SUBSCRIBED_MESSAGE,
            },
            rate.remaining,
            &rate,
        ),
        Err(err) => {
            match &err {
                ApiError::Internal(detail) => error!(%identity, error = %detail, "Submission failed"),
                other => debug!(%identity, error = %other, "Submission rejected"),
            }
            error_response(&err, rate.remaining, &rate)
        }
    };

    finish(&state, response)
}

/// Content-Type check, body parse, validation and deduplication.
async fn process_submission(
    state: &AppState,
    headers: &HeaderMap,
    body: Body,
) -> Result<Subscription, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    if let Some(rejection) = state.validator.validate_content_type(content_type).error() {
        debug!(error = %rejection, "Content-Type rejected");
        return Err(ApiError::UnsupportedMediaType);
    }

    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to read body: {e}")))?;
    let payload: serde_json::Value = serde_json::from_slice(&bytes)?;

    let email = state.validator.validate_body(&payload)?;

    if !state.subscribers.insert(&email).await {
        return Ok(Subscription::AlreadySubscribed);
    }

    state.metrics.set_subscribers(state.subscribers.len().await);
    info!(
        domain = email.rsplit('@').next().unwrap_or_default(),
        "New newsletter subscriber"
    );

    if let Some(provider) = &state.provider {
        provider::dispatch(provider.clone(), email);
    }

    Ok(Subscription::Created)
}

fn json_response<T: Serialize>(
    status: StatusCode,
    body: T,
    remaining: u32,
    rate: &RateLimitResult,
) -> Response {
    (
        status,
        [
            ("X-Content-Type-Options", "nosniff".to_string()),
            ("X-RateLimit-Remaining", remaining.to_string()),
            ("X-RateLimit-Reset", rate.reset_at_secs().to_string()),
        ],
        Json(body),
    )
        .into_response()
}

fn error_response(err: &ApiError, remaining: u32, rate: &RateLimitResult) -> Response {
    json_response(
        err.status(),
        ErrorResponse {
            error: err.client_message(),
        },
        remaining,
        rate,
    )
}

fn finish(state: &AppState, response: Response) -> Response {
    state.metrics.record_response(response.status());
    response
}

/// Convert a handler panic into the generic internal error body.
fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [("X-Content-Type-Options", "nosniff")],
        Json(ErrorResponse {
            error: INTERNAL_MESSAGE.to_string(),
        }),
    )
        .into_response()
}

/// List blog post slugs.
pub async fn blog_index() -> Json<Vec<&'static str>> {
    Json(blog::list_slugs())
}

/// Fetch a single blog post.
pub async fn blog_post(Path(slug): Path<String>) -> Response {
    match blog::get_post(&slug) {
        Some(post) => Json(post).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Post not found".to_string(),
            }),
        )
            .into_response(),
    }
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
