// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the newsletter service.

use crate::provider::ProviderError;
use crate::validator::ValidationError;
use axum::http::StatusCode;
use thiserror::Error;

/// Client-facing message for the throttled response.
pub const RATE_LIMITED_MESSAGE: &str = "Too many attempts. Please wait a moment and try again.";

/// Client-facing message for any unexpected failure.
pub const INTERNAL_MESSAGE: &str = "Internal error. Please try again.";

/// Failures of a newsletter submission, mapped onto HTTP statuses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("rate limit exceeded")]
    RateLimited,

    #[error("Invalid Content-Type. Expected application/json.")]
    UnsupportedMediaType,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Never shown to the client; the response carries [`INTERNAL_MESSAGE`].
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return in the `error` field.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::RateLimited => RATE_LIMITED_MESSAGE.to_string(),
            ApiError::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("malformed JSON body: {err}"))
    }
}

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("{0} must be non-zero and non-empty")]
    OutOfRange(&'static str),

    #[error("Provider webhook must be an http(s) URL: {0}")]
    InvalidWebhookUrl(String),
}

/// Failures while assembling the application state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Metrics registry error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
