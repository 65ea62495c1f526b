// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the newsletter sign-up service.
//!
//! Defaults match the public endpoint policy: 5 submissions per minute per
//! client, 254 character email ceiling, JSON bodies only.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Configuration for the newsletter service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// HTTP surface configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Validation configuration
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Outbound subscription provider
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// HTTP surface configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Origins allowed by CORS. Empty disables the CORS layer.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Sliding window quota applied per client identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum admitted requests per window (default: 5)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in milliseconds (default: 60000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Interval between stale-entry sweeps in seconds (default: 300)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

/// Validation configuration for submitted emails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum accepted email length in characters (default: 254)
    #[serde(default = "default_max_email_length")]
    pub max_email_length: usize,

    /// Accepted media types (default: application/json)
    #[serde(default = "default_content_types")]
    pub accepted_content_types: Vec<String>,
}

/// Outbound email/CRM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Webhook receiving `{"email": ...}` for each new subscriber
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Request timeout in milliseconds (default: 5000)
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_cleanup_interval_secs() -> u64 {
    300
}

fn default_max_email_length() -> usize {
    254 // RFC 5321 path limit
}

fn default_content_types() -> Vec<String> {
    vec!["application/json".to_string()]
}

fn default_provider_timeout_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            server: ServerConfig::default(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            provider: ProviderConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_ms: default_window_ms(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_email_length: default_max_email_length(),
            accepted_content_types: default_content_types(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_ms: default_provider_timeout_ms(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the cleanup sweep interval
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let config = Config {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            server: ServerConfig {
                allowed_origins: std::env::var("ALLOWED_ORIGINS")
                    .map(|v| split_list(&v))
                    .unwrap_or_default(),
            },
            rate_limit: RateLimitConfig {
                max_requests: env_parse("NEWSLETTER_MAX_REQUESTS")?
                    .unwrap_or(defaults.rate_limit.max_requests),
                window_ms: env_parse("NEWSLETTER_WINDOW_MS")?
                    .unwrap_or(defaults.rate_limit.window_ms),
                cleanup_interval_secs: env_parse("CLEANUP_INTERVAL_SECS")?
                    .unwrap_or(defaults.rate_limit.cleanup_interval_secs),
            },
            validation: ValidationConfig {
                max_email_length: env_parse("MAX_EMAIL_LENGTH")?
                    .unwrap_or(defaults.validation.max_email_length),
                accepted_content_types: std::env::var("ACCEPTED_CONTENT_TYPES")
                    .map(|v| split_list(&v))
                    .unwrap_or(defaults.validation.accepted_content_types),
            },
            provider: ProviderConfig {
                webhook_url: std::env::var("PROVIDER_WEBHOOK_URL")
                    .ok()
                    .filter(|v| !v.trim().is_empty()),
                timeout_ms: env_parse("PROVIDER_TIMEOUT_MS")?
                    .unwrap_or(defaults.provider.timeout_ms),
            },
            metrics: MetricsConfig {
                enabled: env_parse("METRICS_ENABLED")?.unwrap_or(defaults.metrics.enabled),
                path: std::env::var("METRICS_PATH").unwrap_or(defaults.metrics.path),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.max_requests == 0 {
            return Err(ConfigError::OutOfRange("NEWSLETTER_MAX_REQUESTS"));
        }
        if self.rate_limit.window_ms == 0 {
            return Err(ConfigError::OutOfRange("NEWSLETTER_WINDOW_MS"));
        }
        if self.rate_limit.cleanup_interval_secs == 0 {
            return Err(ConfigError::OutOfRange("CLEANUP_INTERVAL_SECS"));
        }
        if self.validation.max_email_length == 0 {
            return Err(ConfigError::OutOfRange("MAX_EMAIL_LENGTH"));
        }
        if self.validation.accepted_content_types.is_empty() {
            return Err(ConfigError::OutOfRange("ACCEPTED_CONTENT_TYPES"));
        }
        if !self.metrics.path.starts_with('/') {
            return Err(ConfigError::Invalid {
                var: "METRICS_PATH",
                value: self.metrics.path.clone(),
            });
        }
        if let Some(raw) = &self.provider.webhook_url {
            let parsed = Url::parse(raw).map_err(|_| ConfigError::InvalidWebhookUrl(raw.clone()))?;
            if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
                return Err(ConfigError::InvalidWebhookUrl(raw.clone()));
            }
        }
        Ok(())
    }
}

/// Parse an optional environment variable, failing loudly on garbage.
fn env_parse<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(None),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
