// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound email/CRM provider integration.
//!
//! New subscribers are forwarded on a best-effort basis after the response
//! has been decided. A slow or failing provider never changes what the
//! client sees.

use crate::config::ProviderConfig;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Provider error types.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider responded with status {0}")]
    Status(u16),
}

/// Email marketing / CRM collaborator.
#[async_trait]
pub trait SubscriptionProvider: Send + Sync {
    /// Register `email` with the provider.
    async fn subscribe(&self, email: &str) -> Result<(), ProviderError>;
}

/// Provider that POSTs `{"email": ...}` to a configured webhook.
pub struct WebhookProvider {
    url: String,
    client: reqwest::Client,
}

impl WebhookProvider {
    /// Create a webhook provider with the configured timeout.
    pub fn new(url: String, config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { url, client })
    }

    /// Build a provider from configuration, if a webhook is configured.
    pub fn from_config(
        config: &ProviderConfig,
    ) -> Result<Option<Arc<dyn SubscriptionProvider>>, ProviderError> {
        match &config.webhook_url {
            Some(url) => Ok(Some(Arc::new(Self::new(url.clone(), config)?))),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SubscriptionProvider for WebhookProvider {
    async fn subscribe(&self, email: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::Status(response.status().as_u16()))
        }
    }
}

/// Forward `email` to `provider` without awaiting the outcome.
pub fn dispatch(provider: Arc<dyn SubscriptionProvider>, email: String) {
    tokio::spawn(async move {
        match provider.subscribe(&email).await {
            Ok(()) => debug!("Subscriber forwarded to provider"),
            Err(e) => warn!(error = %e, "Provider subscription failed"),
        }
    });
}
