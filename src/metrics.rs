// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for the newsletter endpoint.

use axum::http::StatusCode;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Metrics registry owned by the application state.
pub struct Metrics {
    registry: Registry,
    responses: IntCounterVec,
    subscribers: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let responses = IntCounterVec::new(
            Opts::new(
                "newsletter_responses_total",
                "Newsletter submissions by response status",
            ),
            &["status"],
        )?;
        let subscribers = IntGauge::new(
            "newsletter_subscribers",
            "Distinct addresses subscribed since process start",
        )?;

        registry.register(Box::new(responses.clone()))?;
        registry.register(Box::new(subscribers.clone()))?;

        Ok(Self {
            registry,
            responses,
            subscribers,
        })
    }

    pub fn record_response(&self, status: StatusCode) {
        self.responses
            .with_label_values(&[status.as_str()])
            .inc();
    }

    pub fn set_subscribers(&self, count: usize) {
        self.subscribers.set(count as i64);
    }

    pub fn response_count(&self, status: StatusCode) -> u64 {
        self.responses.with_label_values(&[status.as_str()]).get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
