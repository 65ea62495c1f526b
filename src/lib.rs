// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Newsletter Gate
//!
//! This crate provides the newsletter sign-up endpoint of a small business
//! website together with the rate limiter guarding it:
//!
//! - Sliding window rate limiting per client IP (5 per minute default)
//! - Content-Type validation
//! - Email sanitization and shape validation
//! - In-memory duplicate detection (200 for repeats, 201 for new)
//! - Best-effort forwarding to an email/CRM provider
//! - Static blog content lookup

pub mod blog;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod provider;
pub mod subscribers;
pub mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use handlers::{router, AppState};
pub use limiter::{CleanupTask, RateLimitResult, RateLimiter};
pub use validator::{EmailValidator, ValidationError, ValidationResult};
