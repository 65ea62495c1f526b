// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Newsletter submission validator.
//!
//! Implements the input checks applied to every admitted submission:
//! - Content-Type validation
//! - Email presence, type and length
//! - Sanitization of markup-significant characters
//! - Email shape matching

use crate::config::ValidationConfig;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Local part from the RFC 5322 atom set, then at least two DNS labels of
/// 1-63 alphanumerics with internal hyphens only.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .unwrap()
});

/// Characters stripped before matching. A denylist, not HTML escaping.
const STRIPPED_CHARS: &[char] = &[
    '<', '>', '"', '\'', '&', ';', '(', ')', '{', '}', '[', ']', '\\',
];

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid Content-Type. Expected one of {expected:?}, got {actual:?}")]
    InvalidContentType {
        expected: Vec<String>,
        actual: Option<String>,
    },

    #[error("email required")]
    MissingEmail,

    /// `max` is for logs; the message stays fixed.
    #[error("exceeds maximum length")]
    TooLong { max: usize },

    #[error("invalid email")]
    InvalidFormat,
}

/// Result of validation.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Request is valid
    Valid,
    /// Request is invalid
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(e) => Some(e),
        }
    }
}

/// Lowercase, trim and strip [`STRIPPED_CHARS`].
pub fn sanitize_email(input: &str) -> String {
    input
        .to_lowercase()
        .trim()
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect()
}

/// Whether `candidate` has the accepted email shape.
pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_PATTERN.is_match(candidate)
}

/// Newsletter submission validator.
pub struct EmailValidator {
    config: ValidationConfig,
}

impl EmailValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate the Content-Type header.
    pub fn validate_content_type(&self, content_type: Option<&str>) -> ValidationResult {
        let ct = content_type.map(|s| {
            // Extract just the media type, ignoring charset etc.
            s.split(';').next().unwrap_or(s).trim().to_lowercase()
        });

        let accepted = match &ct {
            Some(actual) => self
                .config
                .accepted_content_types
                .iter()
                .any(|expected| expected.eq_ignore_ascii_case(actual)),
            None => false,
        };

        if accepted {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::InvalidContentType {
                expected: self.config.accepted_content_types.clone(),
                actual: ct,
            })
        }
    }

    /// Validate the `email` field of a parsed body.
    ///
    /// Returns the sanitized, normalized address on success.
    pub fn validate_email(&self, field: Option<&Value>) -> Result<String, ValidationError> {
        let raw = match field {
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => return Err(ValidationError::MissingEmail),
        };

        // Measured in UTF-16 code units on the raw input, before sanitization
        let length = raw.encode_utf16().count();
        if length > self.config.max_email_length {
            debug!(length, max = self.config.max_email_length, "Email too long");
            return Err(ValidationError::TooLong {
                max: self.config.max_email_length,
            });
        }

        let sanitized = sanitize_email(raw);
        if !is_valid_email(&sanitized) {
            debug!("Email failed shape check");
            return Err(ValidationError::InvalidFormat);
        }

        Ok(sanitized)
    }

    /// Validate the body of a submission, extracting the `email` field.
    pub fn validate_body(&self, body: &Value) -> Result<String, ValidationError> {
        self.validate_email(body.as_object().and_then(|map| map.get("email")))
    }
}
