// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-memory set of subscribed addresses.
//!
//! The set lives for the lifetime of the process only. It exists to make
//! repeated submissions idempotent within one instance, not to persist
//! subscribers.

use std::collections::HashSet;
use tokio::sync::RwLock;

/// Normalized, validated email addresses seen so far.
#[derive(Debug, Default)]
pub struct SubscriberSet {
    emails: RwLock<HashSet<String>>,
}

impl SubscriberSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, email: &str) -> bool {
        self.emails.read().await.contains(email)
    }

    /// Insert `email`, returning `false` if it was already present.
    ///
    /// Membership test and insertion happen under the same write lock.
    pub async fn insert(&self, email: &str) -> bool {
        let mut emails = self.emails.write().await;
        if emails.contains(email) {
            return false;
        }
        emails.insert(email.to_string())
    }

    pub async fn len(&self) -> usize {
        self.emails.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.emails.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.emails.write().await.clear();
    }
}
