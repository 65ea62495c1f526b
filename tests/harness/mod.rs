// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for newsletter endpoint abuse simulation.
//!
//! This module provides utilities for replaying abusive submission patterns
//! against the router to validate the rate limiter and input checks.

pub mod generators;
pub mod metrics;
