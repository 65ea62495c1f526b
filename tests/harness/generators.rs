// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for abuse simulation.

use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// Generate a pool of distinct, well-formed email addresses.
pub fn generate_emails(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("reader{}@mail-{}.example.com", i, i % 7))
        .collect()
}

/// Emails carrying markup, control characters and other hostile content.
///
/// None of these may ever produce a 500.
pub fn generate_hostile_emails() -> Vec<String> {
    vec![
        "<script>alert(1)</script>@test.com".to_string(),
        "\"><img src=x onerror=alert(1)>@evil.com".to_string(),
        "user@example.com<script>".to_string(),
        "'; DROP TABLE subscribers; --@example.com".to_string(),
        "user@exam<>ple.com".to_string(),
        "{{7*7}}@example.com".to_string(),
        "user\u{0000}@example.com".to_string(),
        "user\r\nBcc: victim@example.com".to_string(),
        "úsér@exämple.com".to_string(),
        "@@@".to_string(),
        "   ".to_string(),
        "a".repeat(10_000),
        format!("{}@example.com", "x".repeat(254)),
        "user@[127.0.0.1]".to_string(),
        "\\\\@\\\\.com".to_string(),
    ]
}

/// Generate various Content-Type values for bypass testing.
pub fn generate_content_types() -> Vec<Option<&'static str>> {
    vec![
        // Valid
        Some("application/json"),
        Some("application/json; charset=utf-8"),
        Some("APPLICATION/JSON"),
        // Invalid - should be rejected
        Some("text/plain"),
        Some("application/x-www-form-urlencoded"),
        Some("multipart/form-data"),
        Some("text/html"),
        Some("application/xml"),
        Some("application/jsonp"),
        Some("text/json"),
        None,        // Missing
        Some(""),    // Empty
        Some("   "), // Whitespace
    ]
}

/// Classify a Content-Type as valid or invalid.
pub fn is_valid_content_type(ct: Option<&str>) -> bool {
    match ct {
        Some(s) => {
            let normalized = s.split(';').next().unwrap_or("").trim().to_lowercase();
            normalized == "application/json"
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ips() {
        let ips = generate_ips(256);
        assert_eq!(ips.len(), 256);
        // All should be unique
        let unique: std::collections::HashSet<_> = ips.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_generate_emails_unique() {
        let emails = generate_emails(100);
        let unique: std::collections::HashSet<_> = emails.iter().collect();
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn test_content_type_classification() {
        assert!(is_valid_content_type(Some("application/json")));
        assert!(is_valid_content_type(Some("application/json; charset=utf-8")));
        assert!(!is_valid_content_type(Some("text/plain")));
        assert!(!is_valid_content_type(None));
    }
}
