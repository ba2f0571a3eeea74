//! Conditional request support for static files
//!
//! `ETag` generation and `If-None-Match` matching.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Quoted `ETag` for a file body, e.g. `"1f-abc123def"`
///
/// The length prefix keeps equal-hash bodies of different sizes apart.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}-{:x}\"", content.len(), hasher.finish())
}

/// True when the client's `If-None-Match` names `etag` (answer 304)
///
/// Accepts a comma separated list, weak validators (`W/"..."`) and `*`.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etags| {
        client_etags.split(',').map(str::trim).any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(b"hello world");
        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert!(etag.len() > 2);
    }

    #[test]
    fn test_etag_consistency() {
        let etag1 = generate_etag(b"same content");
        let etag2 = generate_etag(b"same content");
        assert_eq!(etag1, etag2);
    }

    #[test]
    fn test_etag_difference() {
        assert_ne!(generate_etag(b"content a"), generate_etag(b"content b"));
        assert_ne!(generate_etag(b""), generate_etag(b"\0"));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(check_etag_match(Some("W/\"abc123\""), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }
}
