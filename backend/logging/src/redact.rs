//! Log Redaction
//!
//! Scrubs API keys and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9_\-]{16,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});

/// Redacts credentials in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_bearer_and_key() {
        let raw = "API 401: Incorrect API key provided: sk-proj-abcdefghijklmnop1234 (Bearer eyJhbGciOiJIUzI1NiJ9)";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("abcdefghijklmnop1234"));
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiJ9"));
        assert!(clean.starts_with("API 401: Incorrect API key provided: [REDACTED_TOKEN]"));
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(redact_sensitive_data("no choices in response"), "no choices in response");
    }
}
