//! Upstream (outbound) subsystem.
//!
//! # Data Flow
//! ```text
//! validated target URL
//!     → client.rs (GET with User-Agent [+ Referer], deadlines)
//!     → status check
//!     → page: buffered body → rewrite engine
//!     → resource: unread response → streamed to the browser
//! ```

pub mod client;

pub use client::UpstreamClient;

/// True when `candidate` starts with `http://` or `https://` (case-insensitive).
///
/// This is the only gate applied before any network I/O.
pub fn is_valid_target(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    let has_prefix = |prefix: &str| {
        bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    };
    has_prefix("http://") || has_prefix("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_targets() {
        assert!(is_valid_target("http://a.com"));
        assert!(is_valid_target("https://a.com/x?y=1"));
        assert!(is_valid_target("HTTPS://A.COM"));
        assert!(is_valid_target("http://"));
    }

    #[test]
    fn test_invalid_targets() {
        assert!(!is_valid_target(""));
        assert!(!is_valid_target("not-a-url"));
        assert!(!is_valid_target("ftp://a.com"));
        assert!(!is_valid_target("//a.com"));
        assert!(!is_valid_target(" https://a.com"));
        assert!(!is_valid_target("https:/a.com"));
        assert!(!is_valid_target("javascript:alert(1)"));
    }
}
