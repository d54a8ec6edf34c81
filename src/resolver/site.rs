//! Site-specific markers of the portal's streaming URL scheme.
//!
//! Every substring the scraper depends on lives here, each behind its own
//! predicate, so a change in the portal's URL layout is a one-file edit.

/// Substring identifying the streaming host in a stream link.
pub const STREAMING_HOST_MARKER: &str = "streaming.zdf.de";

/// File extension of redirect-list documents.
pub const REDIRECT_LIST_EXTENSION: &str = ".asx";

/// Prefix tagging an input as a known non-stream origin, followed by the reason.
pub const UNSUPPORTED_MARKER_PREFIX: &str = "INVALID:";

/// Query flag that asks the portal for the non-Flash page variant.
pub const FLASH_OFF_QUERY: &str = "flash=off";

/// Stream quality variant, distinguished by a path fragment in the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityTier {
    /// Low-bandwidth variant (faster capture).
    Low,
    /// High-bandwidth variant.
    High,
}

impl QualityTier {
    /// Picks the tier for the `fast` setting.
    #[must_use]
    pub fn for_fast(fast: bool) -> Self {
        if fast { Self::Low } else { Self::High }
    }

    /// Path fragment that identifies this tier in a stream link.
    #[must_use]
    pub fn path_marker(self) -> &'static str {
        match self {
            Self::Low => "zdf/300/",
            Self::High => "zdf/veryhigh/",
        }
    }

    /// Bandwidth label used by the navigation JSON view.
    #[must_use]
    pub fn nav_bandwidth(self) -> &'static str {
        match self {
            Self::Low => "dsl1000",
            Self::High => "dsl2000",
        }
    }
}

/// Returns true if `href` points at the streaming host.
#[must_use]
pub fn is_streaming_host(href: &str) -> bool {
    href.contains(STREAMING_HOST_MARKER)
}

/// Returns true if `href` names a redirect-list document.
#[must_use]
pub fn is_redirect_list_link(href: &str) -> bool {
    href.to_ascii_lowercase().ends_with(REDIRECT_LIST_EXTENSION)
}

/// Returns true if `href` belongs to the given quality tier.
#[must_use]
pub fn matches_quality_tier(href: &str, tier: QualityTier) -> bool {
    href.contains(tier.path_marker())
}

/// Returns true if `href` is the stream link to follow for `tier`.
#[must_use]
pub fn is_stream_candidate(href: &str, tier: QualityTier) -> bool {
    is_streaming_host(href) && is_redirect_list_link(href) && matches_quality_tier(href, tier)
}

/// Returns the reason carried by an unsupported-origin marker, if present.
///
/// An empty reason after the prefix is reported as `"unknown"`.
#[must_use]
pub fn unsupported_reason(input: &str) -> Option<&str> {
    let reason = input.strip_prefix(UNSUPPORTED_MARKER_PREFIX)?.trim();
    Some(if reason.is_empty() { "unknown" } else { reason })
}

/// Appends `query` to `url`, using `&` if the URL already has a query string.
#[must_use]
pub fn append_query(url: &str, query: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{query}")
}

/// Returns `url` with the flash-off flag appended.
#[must_use]
pub fn with_flash_off(url: &str) -> String {
    append_query(url, FLASH_OFF_QUERY)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOW: &str = "http://streaming.zdf.de/zdf/300/071015_hko.asx";
    const HIGH: &str = "http://wstreaming.zdf.de/zdf/veryhigh/071015_hko.asx";

    #[test]
    fn test_quality_tier_for_fast() {
        assert_eq!(QualityTier::for_fast(true), QualityTier::Low);
        assert_eq!(QualityTier::for_fast(false), QualityTier::High);
    }

    #[test]
    fn test_stream_candidate_requires_tier_marker() {
        assert!(is_stream_candidate(LOW, QualityTier::Low));
        assert!(!is_stream_candidate(LOW, QualityTier::High));
        assert!(is_stream_candidate(HIGH, QualityTier::High));
        assert!(!is_stream_candidate(HIGH, QualityTier::Low));
    }

    #[test]
    fn test_stream_candidate_requires_host_and_extension() {
        assert!(!is_stream_candidate(
            "http://cdn.example.com/zdf/300/x.asx",
            QualityTier::Low
        ));
        assert!(!is_stream_candidate(
            "http://streaming.zdf.de/zdf/300/x.wmv",
            QualityTier::Low
        ));
        assert!(is_redirect_list_link("http://streaming.zdf.de/zdf/300/X.ASX"));
    }

    #[test]
    fn test_unsupported_reason() {
        assert_eq!(unsupported_reason("INVALID:livestream"), Some("livestream"));
        assert_eq!(unsupported_reason("INVALID:"), Some("unknown"));
        assert_eq!(unsupported_reason("http://host/INVALID:x"), None);
    }

    #[test]
    fn test_with_flash_off_uses_question_mark_without_query() {
        assert_eq!(
            with_flash_off("http://portal.test/beitrag/video/1"),
            "http://portal.test/beitrag/video/1?flash=off"
        );
    }

    #[test]
    fn test_with_flash_off_uses_ampersand_with_existing_query() {
        assert_eq!(
            with_flash_off("http://portal.test/item?id=1"),
            "http://portal.test/item?id=1&flash=off"
        );
    }
}
