//! Error types for stream resolution.
//!
//! Every variant aborts a single resolution only; the driver logs it and
//! treats the target as having nothing to download.

use thiserror::Error;

/// Errors that can occur while resolving a target to a stream URL.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Transport-level failure (DNS, connection refused, timeout, TLS).
    #[error("network error fetching '{url}': {source}\n  Suggestion: Check connectivity to the portal and try again later")]
    Fetch {
        /// The URL that could not be fetched.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching '{url}'\n  Suggestion: The item may have been removed from the portal")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// A fetched document could not be parsed.
    #[error("could not parse {document} at '{url}': {reason}")]
    Parse {
        /// The URL the document came from.
        url: String,
        /// Kind of document ("redirect list", "page", "navigation JSON").
        document: &'static str,
        /// Parser error message.
        reason: String,
    },

    /// The redirect-list document contains no reference element.
    #[error("redirect list at '{url}' has no reference element\n  Suggestion: Check that the URL points at an .asx playlist")]
    MalformedRedirectList {
        /// The redirect-list URL.
        url: String,
    },

    /// The shared HTTP client could not be built.
    #[error("HTTP client construction failed: {reason}")]
    ClientBuild {
        /// Why construction failed.
        reason: String,
    },
}

impl ResolveError {
    /// Creates a network error from a reqwest error.
    #[must_use]
    pub fn fetch(url: &str, source: reqwest::Error) -> Self {
        Self::Fetch {
            url: url.to_string(),
            source,
        }
    }

    /// Creates an HTTP status error.
    #[must_use]
    pub fn http_status(url: &str, status: u16) -> Self {
        Self::HttpStatus {
            url: url.to_string(),
            status,
        }
    }

    /// Creates a parse error for the given document kind.
    #[must_use]
    pub fn parse(url: &str, document: &'static str, reason: impl Into<String>) -> Self {
        Self::Parse {
            url: url.to_string(),
            document,
            reason: reason.into(),
        }
    }

    /// Creates a `MalformedRedirectList` error.
    #[must_use]
    pub fn malformed_redirect_list(url: &str) -> Self {
        Self::MalformedRedirectList {
            url: url.to_string(),
        }
    }

    /// Returns true for network, status and parse failures.
    #[must_use]
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::HttpStatus { .. } | Self::Parse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_message() {
        let err = ResolveError::http_status("http://portal.test/x.asx", 404);
        let msg = err.to_string();
        assert!(msg.contains("404"), "should contain status: {msg}");
        assert!(msg.contains("http://portal.test/x.asx"), "should contain url: {msg}");
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_parse_error_message() {
        let err = ResolveError::parse("http://portal.test/x.asx", "redirect list", "unexpected EOF");
        let msg = err.to_string();
        assert!(msg.contains("redirect list"));
        assert!(msg.contains("unexpected EOF"));
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_malformed_redirect_list_is_not_fetch_failure() {
        let err = ResolveError::malformed_redirect_list("http://portal.test/x.asx");
        assert!(err.to_string().contains("no reference element"));
        assert!(!err.is_fetch_failure());
    }
}
