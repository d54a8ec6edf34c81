//! Run configuration shared by the resolver, orchestrator and driver.
//!
//! [`DownloadConfig`] is built once at start-up (command line merged over the
//! optional config file) and then passed by reference into every call. Nothing
//! in the library reads configuration from global state.

mod file;

pub use file::{FileConfig, load_default_file_config, resolve_default_config_path};

use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;

/// Default maximum age of feed items, in days.
pub const DEFAULT_MAX_AGE_DAYS: u32 = 5;

/// Default portal base URL used to build category feed and item page URLs.
pub const DEFAULT_PORTAL_BASE_URL: &str = "http://www.zdf.de/ZDFmediathek";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Errors raised while building configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The title filter is not a valid regular expression.
    #[error("invalid title pattern '{pattern}': {source}\n  Suggestion: Check the regular expression syntax passed to --match")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A config file line could not be understood.
    #[error("invalid config syntax on line {line}: {reason}")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// A config file value was out of range or of the wrong type.
    #[error("invalid config value for `{key}` on line {line}: {reason}")]
    InvalidValue {
        /// The key whose value was rejected.
        key: String,
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// The config file exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// An external command with a fixed flag set.
///
/// Capture jobs are invoked as `program flags... <outfile> <url>`, transcode
/// jobs as `program flags... <file>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Executable name or path.
    pub program: String,
    /// Flags placed before the per-job arguments.
    pub flags: Vec<String>,
}

impl ToolCommand {
    /// Creates a command from a program and its fixed flags.
    #[must_use]
    pub fn new<I, S>(program: impl Into<String>, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            flags: flags.into_iter().map(Into::into).collect(),
        }
    }

    /// The default stream capture command (`mplayer` dumping the stream).
    #[must_use]
    pub fn default_capture() -> Self {
        Self::new(
            "mplayer",
            ["-nolirc", "-really-quiet", "-dumpstream", "-dumpfile"],
        )
    }

    /// The default transcode command (`ffmpeg2theora`, no extra flags).
    #[must_use]
    pub fn default_transcode() -> Self {
        Self::new("ffmpeg2theora", Vec::<String>::new())
    }
}

/// Title filter applied to category feed items.
///
/// An empty pattern matches every title; otherwise the pattern is searched
/// anywhere in the title (not anchored).
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    regex: Option<Regex>,
}

impl TitleFilter {
    /// Compiles a title filter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] when `pattern` is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        if pattern.is_empty() {
            return Ok(Self::default());
        }
        let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex: Some(regex) })
    }

    /// Returns true if `title` passes the filter.
    #[must_use]
    pub fn matches(&self, title: &str) -> bool {
        self.regex.as_ref().is_none_or(|regex| regex.is_match(title))
    }

    /// Returns the source pattern, or an empty string for match-all.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_ref().map_or("", Regex::as_str)
    }
}

/// URL templates of the media portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalEndpoints {
    /// Base URL without trailing slash.
    pub base_url: String,
}

impl PortalEndpoints {
    /// Creates endpoints rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// RSS feed URL for a category identifier.
    #[must_use]
    pub fn category_feed_url(&self, category: &str) -> String {
        format!("{}/rss/{category}?view=rss", self.base_url)
    }

    /// Page URL for an item identifier.
    #[must_use]
    pub fn item_page_url(&self, item: &str) -> String {
        format!("{}/beitrag/video/{item}", self.base_url)
    }
}

impl Default for PortalEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_PORTAL_BASE_URL)
    }
}

/// Timeouts for the shared HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
        }
    }
}

/// Process-wide configuration snapshot, read-only after construction.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct DownloadConfig {
    /// Directory captured files are written to.
    pub output_dir: PathBuf,
    /// Run the transcode job after each capture.
    pub convert: bool,
    /// Prefer the low-quality stream tier.
    pub fast: bool,
    /// Show a liveness spinner while external jobs run.
    pub verbose: bool,
    /// Resolve everything but do not create directories or launch jobs.
    pub dry_run: bool,
    /// Resolve items and links through the navigation JSON view instead of page scraping.
    pub nav_json: bool,
    /// Maximum age of category feed items, in days (inclusive).
    pub max_age_days: u32,
    /// Title filter for category feed items.
    pub title_filter: TitleFilter,
    /// Stream capture command.
    pub capture: ToolCommand,
    /// Transcode command.
    pub transcode: ToolCommand,
    /// Portal URL templates.
    pub portal: PortalEndpoints,
    /// HTTP client timeouts.
    pub http: HttpSettings,
}

impl DownloadConfig {
    /// Creates a configuration with defaults and the given output directory.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            convert: false,
            fast: false,
            verbose: false,
            dry_run: false,
            nav_json: false,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            title_filter: TitleFilter::default(),
            capture: ToolCommand::default_capture(),
            transcode: ToolCommand::default_transcode(),
            portal: PortalEndpoints::default(),
            http: HttpSettings::default(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_title_filter_empty_matches_everything() {
        let filter = TitleFilter::new("").unwrap();
        assert!(filter.matches("heute-journal"));
        assert!(filter.matches(""));
        assert_eq!(filter.as_str(), "");
    }

    #[test]
    fn test_title_filter_searches_anywhere_in_title() {
        let filter = TitleFilter::new("journal").unwrap();
        assert!(filter.matches("heute-journal vom 15.10."));
        assert!(!filter.matches("Maybrit Illner"));
    }

    #[test]
    fn test_title_filter_supports_regex_syntax() {
        let filter = TitleFilter::new(r"^heute\s\d+").unwrap();
        assert!(filter.matches("heute 100sec"));
        assert!(!filter.matches("das heute-journal"));
    }

    #[test]
    fn test_title_filter_invalid_pattern_is_rejected() {
        let err = TitleFilter::new("(unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_portal_endpoints_build_urls() {
        let portal = PortalEndpoints::new("http://portal.test/mediathek/");
        assert_eq!(
            portal.category_feed_url("208"),
            "http://portal.test/mediathek/rss/208?view=rss"
        );
        assert_eq!(
            portal.item_page_url("257404"),
            "http://portal.test/mediathek/beitrag/video/257404"
        );
    }

    #[test]
    fn test_download_config_defaults() {
        let config = DownloadConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.max_age_days, 5);
        assert!(!config.convert);
        assert!(!config.fast);
        assert!(!config.verbose);
        assert!(!config.dry_run);
        assert_eq!(config.capture.program, "mplayer");
        assert_eq!(config.capture.flags.last().unwrap(), "-dumpfile");
        assert_eq!(config.transcode.program, "ffmpeg2theora");
        assert!(config.transcode.flags.is_empty());
        assert_eq!(config.portal.base_url, DEFAULT_PORTAL_BASE_URL);
    }
}
