//! Stream resolution: from a raw input to a playable stream URL.
//!
//! Two paths exist:
//! - [`StreamResolver::resolve_redirect_list`] fetches an ASX redirect list and
//!   returns the `href` of its first reference element.
//! - [`StreamResolver::resolve_page_link`] fetches an item page, picks the
//!   stream link of the configured quality tier and resolves it as a redirect
//!   list.
//!
//! [`StreamResolver::resolve_nav_json`] is an alternative to page scraping that
//! reads the portal's navigation JSON instead.
//!
//! Inputs tagged with the `INVALID:` marker resolve to
//! [`ResolvedStream::Unsupported`] without touching the network.
//!
//! # Example
//!
//! ```no_run
//! use mtscrape_core::{DownloadConfig, StreamResolver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DownloadConfig::default();
//! let resolver = StreamResolver::new(&config.http)?;
//! let stream = resolver
//!     .resolve_page_link("http://www.zdf.de/ZDFmediathek/beitrag/video/257404", &config)
//!     .await?;
//! println!("{stream:?}");
//! # Ok(())
//! # }
//! ```

mod error;
mod http_client;
mod nav_json;
mod page;
mod redirect_list;
pub mod site;

pub use error::ResolveError;
pub use http_client::build_http_client;
pub use site::QualityTier;

pub(crate) use http_client::fetch_text;

use reqwest::Client;
use tracing::debug;

use crate::config::{DownloadConfig, HttpSettings};

use nav_json::{NavAsset, NavDocument};

/// Outcome of resolving one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedStream {
    /// A stream URL ready for capture.
    Playable(String),
    /// The origin is known not to be a real stream; carries the reason.
    Unsupported(String),
    /// Nothing matched; there is nothing to download.
    Unresolved,
}

impl ResolvedStream {
    /// Creates an `Unsupported` outcome.
    #[must_use]
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported(reason.into())
    }

    /// Returns the stream URL for `Playable`, `None` otherwise.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Playable(url) => Some(url),
            Self::Unsupported(_) | Self::Unresolved => None,
        }
    }
}

/// Resolves redirect lists, item pages and navigation documents.
#[derive(Debug, Clone)]
pub struct StreamResolver {
    client: Client,
}

impl StreamResolver {
    /// Creates a resolver with a client built from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ClientBuild`] when the HTTP client cannot be built.
    pub fn new(settings: &HttpSettings) -> Result<Self, ResolveError> {
        Ok(Self::with_client(build_http_client(settings)?))
    }

    /// Creates a resolver around an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// The HTTP client, shared with the feed reader.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resolves a redirect-list URL to the stream it points at.
    ///
    /// # Errors
    ///
    /// Returns a fetch-family [`ResolveError`] when the document cannot be
    /// fetched or parsed, and [`ResolveError::MalformedRedirectList`] when it
    /// has no reference element.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_redirect_list(&self, url: &str) -> Result<ResolvedStream, ResolveError> {
        if let Some(reason) = site::unsupported_reason(url) {
            return Ok(ResolvedStream::unsupported(reason));
        }

        let document = fetch_text(&self.client, url).await?;
        let href = redirect_list::first_reference_href(&document)
            .map_err(|error| ResolveError::parse(url, "redirect list", error.to_string()))?
            .ok_or_else(|| ResolveError::malformed_redirect_list(url))?;

        debug!(stream = %href, "Resolved redirect list");
        Ok(ResolvedStream::Playable(href))
    }

    /// Scrapes an item page for the stream link of the configured quality tier.
    ///
    /// `config.fast` selects the low-quality tier, otherwise the high-quality
    /// tier is used. Returns [`ResolvedStream::Unresolved`] when the page has
    /// no matching link.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the page or the linked redirect list
    /// cannot be fetched or parsed.
    #[tracing::instrument(skip(self, config), fields(fast = config.fast))]
    pub async fn resolve_page_link(
        &self,
        url: &str,
        config: &DownloadConfig,
    ) -> Result<ResolvedStream, ResolveError> {
        if let Some(reason) = site::unsupported_reason(url) {
            return Ok(ResolvedStream::unsupported(reason));
        }

        let page_url = site::with_flash_off(url);
        debug!(page = %page_url, "Scraping page");
        let html = fetch_text(&self.client, &page_url).await?;

        let tier = QualityTier::for_fast(config.fast);
        let link = page::select_stream_link(&html, tier)
            .map_err(|reason| ResolveError::parse(&page_url, "page", reason))?;

        match link {
            Some(href) => {
                debug!(link = %href, ?tier, "Found stream link");
                self.resolve_redirect_list(&href).await
            }
            None => {
                debug!(?tier, "No stream link of the requested tier on page");
                Ok(ResolvedStream::Unresolved)
            }
        }
    }

    /// Resolves an item link through the portal's navigation JSON.
    ///
    /// Non-video assets resolve to [`ResolvedStream::Unsupported`] naming the
    /// asset type; videos are resolved through their redirect list.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the document cannot be fetched or parsed.
    #[tracing::instrument(skip(self, config), fields(fast = config.fast))]
    pub async fn resolve_nav_json(
        &self,
        url: &str,
        config: &DownloadConfig,
    ) -> Result<ResolvedStream, ResolveError> {
        if let Some(reason) = site::unsupported_reason(url) {
            return Ok(ResolvedStream::unsupported(reason));
        }

        let nav_url = nav_json::nav_json_url(url, QualityTier::for_fast(config.fast));
        let body = fetch_text(&self.client, &nav_url).await?;
        let document: NavDocument = serde_json::from_str(&body)
            .map_err(|error| ResolveError::parse(&nav_url, "navigation JSON", error.to_string()))?;

        match document.asset() {
            NavAsset::Video(Some(asset_url)) => self.resolve_redirect_list(&asset_url).await,
            NavAsset::Video(None) => Err(ResolveError::parse(
                &nav_url,
                "navigation JSON",
                "video asset without assetUrl",
            )),
            NavAsset::Other(asset_type) => Ok(ResolvedStream::Unsupported(asset_type)),
        }
    }
}
