//! Category feed reading and item filtering.

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::DownloadConfig;
use crate::resolver::{ResolveError, fetch_text};

/// Errors that can occur while reading a category feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed could not be fetched.
    #[error(transparent)]
    Fetch(#[from] ResolveError),

    /// The feed body is not a recognizable RSS/Atom document.
    #[error("could not parse feed at '{url}': {reason}")]
    Parse {
        /// Feed URL.
        url: String,
        /// Parser error message.
        reason: String,
    },
}

/// One entry of a category feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// Last update time, falling back to the publication time.
    pub updated: Option<DateTime<Utc>>,
}

/// Fetches and parses the feed at `url`.
///
/// # Errors
///
/// Returns [`FeedError`] when the feed cannot be fetched or parsed.
pub async fn fetch_feed(client: &Client, url: &str) -> Result<Vec<FeedItem>, FeedError> {
    let body = fetch_text(client, url).await?;
    parse_feed(body.as_bytes()).map_err(|reason| FeedError::Parse {
        url: url.to_string(),
        reason,
    })
}

/// Parses an RSS or Atom document into feed items.
///
/// Entries without a link are dropped.
///
/// # Errors
///
/// Returns the parser message when the document is not a feed.
pub fn parse_feed(body: &[u8]) -> Result<Vec<FeedItem>, String> {
    let feed = feed_rs::parser::parse(body).map_err(|error| error.to_string())?;
    Ok(feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let link = entry.links.first()?.href.trim().to_string();
            if link.is_empty() {
                return None;
            }
            Some(FeedItem {
                title: entry
                    .title
                    .map(|text| text.content.trim().to_string())
                    .unwrap_or_default(),
                link,
                updated: entry.updated.or(entry.published),
            })
        })
        .collect())
}

/// Returns true if `updated` is no more than `max_age_days` before `now`.
///
/// The boundary is inclusive: an item exactly `max_age_days` old is kept.
#[must_use]
pub fn is_within_age(updated: DateTime<Utc>, now: DateTime<Utc>, max_age_days: u32) -> bool {
    let Some(cutoff) = TimeDelta::try_days(i64::from(max_age_days))
        .and_then(|age| now.checked_sub_signed(age))
    else {
        return true;
    };
    updated >= cutoff
}

/// Keeps the items that pass the age filter and then the title filter.
///
/// Items without a timestamp cannot be aged and are dropped.
#[must_use]
pub fn select_items(
    items: Vec<FeedItem>,
    now: DateTime<Utc>,
    config: &DownloadConfig,
) -> Vec<FeedItem> {
    items
        .into_iter()
        .filter(|item| {
            let Some(updated) = item.updated else {
                debug!(title = %item.title, "Dropping feed item without timestamp");
                return false;
            };
            if !is_within_age(updated, now, config.max_age_days) {
                return false;
            }
            debug!("[test] {}", item.title);
            config.title_filter.matches(&item.title)
        })
        .collect()
}
