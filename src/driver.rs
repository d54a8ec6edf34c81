//! Iterates over every input source and pushes each target through
//! resolution and download, one at a time.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::DownloadConfig;
use crate::download::{DownloadOrchestrator, ProcessOutcome};
use crate::feed::{self, FeedItem};
use crate::resolver::{ResolveError, ResolvedStream, StreamResolver};

/// Where a target came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// An explicit redirect-list URL.
    RedirectList(String),
    /// A direct page link.
    PageLink(String),
    /// An item identifier, expanded through the portal's item page template.
    Item(String),
    /// An entry of a category feed.
    FeedItem(FeedItem),
}

/// One thing to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub origin: Origin,
    /// Title used for logging, when known.
    pub title_hint: Option<String>,
}

impl Target {
    #[must_use]
    pub fn new(origin: Origin) -> Self {
        let title_hint = match &origin {
            Origin::FeedItem(item) => Some(item.title.clone()),
            _ => None,
        };
        Self { origin, title_hint }
    }
}

/// The four input collections of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    /// Redirect-list URLs.
    pub asx: Vec<String>,
    /// Category identifiers.
    pub categories: Vec<String>,
    /// Item identifiers.
    pub items: Vec<String>,
    /// Direct page links.
    pub links: Vec<String>,
}

impl Sources {
    /// Returns true if no source of any kind was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.asx.is_empty()
            && self.categories.is_empty()
            && self.items.is_empty()
            && self.links.is_empty()
    }
}

/// Per-outcome target counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub captured: usize,
    pub planned: usize,
    pub skipped: usize,
    pub unsupported: usize,
    pub unresolved: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Counts one orchestrator outcome.
    pub fn record(&mut self, outcome: &ProcessOutcome) {
        match outcome {
            ProcessOutcome::Captured { capture, .. } if capture.success => self.captured += 1,
            ProcessOutcome::Captured { .. }
            | ProcessOutcome::Failed { .. }
            | ProcessOutcome::NoDestination(_) => self.failed += 1,
            ProcessOutcome::Planned(_) => self.planned += 1,
            ProcessOutcome::AlreadyDownloaded(_) => self.skipped += 1,
            ProcessOutcome::Unsupported(_) => self.unsupported += 1,
            ProcessOutcome::Unresolved => self.unresolved += 1,
        }
    }

    /// Total number of targets seen.
    #[must_use]
    pub fn total(&self) -> usize {
        self.captured + self.planned + self.skipped + self.unsupported + self.unresolved + self.failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} target(s): {} captured, {} planned, {} skipped, {} unsupported, {} unresolved, {} failed",
            self.total(),
            self.captured,
            self.planned,
            self.skipped,
            self.unsupported,
            self.unresolved,
            self.failed
        )
    }
}

/// Sequential driver over all sources.
pub struct Driver {
    resolver: StreamResolver,
    orchestrator: DownloadOrchestrator,
}

impl Driver {
    #[must_use]
    pub fn new(resolver: StreamResolver, orchestrator: DownloadOrchestrator) -> Self {
        Self {
            resolver,
            orchestrator,
        }
    }

    /// Processes every source against the current time.
    pub async fn run(&self, sources: &Sources, config: &DownloadConfig) -> RunSummary {
        self.run_at(sources, config, Utc::now()).await
    }

    /// Processes every source, aging feed items against `now`.
    ///
    /// Sources are handled in order: redirect lists, categories, items, links.
    /// No per-target failure stops the run.
    pub async fn run_at(
        &self,
        sources: &Sources,
        config: &DownloadConfig,
        now: DateTime<Utc>,
    ) -> RunSummary {
        let mut summary = RunSummary::default();

        for url in &sources.asx {
            self.handle(Target::new(Origin::RedirectList(url.clone())), config, &mut summary)
                .await;
        }

        for category in &sources.categories {
            for item in self.category_items(category, config, now).await {
                self.handle(Target::new(Origin::FeedItem(item)), config, &mut summary)
                    .await;
            }
        }

        for item in &sources.items {
            self.handle(Target::new(Origin::Item(item.clone())), config, &mut summary)
                .await;
        }

        for link in &sources.links {
            self.handle(Target::new(Origin::PageLink(link.clone())), config, &mut summary)
                .await;
        }

        info!("Done: {summary}");
        summary
    }

    async fn category_items(
        &self,
        category: &str,
        config: &DownloadConfig,
        now: DateTime<Utc>,
    ) -> Vec<FeedItem> {
        let url = config.portal.category_feed_url(category);
        match feed::fetch_feed(self.resolver.client(), &url).await {
            Ok(items) => {
                let total = items.len();
                let selected = feed::select_items(items, now, config);
                debug!(category, total, selected = selected.len(), "Filtered category feed");
                selected
            }
            Err(error) => {
                warn!(category, error = %error, "Skipping category");
                Vec::new()
            }
        }
    }

    async fn handle(&self, target: Target, config: &DownloadConfig, summary: &mut RunSummary) {
        if let Some(title) = &target.title_hint {
            debug!(title = %title, "Processing target");
        }
        let resolved = self.resolve(&target, config).await;
        let outcome = self.orchestrator.process(&resolved, config).await;
        summary.record(&outcome);
    }

    /// Resolves a target; errors are logged and become `Unresolved`.
    async fn resolve(&self, target: &Target, config: &DownloadConfig) -> ResolvedStream {
        let result = match &target.origin {
            Origin::RedirectList(url) => self.resolver.resolve_redirect_list(url).await,
            Origin::PageLink(url) => self.resolve_link(url, config).await,
            Origin::Item(id) => {
                self.resolve_link(&config.portal.item_page_url(id), config)
                    .await
            }
            Origin::FeedItem(item) => self.resolve_link(&item.link, config).await,
        };

        result.unwrap_or_else(|error| {
            warn!(origin = ?target.origin, error = %error, "Resolution failed");
            ResolvedStream::Unresolved
        })
    }

    async fn resolve_link(
        &self,
        url: &str,
        config: &DownloadConfig,
    ) -> Result<ResolvedStream, ResolveError> {
        if config.nav_json {
            self.resolver.resolve_nav_json(url, config).await
        } else {
            self.resolver.resolve_page_link(url, config).await
        }
    }
}
