//! Mtscrape Core Library
//!
//! This library resolves playable stream URLs from a video portal's feeds
//! and pages and turns each resolved URL into a file on disk exactly once.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Read-only run configuration and file-config loading
//! - [`resolver`] - Redirect-list resolution and page link scraping
//! - [`process`] - External capture/transcode job runner with liveness spinner
//! - [`download`] - Download orchestration (skip, capture, convert)
//! - [`feed`] - Category feed fetching and item filtering
//! - [`driver`] - Iteration over all input sources, one target at a time

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod driver;
pub mod feed;
pub mod process;
pub mod resolver;
mod user_agent;

// Re-export commonly used types
pub use config::{
    ConfigError, DEFAULT_MAX_AGE_DAYS, DownloadConfig, FileConfig, HttpSettings, PortalEndpoints,
    TitleFilter, ToolCommand, load_default_file_config,
};
pub use download::{DownloadOrchestrator, ProcessOutcome, output_path_for};
pub use driver::{Driver, Origin, RunSummary, Sources, Target};
pub use feed::{FeedError, FeedItem, is_within_age};
pub use process::{Job, JobKind, JobOutcome, JobRunner, ProcessError, ProcessRunner};
pub use resolver::{QualityTier, ResolveError, ResolvedStream, StreamResolver};
