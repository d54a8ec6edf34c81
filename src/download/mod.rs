//! Download orchestration for resolved streams.
//!
//! # Features
//!
//! - Deterministic destination path from the stream URL's last path segment
//! - Output directory created on demand
//! - Skip-if-exists de-duplication across runs
//! - Capture job followed by an optional transcode job
//! - Dry-run mode that reports destinations without side effects
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mtscrape_core::{DownloadConfig, DownloadOrchestrator, ProcessRunner, ResolvedStream};
//!
//! # async fn example() {
//! let config = DownloadConfig::new("./downloads");
//! let orchestrator = DownloadOrchestrator::new(Arc::new(ProcessRunner::new()));
//! let stream = ResolvedStream::Playable("mms://host/clip.wmv".to_string());
//! let outcome = orchestrator.process(&stream, &config).await;
//! println!("{outcome:?}");
//! # }
//! ```

mod filename;
mod orchestrator;

pub use filename::output_path_for;
pub use orchestrator::{DownloadOrchestrator, ProcessOutcome};
