//! Turns a resolved stream into a file on disk, at most once per destination.
//!
//! For a playable stream the orchestrator derives the destination path,
//! makes sure the output directory exists, skips the target if the file is
//! already there, runs the capture job and, when conversion is enabled, the
//! transcode job. Any job exit status ends the target; failures are logged
//! and never abort the run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::filename::output_path_for;
use crate::config::DownloadConfig;
use crate::process::{Job, JobOutcome, JobRunner};
use crate::resolver::ResolvedStream;

/// What happened to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Skipped: the origin is a known non-stream source.
    Unsupported(String),
    /// Nothing was resolved; nothing was attempted.
    Unresolved,
    /// The stream URL has no usable trailing path segment.
    NoDestination(String),
    /// Skipped: the destination file already exists.
    AlreadyDownloaded(PathBuf),
    /// Dry run: the stream would have been captured to this path.
    Planned(PathBuf),
    /// The capture job ran (with any exit status).
    Captured {
        path: PathBuf,
        capture: JobOutcome,
        /// Transcode exit, `None` when conversion is off or could not start.
        transcode: Option<JobOutcome>,
    },
    /// The target could not be processed (directory or capture start failure).
    Failed { path: PathBuf, reason: String },
}

/// Sequential download orchestrator.
pub struct DownloadOrchestrator {
    runner: Arc<dyn JobRunner>,
}

impl DownloadOrchestrator {
    /// Creates an orchestrator running jobs through `runner`.
    #[must_use]
    pub fn new(runner: Arc<dyn JobRunner>) -> Self {
        Self { runner }
    }

    /// Processes one resolved stream to completion.
    pub async fn process(
        &self,
        resolved: &ResolvedStream,
        config: &DownloadConfig,
    ) -> ProcessOutcome {
        let url = match resolved {
            ResolvedStream::Unsupported(reason) => {
                info!("[skip] this looks like a {reason} source");
                return ProcessOutcome::Unsupported(reason.clone());
            }
            ResolvedStream::Unresolved => return ProcessOutcome::Unresolved,
            ResolvedStream::Playable(url) => url,
        };

        let Some(outfile) = output_path_for(&config.output_dir, url) else {
            warn!(url = %url, "[skip] stream URL has no file name to save under");
            return ProcessOutcome::NoDestination(url.clone());
        };

        if !config.dry_run
            && let Err(reason) = ensure_output_dir(&config.output_dir).await
        {
            warn!(dir = %config.output_dir.display(), error = %reason, "Cannot create output directory");
            return ProcessOutcome::Failed {
                path: outfile,
                reason,
            };
        }

        match tokio::fs::try_exists(&outfile).await {
            Ok(true) => {
                info!("[skip] file already exists ({})", outfile.display());
                return ProcessOutcome::AlreadyDownloaded(outfile);
            }
            Ok(false) => {}
            Err(error) => {
                warn!(path = %outfile.display(), error = %error, "Cannot check destination");
                return ProcessOutcome::Failed {
                    path: outfile,
                    reason: error.to_string(),
                };
            }
        }

        if config.dry_run {
            info!("[plan] {url} -> {}", outfile.display());
            return ProcessOutcome::Planned(outfile);
        }

        self.capture_and_convert(url, outfile, config).await
    }

    async fn capture_and_convert(
        &self,
        url: &str,
        outfile: PathBuf,
        config: &DownloadConfig,
    ) -> ProcessOutcome {
        let job = Job::capture(&config.capture, &outfile, url);
        if !config.verbose {
            info!("{}", job.banner);
        }
        let capture = match self.runner.run_and_wait(&job, config.verbose).await {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(error = %error, "Capture could not be run");
                return ProcessOutcome::Failed {
                    path: outfile,
                    reason: error.to_string(),
                };
            }
        };
        warn_on_failure(&job, capture);

        let transcode = if config.convert {
            self.convert(&outfile, config).await
        } else {
            None
        };

        ProcessOutcome::Captured {
            path: outfile,
            capture,
            transcode,
        }
    }

    async fn convert(&self, file: &Path, config: &DownloadConfig) -> Option<JobOutcome> {
        let job = Job::transcode(&config.transcode, file);
        if !config.verbose {
            info!("{}", job.banner);
        }
        match self.runner.run_and_wait(&job, config.verbose).await {
            Ok(outcome) => {
                warn_on_failure(&job, outcome);
                Some(outcome)
            }
            Err(error) => {
                warn!(error = %error, "Transcode could not be run");
                None
            }
        }
    }
}

async fn ensure_output_dir(dir: &Path) -> Result<(), String> {
    match tokio::fs::metadata(dir).await {
        Ok(metadata) if metadata.is_dir() => return Ok(()),
        Ok(_) => return Err(format!("'{}' is not a directory", dir.display())),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => return Err(error.to_string()),
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|error| error.to_string())?;
    debug!(dir = %dir.display(), "Created output directory");
    Ok(())
}

fn warn_on_failure(job: &Job, outcome: JobOutcome) {
    if !outcome.success {
        warn!(
            program = %job.program,
            code = ?outcome.code,
            "[{}] job exited with non-zero status",
            job.kind.tag()
        );
    }
}
