//! External job runner for capture and transcode commands.
//!
//! Jobs are launched without blocking and then either awaited silently or
//! polled every [`DEFAULT_POLL_INTERVAL`] while a spinner glyph is redrawn in
//! place. The poll runs on the launching task; no extra threads or channels
//! are involved.

mod error;

pub use error::ProcessError;

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::process::Command;
use tracing::debug;

use crate::config::ToolCommand;

/// Delay between completion polls while the spinner is shown.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Spinner frames; the last one is the "done" glyph shown on completion.
const SPINNER_FRAMES: [&str; 5] = ["-", "\\", "|", "/", "."];

/// What kind of work a job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Dumps a stream to a file.
    Capture,
    /// Converts a captured file.
    Transcode,
}

impl JobKind {
    /// Short tag used in operator output.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Capture => "dump",
            Self::Transcode => "conv",
        }
    }
}

/// A fully specified external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Capture or transcode.
    pub kind: JobKind,
    /// Executable name or path.
    pub program: String,
    /// Full argument list, fixed flags first.
    pub args: Vec<String>,
    /// Line shown next to the spinner.
    pub banner: String,
}

impl Job {
    /// Capture job: `program flags... <outfile> <url>`.
    #[must_use]
    pub fn capture(command: &ToolCommand, outfile: &Path, url: &str) -> Self {
        let outfile = outfile.display().to_string();
        let mut args = command.flags.clone();
        args.push(outfile.clone());
        args.push(url.to_string());
        Self {
            kind: JobKind::Capture,
            program: command.program.clone(),
            args,
            banner: format!("[{}] {url} -> {outfile}", JobKind::Capture.tag()),
        }
    }

    /// Transcode job: `program flags... <file>`.
    #[must_use]
    pub fn transcode(command: &ToolCommand, file: &Path) -> Self {
        let file = file.display().to_string();
        let mut args = command.flags.clone();
        args.push(file.clone());
        Self {
            kind: JobKind::Transcode,
            program: command.program.clone(),
            args,
            banner: format!("[{}] {file}", JobKind::Transcode.tag()),
        }
    }
}

/// Exit information of a finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOutcome {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    /// Whether the process reported success.
    pub success: bool,
}

impl JobOutcome {
    /// A successful exit with code 0.
    #[must_use]
    pub fn succeeded() -> Self {
        Self {
            code: Some(0),
            success: true,
        }
    }

    /// A failed exit with the given code.
    #[must_use]
    pub fn failed(code: i32) -> Self {
        Self {
            code: Some(code),
            success: false,
        }
    }
}

impl From<ExitStatus> for JobOutcome {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
            success: status.success(),
        }
    }
}

/// Runs a job to completion.
///
/// This is the seam the orchestrator depends on, so tests can substitute a
/// recording runner for real child processes.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Launches `job` and returns once it has exited.
    async fn run_and_wait(&self, job: &Job, show_liveness: bool)
    -> Result<JobOutcome, ProcessError>;
}

/// Runs jobs as real child processes.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    poll_interval: Duration,
}

impl ProcessRunner {
    /// Creates a runner with the default poll interval.
    #[must_use]
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Creates a runner with a custom poll interval.
    #[must_use]
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobRunner for ProcessRunner {
    #[tracing::instrument(skip(self, job), fields(kind = job.kind.tag(), program = %job.program))]
    async fn run_and_wait(
        &self,
        job: &Job,
        show_liveness: bool,
    ) -> Result<JobOutcome, ProcessError> {
        let mut child = Command::new(&job.program)
            .args(&job.args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|source| ProcessError::spawn(&job.program, source))?;
        debug!(pid = child.id(), args = ?job.args, "Job started");

        let status = if show_liveness {
            let spinner = liveness_spinner(&job.banner);
            let status = loop {
                if let Some(status) = child
                    .try_wait()
                    .map_err(|source| ProcessError::wait(&job.program, source))?
                {
                    break status;
                }
                spinner.tick();
                tokio::time::sleep(self.poll_interval).await;
            };
            spinner.finish();
            status
        } else {
            child
                .wait()
                .await
                .map_err(|source| ProcessError::wait(&job.program, source))?
        };

        let outcome = JobOutcome::from(status);
        debug!(code = ?outcome.code, success = outcome.success, "Job exited");
        Ok(outcome)
    }
}

fn liveness_spinner(banner: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&SPINNER_FRAMES),
    );
    spinner.set_message(banner.to_string());
    spinner
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_capture_job_appends_outfile_then_url() {
        let job = Job::capture(
            &ToolCommand::default_capture(),
            &PathBuf::from("/tmp/out/x.wmv"),
            "mms://host/x.wmv",
        );
        assert_eq!(job.kind, JobKind::Capture);
        assert_eq!(job.program, "mplayer");
        assert_eq!(
            job.args,
            vec![
                "-nolirc",
                "-really-quiet",
                "-dumpstream",
                "-dumpfile",
                "/tmp/out/x.wmv",
                "mms://host/x.wmv",
            ]
        );
        assert_eq!(job.banner, "[dump] mms://host/x.wmv -> /tmp/out/x.wmv");
    }

    #[test]
    fn test_transcode_job_takes_single_file_argument() {
        let job = Job::transcode(
            &ToolCommand::default_transcode(),
            &PathBuf::from("/tmp/out/x.wmv"),
        );
        assert_eq!(job.kind, JobKind::Transcode);
        assert_eq!(job.program, "ffmpeg2theora");
        assert_eq!(job.args, vec!["/tmp/out/x.wmv"]);
        assert_eq!(job.banner, "[conv] /tmp/out/x.wmv");
    }

    #[cfg(unix)]
    fn shell_job(script: &str) -> Job {
        Job {
            kind: JobKind::Capture,
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            banner: "[dump] test".to_string(),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_and_wait_reports_success() {
        let outcome = ProcessRunner::new()
            .run_and_wait(&shell_job("exit 0"), false)
            .await
            .unwrap();
        assert_eq!(outcome, JobOutcome::succeeded());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_and_wait_reports_exit_code() {
        let outcome = ProcessRunner::new()
            .run_and_wait(&shell_job("exit 3"), false)
            .await
            .unwrap();
        assert_eq!(outcome, JobOutcome::failed(3));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_and_wait_with_liveness_polls_until_exit() {
        let runner = ProcessRunner::with_poll_interval(Duration::from_millis(10));
        let outcome = runner
            .run_and_wait(&shell_job("sleep 0.1; exit 4"), true)
            .await
            .unwrap();
        assert_eq!(outcome, JobOutcome::failed(4));
    }

    #[tokio::test]
    async fn test_run_and_wait_missing_program_is_spawn_error() {
        let job = Job {
            kind: JobKind::Transcode,
            program: "mtscrape-no-such-program".to_string(),
            args: Vec::new(),
            banner: String::new(),
        };
        let err = ProcessRunner::new()
            .run_and_wait(&job, false)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
        assert!(err.to_string().contains("mtscrape-no-such-program"));
    }
}
