//! Error types for external job execution.

use thiserror::Error;

/// Errors that can occur while running an external job.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started (not installed, not executable).
    #[error("failed to start '{program}': {source}\n  Suggestion: Check that '{program}' is installed and on PATH")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Waiting for the child process failed.
    #[error("failed waiting for '{program}': {source}")]
    Wait {
        /// The program being waited on.
        program: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Creates a spawn error.
    #[must_use]
    pub fn spawn(program: &str, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.to_string(),
            source,
        }
    }

    /// Creates a wait error.
    #[must_use]
    pub fn wait(program: &str, source: std::io::Error) -> Self {
        Self::Wait {
            program: program.to_string(),
            source,
        }
    }
}
