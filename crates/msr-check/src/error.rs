//! Error type for everything the command-line front end can fail on.
//!
//! Every variant maps to exit code 2: the suite either could not be set up or
//! was aborted. Case failures are not errors; they live in the report.

use std::io;
use std::path::PathBuf;

use msr_engine::{RegistryError, RunError};
use thiserror::Error;

/// Failures outside the per-case verdicts.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A registry or profile file is not valid JSON for its schema.
    #[error("{}: {source}", path.display())]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// The registry failed load-time validation.
    #[error("invalid registry: {0}")]
    Registry(#[from] RegistryError),
    /// The run was aborted by a containment failure.
    #[error("run aborted: {0}")]
    Run(#[from] RunError),
    /// A `/dev/cpu` device node could not be opened.
    #[error(
        "cannot open {} (is the msr module loaded and are you root?): {source}",
        path.display()
    )]
    Device {
        /// Device node involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The host backend is not available on this target.
    #[error("the host MSR backend requires Linux /dev/cpu device nodes")]
    HostUnsupported,
}

impl CliError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        2
    }
}
