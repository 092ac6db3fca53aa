// ============================================================================
// src/error.rs – Fatal error taxonomy and process exit codes
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

/// Exit status for a rejected disk label.
pub const EXIT_INVALID_LABEL: u8 = 1;
/// Exit status for every other fatal condition.
pub const EXIT_FATAL: u8 = 2;

/// Every variant aborts the whole run. There is no per-LUN recovery.
#[derive(Debug, thiserror::Error)]
pub enum LunError {
    #[error("Not Solaris (running on {0})")]
    UnsupportedPlatform(String),

    #[error("unable to chdir to {}", .path.display())]
    ChangeDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("disk label format incorrect: {0:?} (1-8 letters, digits or underscores)")]
    InvalidLabel(String),

    #[error("Lun name failed input format check: {0:?}")]
    InvalidLunId(String),

    #[error("List of luns too large ({count} given, at most {max} allowed)")]
    TooManyLuns { count: usize, max: usize },

    #[error("Command '{0}' not in allowlist")]
    NotAllowlisted(String),

    #[error("unable to start {program}")]
    ProcessLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O with {program} failed")]
    ProcessIo {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {timeout:?}")]
    ProcessTimeout { program: String, timeout: Duration },

    #[error("Unable to ls {path}. Verify it exists. ({detail})")]
    DeviceResolve { path: String, detail: String },

    #[error("Unable to chown {device} (exit status {status}): {output}")]
    Chown {
        device: String,
        status: i32,
        output: String,
    },

    #[error("unable to write ticket paths")]
    Output(#[from] std::io::Error),

    #[error("configuration error: {0:#}")]
    Config(anyhow::Error),
}

impl LunError {
    pub fn exit_code(&self) -> u8 {
        match self {
            LunError::InvalidLabel(_) => EXIT_INVALID_LABEL,
            _ => EXIT_FATAL,
        }
    }
}

pub type Result<T, E = LunError> = std::result::Result<T, E>;
