use std::time::Duration;

use dci_core::inchi::InchiError;

/// Errors raised while converting a structure.
///
/// `Timeout`, `JobFailed`, `SubmitFailed` and `NoIdentifier` are the
/// outcomes a user can act on; the rest are operational failures.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{tool} could not be started: {source}")]
    ToolNotFound {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with code {exit_code}: {stderr}")]
    ToolFailed {
        tool: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("{tool} timed out after {elapsed_ms}ms")]
    ToolTimeout { tool: String, elapsed_ms: u64 },

    #[error("job submission failed: {0}")]
    SubmitFailed(String),

    #[error("conversion job failed: {0}")]
    JobFailed(String),

    #[error("conversion did not finish within {0:?}")]
    Timeout(Duration),

    #[error("no InChI was produced for the structure")]
    NoIdentifier,

    #[error("converter returned an invalid identifier: {0}")]
    InvalidIdentifier(#[from] InchiError),

    #[error("remote converter error: {0}")]
    Remote(String),
}
