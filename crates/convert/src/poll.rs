//! Waiting on a batch job's output files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;

use crate::error::ConvertError;
use crate::job_file::{ERROR_FILE, RESULT_FILE};

/// The files a job reports through.
#[derive(Debug, Clone)]
pub struct PollTargets {
    pub result: PathBuf,
    pub error: PathBuf,
}

impl PollTargets {
    /// The standard result and error files inside a job directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            result: dir.join(RESULT_FILE),
            error: dir.join(ERROR_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// No result yet; a missing or empty result file both land here.
    Pending,
    Ready(String),
    Failed(String),
}

/// Inspect the job files once.
pub async fn check_outputs(targets: &PollTargets) -> Result<PollState, ConvertError> {
    if let Some(err) = read_trimmed(&targets.error).await? {
        return Ok(PollState::Failed(err));
    }
    Ok(match read_trimmed(&targets.result).await? {
        Some(result) => PollState::Ready(result),
        None => PollState::Pending,
    })
}

/// Poll every `interval` until the job succeeds, fails, or `timeout` passes.
pub async fn wait_for_outputs(
    targets: &PollTargets,
    interval: Duration,
    timeout: Duration,
) -> Result<String, ConvertError> {
    let deadline = Instant::now() + timeout;
    loop {
        match check_outputs(targets).await? {
            PollState::Ready(result) => return Ok(result),
            PollState::Failed(err) => return Err(ConvertError::JobFailed(err)),
            PollState::Pending => {}
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(ConvertError::Timeout(timeout));
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}

/// File contents with surrounding whitespace removed; `None` when the file
/// is missing or blank.
async fn read_trimmed(path: &Path) -> Result<Option<String>, ConvertError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => {
            let trimmed = text.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
