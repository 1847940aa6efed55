//! Conversion through the batch scheduler.
//!
//! The structure and a job description go into a scratch directory, the
//! submit command queues the job, and the directory is polled until the
//! worker writes its result, the job reports an error, or the deadline
//! passes.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use dci_core::conversion::ConversionRequest;
use dci_core::inchi::Inchi;

use crate::config::BatchConfig;
use crate::error::ConvertError;
use crate::job_file::{JobDescription, JOB_FILE};
use crate::poll::{wait_for_outputs, PollTargets};
use crate::scratch::ScratchDir;
use crate::subprocess::run_tool;
use crate::Converter;

/// Deadline for the submit command itself.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct BatchConverter {
    config: BatchConfig,
    scratch_root: PathBuf,
}

impl BatchConverter {
    pub fn new(config: BatchConfig, scratch_root: PathBuf) -> Self {
        Self {
            config,
            scratch_root,
        }
    }

    async fn run_job(
        &self,
        scratch: &ScratchDir,
        request: &ConversionRequest,
    ) -> Result<Inchi, ConvertError> {
        let input_name = request.input_file_name();
        scratch.write(&input_name, &request.structure).await?;

        let job = JobDescription::for_request(
            &self.config.worker_executable,
            scratch.path(),
            &input_name,
            request.format,
            request.options,
        );
        let job_path = scratch.write(JOB_FILE, job.render().as_bytes()).await?;

        let output = run_tool(
            &self.config.submit,
            &[job_path.to_string_lossy().into_owned()],
            Some(scratch.path()),
            SUBMIT_TIMEOUT,
        )
        .await?;
        if !output.success() {
            let stderr = output.stderr.trim();
            return Err(ConvertError::SubmitFailed(if stderr.is_empty() {
                format!("exit code {}", output.exit_code)
            } else {
                stderr.to_string()
            }));
        }

        tracing::info!(dir = %scratch.path().display(), "Conversion job submitted");

        let raw = wait_for_outputs(
            &PollTargets::in_dir(scratch.path()),
            self.config.poll_interval,
            self.config.timeout,
        )
        .await?;

        Ok(Inchi::parse(&raw)?)
    }
}

#[async_trait]
impl Converter for BatchConverter {
    fn name(&self) -> &'static str {
        "batch"
    }

    async fn convert(&self, request: ConversionRequest) -> Result<Inchi, ConvertError> {
        let scratch = ScratchDir::create(&self.scratch_root).await?;
        let result = self.run_job(&scratch, &request).await;
        scratch.finish(&result).await;
        result
    }
}
