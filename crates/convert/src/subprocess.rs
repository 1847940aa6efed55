//! Running the external conversion tools.
//!
//! [`run_tool`] spawns a [`ToolCommand`] with extra arguments, captures
//! stdout/stderr and enforces a timeout. Callers decide what a non-zero
//! exit code means; the identifier binary, for one, reports problems in
//! its log files rather than through its status.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::ToolCommand;
use crate::error::ConvertError;

/// Maximum stdout or stderr size captured per stream (1 MiB).
const MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// Captured result of one tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration_ms: u64,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Turn a non-zero exit into [`ConvertError::ToolFailed`].
    pub fn ensure_success(self, tool: &ToolCommand) -> Result<Self, ConvertError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ConvertError::ToolFailed {
                tool: tool.program.clone(),
                exit_code: self.exit_code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Spawn `tool` with `args` appended, optionally inside `working_dir`.
///
/// The child is killed if `timeout` expires before it exits.
pub async fn run_tool(
    tool: &ToolCommand,
    args: &[String],
    working_dir: Option<&Path>,
    timeout: Duration,
) -> Result<ToolOutput, ConvertError> {
    let mut cmd = tool.command();
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let start = Instant::now();

    let mut child = cmd.spawn().map_err(|source| ConvertError::ToolNotFound {
        tool: tool.program.clone(),
        source,
    })?;

    let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
    let stderr_task = tokio::spawn(read_stream(child.stderr.take()));

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => {
            let stdout = stdout_task.await.unwrap_or_default();
            let stderr = stderr_task.await.unwrap_or_default();
            let output = ToolOutput {
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
                exit_code: status.code().unwrap_or(-1),
                duration_ms: start.elapsed().as_millis() as u64,
            };
            tracing::debug!(
                tool = %tool,
                exit_code = output.exit_code,
                duration_ms = output.duration_ms,
                "Tool finished",
            );
            Ok(output)
        }
        Ok(Err(e)) => Err(ConvertError::Io(e)),
        // `child` is dropped on return, which kills it.
        Err(_elapsed) => Err(ConvertError::ToolTimeout {
            tool: tool.program.clone(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        }),
    }
}

/// Read an entire output stream, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(h) = handle {
        let _ = h
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
    }
    buf
}
