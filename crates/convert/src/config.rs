//! Converter configuration loaded from environment variables.
//!
//! | Variable                  | Default                               |
//! |---------------------------|---------------------------------------|
//! | `CONVERTER_BACKEND`       | `local` (`local`, `batch`, `remote`)  |
//! | `SCRATCH_DIR`             | `/tmp/dci-gateway`                    |
//! | `BABEL_COMMAND`           | `babel`                               |
//! | `INCHI_COMMAND`           | `inchi-1`                             |
//! | `TOOL_TIMEOUT_SECS`       | `60`                                  |
//! | `BATCH_SUBMIT_COMMAND`    | `condor_submit`                       |
//! | `BATCH_WORKER_EXECUTABLE` | `dci-worker`                          |
//! | `BATCH_POLL_INTERVAL_MS`  | `500`                                 |
//! | `BATCH_TIMEOUT_SECS`      | `60`                                  |
//! | `ALATIS_API_URL`          | `http://alatis.nmrfam.wisc.edu/upload`|

use std::path::PathBuf;
use std::process::Stdio;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_SCRATCH_DIR: &str = "/tmp/dci-gateway";
const DEFAULT_ALATIS_API_URL: &str = "http://alatis.nmrfam.wisc.edu/upload";

/// Which [`Converter`](crate::Converter) implementation serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Local,
    Batch,
    Remote,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Local => "local",
            Backend::Batch => "batch",
            Backend::Remote => "remote",
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Backend::Local),
            "batch" | "condor" => Ok(Backend::Batch),
            "remote" => Ok(Backend::Remote),
            other => Err(format!("unknown converter backend '{other}'")),
        }
    }
}

/// An external program plus any leading arguments, e.g. `nice -n 10 babel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    /// Split a command line on whitespace. Returns `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// A [`tokio::process::Command`] with the leading arguments applied.
    pub fn command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::null());
        cmd
    }
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// The format converter and identifier binaries used in-process and by
/// the batch worker.
#[derive(Debug, Clone)]
pub struct LocalToolsConfig {
    pub babel: ToolCommand,
    pub inchi: ToolCommand,
    pub timeout: Duration,
}

impl LocalToolsConfig {
    /// Load tool settings from the environment.
    ///
    /// # Panics
    ///
    /// Panics if `TOOL_TIMEOUT_SECS` is set but not a valid `u64`.
    pub fn from_env() -> Self {
        Self {
            babel: tool_from_env("BABEL_COMMAND", "babel"),
            inchi: tool_from_env("INCHI_COMMAND", "inchi-1"),
            timeout: secs_from_env("TOOL_TIMEOUT_SECS", 60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Scheduler submit command; the job file path is appended.
    pub submit: ToolCommand,
    /// Executable named in the job description.
    pub worker_executable: String,
    pub poll_interval: Duration,
    /// Deadline for the job's result file to appear.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub api_url: String,
    pub timeout: Duration,
}

/// Full converter configuration.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub backend: Backend,
    /// Parent of the per-request scratch directories.
    pub scratch_root: PathBuf,
    pub tools: LocalToolsConfig,
    pub batch: BatchConfig,
    pub remote: RemoteConfig,
}

impl ConvertConfig {
    /// Load converter configuration from environment variables.
    ///
    /// # Panics
    ///
    /// Panics if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Self {
        let backend = match std::env::var("CONVERTER_BACKEND") {
            Ok(value) => value
                .parse()
                .unwrap_or_else(|e| panic!("CONVERTER_BACKEND: {e}")),
            Err(_) => Backend::default(),
        };

        let scratch_root = std::env::var("SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SCRATCH_DIR));

        let tools = LocalToolsConfig::from_env();

        let batch = BatchConfig {
            submit: tool_from_env("BATCH_SUBMIT_COMMAND", "condor_submit"),
            worker_executable: std::env::var("BATCH_WORKER_EXECUTABLE")
                .unwrap_or_else(|_| "dci-worker".into()),
            poll_interval: Duration::from_millis(
                std::env::var("BATCH_POLL_INTERVAL_MS")
                    .ok()
                    .map(|v| v.parse().expect("BATCH_POLL_INTERVAL_MS must be a valid u64"))
                    .unwrap_or(500),
            ),
            timeout: secs_from_env("BATCH_TIMEOUT_SECS", 60),
        };

        let remote = RemoteConfig {
            api_url: std::env::var("ALATIS_API_URL")
                .unwrap_or_else(|_| DEFAULT_ALATIS_API_URL.into()),
            timeout: tools.timeout,
        };

        Self {
            backend,
            scratch_root,
            tools,
            batch,
            remote,
        }
    }

    /// Longest the selected backend may take for one conversion.
    pub fn deadline(&self) -> Duration {
        match self.backend {
            Backend::Local => self.tools.timeout,
            Backend::Batch => crate::batch::SUBMIT_TIMEOUT + self.batch.timeout,
            Backend::Remote => self.remote.timeout,
        }
    }
}

fn tool_from_env(var: &str, default: &str) -> ToolCommand {
    std::env::var(var)
        .ok()
        .and_then(|line| ToolCommand::parse(&line))
        .or_else(|| ToolCommand::parse(default))
        .unwrap_or_else(|| panic!("{var}: no command configured"))
}

fn secs_from_env(var: &str, default: u64) -> Duration {
    Duration::from_secs(
        std::env::var(var)
            .ok()
            .map(|v| {
                v.parse()
                    .unwrap_or_else(|_| panic!("{var} must be a valid u64"))
            })
            .unwrap_or(default),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_known_names() {
        assert_eq!("local".parse::<Backend>().unwrap(), Backend::Local);
        assert_eq!(" Batch ".parse::<Backend>().unwrap(), Backend::Batch);
        assert_eq!("condor".parse::<Backend>().unwrap(), Backend::Batch);
        assert_eq!("remote".parse::<Backend>().unwrap(), Backend::Remote);
        assert!("grid".parse::<Backend>().is_err());
    }

    #[test]
    fn tool_command_splits_leading_arguments() {
        let tool = ToolCommand::parse("  nice -n 10   babel ").unwrap();
        assert_eq!(tool.program, "nice");
        assert_eq!(tool.args, vec!["-n", "10", "babel"]);
        assert_eq!(tool.to_string(), "nice -n 10 babel");
    }

    fn config(backend: Backend) -> ConvertConfig {
        let tools = LocalToolsConfig {
            babel: ToolCommand::parse("babel").unwrap(),
            inchi: ToolCommand::parse("inchi-1").unwrap(),
            timeout: Duration::from_secs(60),
        };
        ConvertConfig {
            backend,
            scratch_root: PathBuf::from("/tmp/dci-test"),
            batch: BatchConfig {
                submit: ToolCommand::parse("condor_submit").unwrap(),
                worker_executable: "dci-worker".to_string(),
                poll_interval: Duration::from_millis(500),
                timeout: Duration::from_secs(60),
            },
            remote: RemoteConfig {
                api_url: DEFAULT_ALATIS_API_URL.to_string(),
                timeout: Duration::from_secs(45),
            },
            tools,
        }
    }

    #[test]
    fn deadline_follows_selected_backend() {
        assert_eq!(config(Backend::Local).deadline(), Duration::from_secs(60));
        assert_eq!(config(Backend::Batch).deadline(), Duration::from_secs(90));
        assert_eq!(config(Backend::Remote).deadline(), Duration::from_secs(45));
    }

    #[test]
    fn tool_command_rejects_blank_line() {
        assert!(ToolCommand::parse("   ").is_none());
    }
}
