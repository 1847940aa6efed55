//! Batch scheduler job descriptions (HTCondor submit syntax).

use std::fmt::Write;
use std::path::{Path, PathBuf};

use dci_core::conversion::{flag_value, ConversionOptions, InputFormat};
use dci_core::inchi::Inchi;

/// Job description file written into the scratch directory.
pub const JOB_FILE: &str = "job.sub";
/// Written by the worker on success; its presence ends polling.
pub const RESULT_FILE: &str = "inchi.txt";
/// Staging name for the result; renamed onto [`RESULT_FILE`] once complete.
pub const RESULT_TEMP_FILE: &str = "inchi.txt.tmp";
/// The job's stderr; any content here is a terminal failure.
pub const ERROR_FILE: &str = "job.err";
pub const OUTPUT_FILE: &str = "job.out";
pub const LOG_FILE: &str = "job.log";

/// One worker invocation for one structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescription {
    pub executable: String,
    pub arguments: Vec<String>,
    pub initial_dir: PathBuf,
}

impl JobDescription {
    /// The worker receives `<input> <format> <3d> <hydrogens>` and runs with
    /// `dir` as its working directory.
    pub fn for_request(
        executable: &str,
        dir: &Path,
        input_name: &str,
        format: InputFormat,
        options: ConversionOptions,
    ) -> Self {
        Self {
            executable: executable.to_string(),
            arguments: vec![
                dir.join(input_name).to_string_lossy().into_owned(),
                format.as_str().to_string(),
                flag_value(options.project_3d).to_string(),
                flag_value(options.add_hydrogens).to_string(),
            ],
            initial_dir: dir.to_path_buf(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "universe = vanilla");
        let _ = writeln!(out, "executable = {}", self.executable);
        let _ = writeln!(out, "arguments = \"{}\"", self.quoted_arguments());
        let _ = writeln!(out, "initialdir = {}", self.initial_dir.display());
        let _ = writeln!(out, "output = {OUTPUT_FILE}");
        let _ = writeln!(out, "error = {ERROR_FILE}");
        let _ = writeln!(out, "log = {LOG_FILE}");
        let _ = writeln!(out, "getenv = True");
        let _ = writeln!(out, "should_transfer_files = NO");
        let _ = writeln!(out, "queue");
        out
    }

    /// Arguments in the scheduler's quoted syntax: arguments containing
    /// spaces or single quotes are wrapped in single quotes, and embedded
    /// quotes are doubled.
    fn quoted_arguments(&self) -> String {
        self.arguments
            .iter()
            .map(|arg| {
                let escaped = arg.replace('"', "\"\"").replace('\'', "''");
                if arg.contains(char::is_whitespace) || arg.contains('\'') {
                    format!("'{escaped}'")
                } else {
                    escaped
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Publish the identifier as `dir/`[`RESULT_FILE`].
///
/// The content is staged under [`RESULT_TEMP_FILE`] and renamed into place,
/// so a poller never reads a partially written identifier.
pub async fn write_result(dir: &Path, inchi: &Inchi) -> std::io::Result<PathBuf> {
    let staged = dir.join(RESULT_TEMP_FILE);
    let target = dir.join(RESULT_FILE);
    tokio::fs::write(&staged, inchi.as_str()).await?;
    tokio::fs::rename(&staged, &target).await?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_result_publishes_by_rename() {
        let dir = tempfile::tempdir().unwrap();
        let inchi = Inchi::parse("InChI=1S/CH4/h1H4").unwrap();

        let path = write_result(dir.path(), &inchi).await.unwrap();

        assert_eq!(path, dir.path().join(RESULT_FILE));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "InChI=1S/CH4/h1H4");
        assert!(!dir.path().join(RESULT_TEMP_FILE).exists());
    }

    #[tokio::test]
    async fn write_result_replaces_previous_result() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RESULT_FILE), "stale").unwrap();
        let inchi = Inchi::parse("InChI=1S/H2O/h1H2").unwrap();

        write_result(dir.path(), &inchi).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join(RESULT_FILE)).unwrap();
        assert_eq!(content, "InChI=1S/H2O/h1H2");
    }

    #[test]
    fn render_lists_worker_arguments_and_channels() {
        let job = JobDescription::for_request(
            "/opt/dci/dci-worker",
            Path::new("/scratch/abc"),
            "input.pdb",
            InputFormat::Pdb,
            ConversionOptions {
                project_3d: true,
                add_hydrogens: false,
            },
        );

        let text = job.render();
        assert!(text.starts_with("universe = vanilla\n"));
        assert!(text.contains("executable = /opt/dci/dci-worker\n"));
        assert!(text.contains("arguments = \"/scratch/abc/input.pdb pdb 1 0\"\n"));
        assert!(text.contains("initialdir = /scratch/abc\n"));
        assert!(text.contains("error = job.err\n"));
        assert!(text.ends_with("queue\n"));
    }

    #[test]
    fn arguments_with_spaces_are_quoted() {
        let job = JobDescription::for_request(
            "dci-worker",
            Path::new("/tmp/my scratch"),
            "input.mol",
            InputFormat::Mol,
            ConversionOptions::default(),
        );
        assert_eq!(job.quoted_arguments(), "'/tmp/my scratch/input.mol' mol 0 0");
    }
}
