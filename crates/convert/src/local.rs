//! In-process conversion with the format converter and identifier binary.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dci_core::conversion::{
    babel_args, extract_inchi, needs_normalization, normalized_file_name, ConversionOptions,
    ConversionRequest, InputFormat,
};
use dci_core::inchi::Inchi;

use crate::config::LocalToolsConfig;
use crate::error::ConvertError;
use crate::scratch::ScratchDir;
use crate::subprocess::run_tool;
use crate::Converter;

/// Side files the identifier binary leaves next to its input.
const TOOL_ARTIFACT_SUFFIXES: [&str; 3] = ["txt", "log", "prb"];

/// Runs the conversion tools inside the request.
pub struct LocalConverter {
    tools: LocalToolsConfig,
    scratch_root: PathBuf,
}

impl LocalConverter {
    pub fn new(tools: LocalToolsConfig, scratch_root: PathBuf) -> Self {
        Self {
            tools,
            scratch_root,
        }
    }
}

#[async_trait]
impl Converter for LocalConverter {
    fn name(&self) -> &'static str {
        "local"
    }

    /// Both tools share one deadline of `tools.timeout`; a tool still
    /// running when it passes is killed.
    async fn convert(&self, request: ConversionRequest) -> Result<Inchi, ConvertError> {
        let scratch = ScratchDir::create(&self.scratch_root).await?;
        let input_name = request.input_file_name();

        let result = match scratch.write(&input_name, &request.structure).await {
            Ok(_) => {
                let identify = identify_in_dir(
                    &self.tools,
                    scratch.path(),
                    &input_name,
                    request.format,
                    request.options,
                );
                match tokio::time::timeout(self.tools.timeout, identify).await {
                    Ok(result) => result,
                    Err(_elapsed) => Err(ConvertError::Timeout(self.tools.timeout)),
                }
            }
            Err(e) => Err(e),
        };

        scratch.finish(&result).await;
        result
    }
}

/// Generate the identifier for `dir/input_name`.
///
/// Normalizes through the format converter when the format or options
/// require it, runs the identifier binary on the resulting connection table,
/// and takes the first `InChI=` line of its `.txt` output. The binary's side
/// files are removed afterwards.
pub async fn identify_in_dir(
    tools: &LocalToolsConfig,
    dir: &Path,
    input_name: &str,
    format: InputFormat,
    options: ConversionOptions,
) -> Result<Inchi, ConvertError> {
    let mut target = input_name.to_string();

    if needs_normalization(format, options) {
        let output_name = normalized_file_name(input_name);
        let args = babel_args(format, &dir.join(input_name), &dir.join(&output_name), options);
        let output = run_tool(&tools.babel, &args, Some(dir), tools.timeout).await?;

        if !tokio::fs::try_exists(dir.join(&output_name)).await? {
            // Nothing to identify; report the converter's own complaint if any.
            output.ensure_success(&tools.babel)?;
            return Err(ConvertError::NoIdentifier);
        }
        if !output.success() {
            tracing::warn!(
                exit_code = output.exit_code,
                stderr = %output.stderr.trim(),
                "Format converter exited non-zero but produced output",
            );
        }
        target = output_name;
    }

    let target_path = dir.join(&target);
    if !tokio::fs::try_exists(&target_path).await? {
        return Err(ConvertError::NoIdentifier);
    }

    let output = run_tool(
        &tools.inchi,
        &[target_path.to_string_lossy().into_owned()],
        Some(dir),
        tools.timeout,
    )
    .await?;

    let report = read_optional(&dir.join(format!("{target}.txt"))).await?;
    remove_tool_artifacts(dir, &target).await;

    let Some(line) = report.as_deref().and_then(extract_inchi) else {
        tracing::info!(
            exit_code = output.exit_code,
            stderr = %output.stderr.trim(),
            "Identifier binary produced no InChI",
        );
        return Err(ConvertError::NoIdentifier);
    };

    Ok(Inchi::parse(line)?)
}

async fn read_optional(path: &Path) -> Result<Option<String>, ConvertError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn remove_tool_artifacts(dir: &Path, target: &str) {
    for suffix in TOOL_ARTIFACT_SUFFIXES {
        let path = dir.join(format!("{target}.{suffix}"));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove tool output"),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;
    use crate::config::ToolCommand;

    pub const METHANE: &str = "InChI=1S/CH4/h1H4";

    /// Identifier binary stand-in: writes a report next to its input.
    const FAKE_INCHI: &str = r#"
printf 'Structure: 1\nInChI=1S/CH4/h1H4\nAuxInfo=1/0/N:1/rA:1C/rB:/rC:;\n' > "$1.txt"
touch "$1.log" "$1.prb"
"#;

    /// Format converter stand-in: records its arguments and copies input
    /// to the `-O` target.
    const FAKE_BABEL: &str = r#"
echo "$@" > "$(dirname "$2")/babel_args"
cp "$2" "${@: -1}"
"#;

    /// Write `body` as a bash script in `dir` and wrap it as a tool.
    pub fn script_tool(dir: &Path, name: &str, body: &str) -> ToolCommand {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        ToolCommand {
            program: "bash".to_string(),
            args: vec![path.to_string_lossy().into_owned()],
        }
    }

    pub fn fake_tools(dir: &Path) -> LocalToolsConfig {
        LocalToolsConfig {
            babel: script_tool(dir, "babel.sh", FAKE_BABEL),
            inchi: script_tool(dir, "inchi.sh", FAKE_INCHI),
            timeout: Duration::from_secs(10),
        }
    }

    fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    // -- identify_in_dir ----------------------------------------------------

    #[tokio::test]
    async fn mol_input_goes_straight_to_identifier() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        std::fs::write(work.path().join("input.mol"), "methane").unwrap();

        let inchi = identify_in_dir(
            &fake_tools(bin.path()),
            work.path(),
            "input.mol",
            InputFormat::Mol,
            ConversionOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(inchi.as_str(), METHANE);
        // No converter run, and the identifier's side files are gone.
        assert_eq!(files_in(work.path()), vec!["input.mol"]);
    }

    #[tokio::test]
    async fn options_route_through_format_converter() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        std::fs::write(work.path().join("input.sdf"), "methane").unwrap();

        let options = ConversionOptions {
            project_3d: true,
            add_hydrogens: true,
        };
        let inchi = identify_in_dir(
            &fake_tools(bin.path()),
            work.path(),
            "input.sdf",
            InputFormat::Sdf,
            options,
        )
        .await
        .unwrap();

        assert_eq!(inchi.as_str(), METHANE);
        let args = std::fs::read_to_string(work.path().join("babel_args")).unwrap();
        assert!(args.starts_with("-isdf "));
        assert!(args.contains("--gen3d -h -osdf -O"));
        assert!(work
            .path()
            .join("alatis_obabel_converted_input.sdf.sdf")
            .exists());
    }

    #[tokio::test]
    async fn smiles_is_always_normalized() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        std::fs::write(work.path().join("input.smi"), "C").unwrap();

        identify_in_dir(
            &fake_tools(bin.path()),
            work.path(),
            "input.smi",
            InputFormat::Smi,
            ConversionOptions::default(),
        )
        .await
        .unwrap();

        let args = std::fs::read_to_string(work.path().join("babel_args")).unwrap();
        assert!(args.starts_with("-ismi "));
    }

    #[tokio::test]
    async fn missing_report_is_no_identifier() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        std::fs::write(work.path().join("input.mol"), "junk").unwrap();
        let mut tools = fake_tools(bin.path());
        tools.inchi = script_tool(bin.path(), "silent.sh", "echo 'Error: bad input' >&2");

        let result = identify_in_dir(
            &tools,
            work.path(),
            "input.mol",
            InputFormat::Mol,
            ConversionOptions::default(),
        )
        .await;

        assert_matches!(result, Err(ConvertError::NoIdentifier));
    }

    #[tokio::test]
    async fn failed_format_conversion_surfaces_converter_error() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        std::fs::write(work.path().join("input.pdb"), "junk").unwrap();
        let mut tools = fake_tools(bin.path());
        tools.babel = script_tool(bin.path(), "broken.sh", "echo 'cannot read pdb' >&2; exit 1");

        let result = identify_in_dir(
            &tools,
            work.path(),
            "input.pdb",
            InputFormat::Pdb,
            ConversionOptions::default(),
        )
        .await;

        assert_matches!(result, Err(ConvertError::ToolFailed { stderr, .. }) if stderr == "cannot read pdb");
    }

    // -- LocalConverter -----------------------------------------------------

    #[tokio::test]
    async fn converter_cleans_up_scratch_on_success() {
        let bin = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let converter = LocalConverter::new(fake_tools(bin.path()), root.path().to_path_buf());

        let request = ConversionRequest::new(
            b"methane".to_vec(),
            InputFormat::Mol,
            ConversionOptions::default(),
        )
        .unwrap();
        let inchi = converter.convert(request).await.unwrap();

        assert_eq!(inchi.as_str(), METHANE);
        assert!(files_in(root.path()).is_empty());
    }

    #[tokio::test]
    async fn converter_bounds_both_tools_by_one_deadline() {
        let bin = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        // Each tool alone finishes inside the deadline; together they do not.
        let tools = LocalToolsConfig {
            babel: script_tool(
                bin.path(),
                "slow_babel.sh",
                &format!("sleep 0.4\n{FAKE_BABEL}"),
            ),
            inchi: script_tool(
                bin.path(),
                "slow_inchi.sh",
                &format!("sleep 0.4\n{FAKE_INCHI}"),
            ),
            timeout: Duration::from_millis(600),
        };
        let converter = LocalConverter::new(tools, root.path().to_path_buf());

        let request =
            ConversionRequest::new(b"C".to_vec(), InputFormat::Smi, ConversionOptions::default())
                .unwrap();
        let result = converter.convert(request).await;

        assert_matches!(result, Err(ConvertError::Timeout(d)) if d == Duration::from_millis(600));
        // The failed attempt's scratch directory is kept.
        assert_eq!(files_in(root.path()).len(), 1);
    }
}
