//! Batch job entry point: identify one structure file.
//!
//! Invoked by the scheduler as `dci-worker <input> <format> <3d> <hydrogens>`
//! with the job directory as working directory. On success the identifier is
//! published to `inchi.txt` there by an atomic rename. Any failure is printed
//! to stderr, which the scheduler captures into the job's error file, and the
//! exit code is 1. Logs go to stdout so they never count as job errors.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use dci_convert::config::LocalToolsConfig;
use dci_convert::job_file::{write_result, RESULT_FILE};
use dci_convert::local::identify_in_dir;
use dci_core::conversion::{parse_flag_value, ConversionOptions, InputFormat};
use dci_core::inchi::Inchi;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "dci-worker", about = "Generate the InChI for one structure file")]
struct Args {
    /// Structure file; tool output is written next to it.
    input: PathBuf,

    /// Structure format (mol, sdf, pdb, cdx, smi).
    format: InputFormat,

    /// Generate 3D coordinates (0 or 1).
    #[arg(value_parser = parse_flag, action = ArgAction::Set)]
    project_3d: bool,

    /// Add explicit hydrogens (0 or 1).
    #[arg(value_parser = parse_flag, action = ArgAction::Set)]
    add_hydrogens: bool,
}

fn parse_flag(value: &str) -> Result<bool, String> {
    parse_flag_value(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dci_worker=info,dci_convert=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .init();

    let args = Args::parse();
    let tools = LocalToolsConfig::from_env();

    match run(&args, &tools).await {
        Ok(inchi) => {
            tracing::info!(inchi = %inchi, input = %args.input.display(), "Structure identified");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, tools: &LocalToolsConfig) -> anyhow::Result<Inchi> {
    let (dir, input_name) = split_input(&args.input)?;
    let options = ConversionOptions {
        project_3d: args.project_3d,
        add_hydrogens: args.add_hydrogens,
    };

    let inchi = identify_in_dir(tools, dir, input_name, args.format, options)
        .await
        .with_context(|| format!("failed to identify {}", args.input.display()))?;

    write_result(Path::new("."), &inchi)
        .await
        .with_context(|| format!("failed to write {RESULT_FILE}"))?;

    Ok(inchi)
}

/// Directory and file name of the input; a bare name lives in `.`.
fn split_input(input: &Path) -> anyhow::Result<(&Path, &str)> {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("invalid input path {}", input.display()))?;
    let dir = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scheduler_arguments() {
        let args = Args::try_parse_from(["dci-worker", "/job/input.pdb", "pdb", "1", "0"]).unwrap();
        assert_eq!(args.input, PathBuf::from("/job/input.pdb"));
        assert_eq!(args.format, InputFormat::Pdb);
        assert!(args.project_3d);
        assert!(!args.add_hydrogens);
    }

    #[test]
    fn rejects_non_binary_flags() {
        assert!(Args::try_parse_from(["dci-worker", "input.mol", "mol", "yes", "0"]).is_err());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Args::try_parse_from(["dci-worker", "input.xyz", "xyz", "0", "0"]).is_err());
    }

    #[test]
    fn bare_file_name_resolves_to_current_dir() {
        let (dir, name) = split_input(Path::new("input.mol")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "input.mol");

        let (dir, name) = split_input(Path::new("/job/input.sdf")).unwrap();
        assert_eq!(dir, Path::new("/job"));
        assert_eq!(name, "input.sdf");
    }
}
