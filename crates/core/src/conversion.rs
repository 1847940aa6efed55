//! Structure input formats and the normalization rules applied before an
//! identifier is generated.
//!
//! The identifier binary only reads MOL/SDF connection tables. Anything else,
//! or any request for 3D projection or explicit hydrogens, is first passed
//! through the format converter to produce an SDF file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Marker the identifier binary writes at the start of its result line.
pub const INCHI_MARKER: &str = "InChI=";

/// Prefix of the SDF file produced by the format converter.
pub const NORMALIZED_PREFIX: &str = "alatis_obabel_converted_";

/// Accepted structure formats (the converter's `-i` codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    #[default]
    Mol,
    Sdf,
    Pdb,
    Cdx,
    Smi,
}

impl InputFormat {
    pub const ALL: [InputFormat; 5] = [
        InputFormat::Mol,
        InputFormat::Sdf,
        InputFormat::Pdb,
        InputFormat::Cdx,
        InputFormat::Smi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Mol => "mol",
            InputFormat::Sdf => "sdf",
            InputFormat::Pdb => "pdb",
            InputFormat::Cdx => "cdx",
            InputFormat::Smi => "smi",
        }
    }

    /// Human-readable label for form drop-downs.
    pub fn label(&self) -> &'static str {
        match self {
            InputFormat::Mol => "MOL",
            InputFormat::Sdf => "SDF",
            InputFormat::Pdb => "PDB",
            InputFormat::Cdx => "ChemDraw CDX",
            InputFormat::Smi => "SMILES",
        }
    }

    /// Whether the identifier binary can read this format directly.
    pub fn is_connection_table(&self) -> bool {
        matches!(self, InputFormat::Mol | InputFormat::Sdf)
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InputFormat {
    type Err = CoreError;

    /// Case-insensitive; blank input falls back to the default (`mol`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Ok(InputFormat::default());
        }
        InputFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| CoreError::Validation(format!("Unsupported structure format: {s}")))
    }
}

/// Optional processing steps requested alongside the structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Generate 3D coordinates (`--gen3d`).
    pub project_3d: bool,
    /// Add explicit hydrogens (`-h`).
    pub add_hydrogens: bool,
}

/// A structure to convert, with its format and processing options.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub structure: Vec<u8>,
    pub format: InputFormat,
    pub options: ConversionOptions,
}

impl ConversionRequest {
    /// Build a request, rejecting blank structures.
    pub fn new(
        structure: Vec<u8>,
        format: InputFormat,
        options: ConversionOptions,
    ) -> Result<Self, CoreError> {
        if structure.iter().all(u8::is_ascii_whitespace) {
            return Err(CoreError::Validation("No structure provided".to_string()));
        }
        Ok(Self {
            structure,
            format,
            options,
        })
    }

    /// File name the structure is written under in a scratch directory.
    pub fn input_file_name(&self) -> String {
        format!("input.{}", self.format)
    }
}

/// HTML checkbox semantics: only the literal `on` is set.
pub fn checkbox_flag(value: Option<&str>) -> bool {
    value.map(str::trim) == Some("on")
}

/// Wire form of a boolean flag for job arguments and the remote API.
pub fn flag_value(flag: bool) -> &'static str {
    if flag {
        "1"
    } else {
        "0"
    }
}

/// Inverse of [`flag_value`].
pub fn parse_flag_value(value: &str) -> Result<bool, CoreError> {
    match value.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(CoreError::Validation(format!(
            "Flag must be 0 or 1, got '{other}'"
        ))),
    }
}

/// Whether the structure must go through the format converter first.
pub fn needs_normalization(format: InputFormat, options: ConversionOptions) -> bool {
    options.project_3d || options.add_hydrogens || !format.is_connection_table()
}

/// Name of the converter's SDF output for a given input file name.
pub fn normalized_file_name(input_file_name: &str) -> String {
    format!("{NORMALIZED_PREFIX}{input_file_name}.sdf")
}

/// Arguments for the format converter (Open Babel `babel` syntax).
pub fn babel_args(
    format: InputFormat,
    input: &Path,
    output: &Path,
    options: ConversionOptions,
) -> Vec<String> {
    let mut args = vec![
        format!("-i{format}"),
        input.to_string_lossy().into_owned(),
    ];
    if options.project_3d {
        args.push("--gen3d".to_string());
    }
    if options.add_hydrogens {
        args.push("-h".to_string());
    }
    args.extend([
        "-osdf".to_string(),
        "-O".to_string(),
        output.to_string_lossy().into_owned(),
    ]);
    args
}

/// First line of identifier-binary output that carries an InChI.
pub fn extract_inchi(output: &str) -> Option<&str> {
    output
        .lines()
        .find(|line| line.contains(INCHI_MARKER))
        .map(str::trim)
}
