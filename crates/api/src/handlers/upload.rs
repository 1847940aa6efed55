//! Multipart structure uploads shared by the HTML and JSON conversion routes.
//!
//! Form fields: `infile` (file), `inputtext` (pasted structure), `FORMAT`,
//! and the `proj2to3` / `addHydr` checkboxes. A non-empty file wins over
//! pasted text.

use axum::extract::Multipart;
use dci_core::conversion::{checkbox_flag, ConversionOptions, ConversionRequest, InputFormat};

use crate::error::AppError;

/// Raw field values from the upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<Vec<u8>>,
    pub text: Option<String>,
    pub format: Option<String>,
    pub project_3d: Option<String>,
    pub add_hydrogens: Option<String>,
}

impl UploadForm {
    /// Drain `multipart` into a form. Unknown fields are skipped.
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "infile" => {
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    form.file = Some(data.to_vec());
                }
                "inputtext" | "FORMAT" | "proj2to3" | "addHydr" => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    let slot = match name.as_str() {
                        "inputtext" => &mut form.text,
                        "FORMAT" => &mut form.format,
                        "proj2to3" => &mut form.project_3d,
                        _ => &mut form.add_hydrogens,
                    };
                    *slot = Some(value);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Validate into a conversion request.
    ///
    /// An empty file falls back to the pasted text; nothing at all is a
    /// 400. An unknown format is a validation error.
    pub fn into_request(self) -> Result<ConversionRequest, AppError> {
        let structure = self
            .file
            .filter(|bytes| !bytes.iter().all(u8::is_ascii_whitespace))
            .or_else(|| self.text.map(String::into_bytes))
            .unwrap_or_default();
        if structure.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::BadRequest(
                "No structure provided: upload a file or paste the structure".to_string(),
            ));
        }

        let format: InputFormat = self.format.as_deref().unwrap_or_default().parse()?;
        let options = ConversionOptions {
            project_3d: checkbox_flag(self.project_3d.as_deref()),
            add_hydrogens: checkbox_flag(self.add_hydrogens.as_deref()),
        };

        Ok(ConversionRequest::new(structure, format, options)?)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn file_wins_over_text() {
        let request = UploadForm {
            file: Some(b"file structure".to_vec()),
            text: Some("pasted".to_string()),
            ..Default::default()
        }
        .into_request()
        .unwrap();
        assert_eq!(request.structure, b"file structure");
        assert_eq!(request.format, InputFormat::Mol);
    }

    #[test]
    fn empty_file_falls_back_to_text() {
        let request = UploadForm {
            file: Some(Vec::new()),
            text: Some("C".to_string()),
            format: Some("smi".to_string()),
            project_3d: Some("on".to_string()),
            ..Default::default()
        }
        .into_request()
        .unwrap();
        assert_eq!(request.structure, b"C");
        assert_eq!(request.format, InputFormat::Smi);
        assert!(request.options.project_3d);
        assert!(!request.options.add_hydrogens);
    }

    #[test]
    fn nothing_uploaded_is_bad_request() {
        let result = UploadForm {
            file: Some(Vec::new()),
            text: Some("  \n".to_string()),
            ..Default::default()
        }
        .into_request();
        assert_matches!(result, Err(AppError::BadRequest(_)));
    }

    #[test]
    fn unknown_format_is_validation_error() {
        let result = UploadForm {
            text: Some("C".to_string()),
            format: Some("xyz".to_string()),
            ..Default::default()
        }
        .into_request();
        assert_matches!(result, Err(AppError::Core(_)));
    }
}
