//! Conversion of molecular structures into InChI identifiers.
//!
//! Three backends implement [`Converter`]:
//!
//! - [`local::LocalConverter`] runs the format converter and the identifier
//!   binary directly, inside the request.
//! - [`batch::BatchConverter`] writes a job description, hands it to the
//!   batch scheduler and polls the job directory for its output files.
//! - [`remote::RemoteConverter`] posts the structure to the ALATIS web API.
//!
//! The external binaries and the scheduler are never reimplemented here;
//! this crate only prepares inputs, runs commands and reads their files.

use std::sync::Arc;

use async_trait::async_trait;
use dci_core::conversion::ConversionRequest;
use dci_core::inchi::Inchi;

pub mod batch;
pub mod config;
pub mod error;
pub mod job_file;
pub mod local;
pub mod poll;
pub mod remote;
pub mod scratch;
pub mod subprocess;

pub use config::{Backend, ConvertConfig};
pub use error::ConvertError;

/// A backend that turns a structure into an identifier.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;

    async fn convert(&self, request: ConversionRequest) -> Result<Inchi, ConvertError>;
}

/// Build the backend selected by `config.backend`.
pub fn build_converter(config: &ConvertConfig) -> Result<Arc<dyn Converter>, ConvertError> {
    let converter: Arc<dyn Converter> = match config.backend {
        Backend::Local => Arc::new(local::LocalConverter::new(
            config.tools.clone(),
            config.scratch_root.clone(),
        )),
        Backend::Batch => Arc::new(batch::BatchConverter::new(
            config.batch.clone(),
            config.scratch_root.clone(),
        )),
        Backend::Remote => Arc::new(remote::RemoteConverter::new(&config.remote)?),
    };
    Ok(converter)
}
