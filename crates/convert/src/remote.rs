//! Conversion through the ALATIS web API.

use std::time::Duration;

use async_trait::async_trait;
use dci_core::conversion::{flag_value, ConversionRequest};
use dci_core::encoding::encode_form_value;
use dci_core::inchi::Inchi;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::config::RemoteConfig;
use crate::error::ConvertError;
use crate::Converter;

/// Fields read from the API's JSON response.
#[derive(Debug, Deserialize)]
struct AlatisResponse {
    #[serde(default)]
    inchi: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct RemoteConverter {
    client: reqwest::Client,
    api_url: String,
    timeout: Duration,
}

impl RemoteConverter {
    pub fn new(config: &RemoteConfig) -> Result<Self, ConvertError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConvertError::Remote(e.to_string()))?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            timeout: config.timeout,
        })
    }
}

/// The urlencoded upload form. The structure goes out byte for byte, since
/// formats such as CDX are binary.
fn form_body(request: &ConversionRequest) -> String {
    let fields: [(&str, &[u8]); 5] = [
        ("format", request.format.as_str().as_bytes()),
        ("response_type", b"json"),
        ("project_2_to_3", flag_value(request.options.project_3d).as_bytes()),
        ("add_hydrogens", flag_value(request.options.add_hydrogens).as_bytes()),
        ("input_text", &request.structure),
    ];
    fields
        .iter()
        .map(|(name, value)| format!("{name}={}", encode_form_value(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl Converter for RemoteConverter {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn convert(&self, request: ConversionRequest) -> Result<Inchi, ConvertError> {
        let response = self
            .client
            .post(&self.api_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form_body(&request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ConvertError::Timeout(self.timeout)
                } else {
                    ConvertError::Remote(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConvertError::Remote(format!("ALATIS returned HTTP {status}")));
        }

        let body: AlatisResponse = response
            .json()
            .await
            .map_err(|e| ConvertError::Remote(format!("invalid ALATIS response: {e}")))?;

        match (body.inchi.filter(|i| !i.trim().is_empty()), body.error) {
            (Some(inchi), _) => Ok(Inchi::parse(&inchi)?),
            (None, Some(error)) if !error.trim().is_empty() => {
                Err(ConvertError::JobFailed(error.trim().to_string()))
            }
            (None, _) => Err(ConvertError::NoIdentifier),
        }
    }
}
