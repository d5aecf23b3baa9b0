//! HTTP client for the BrasilAPI CNPJ endpoint.

use std::error::Error as _;

use async_trait::async_trait;
use cnpj_core::{CompanyRecord, EnrichmentResult, FailureKind, Identifier, LookupConfig};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use crate::batch::Lookup;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Request error occurred: {}", describe(.0))]
    Transport(#[from] reqwest::Error),
    #[error("HTTP error occurred: {status} for url ({url})")]
    Status { status: StatusCode, url: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response body is not a JSON object")]
    NotAnObject,
}

impl LookupError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Transport,
            Self::Status { status, .. } => FailureKind::Http {
                status: status.as_u16(),
            },
            Self::Json(_) | Self::NotAnObject => FailureKind::Decode,
        }
    }
}

/// The error and its source chain, so "error sending request" also says why.
fn describe(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Registry lookup client: one GET per identifier, no retries.
pub struct LookupClient {
    client: reqwest::Client,
    base_url: String,
}

impl LookupClient {
    /// Create a client for `config.base_url`, e.g. `https://brasilapi.com.br`.
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("cnpj/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, identifier: &Identifier) -> String {
        format!("{}/api/cnpj/v1/{}", self.base_url, identifier)
    }

    /// Fetch and project the registry record for `identifier`.
    pub async fn fetch(&self, identifier: &Identifier) -> Result<CompanyRecord, LookupError> {
        let url = self.url_for(identifier);
        debug!(url = %url, "querying registry");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status { status, url });
        }

        let body = resp.bytes().await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        CompanyRecord::from_registry_json(&value).ok_or(LookupError::NotAnObject)
    }
}

#[async_trait]
impl Lookup for LookupClient {
    async fn lookup(&self, identifier: &Identifier) -> EnrichmentResult {
        match self.fetch(identifier).await {
            Ok(record) => EnrichmentResult::Success(record),
            Err(err) => {
                warn!(cnpj = %identifier, error = %err, "lookup failed");
                EnrichmentResult::Failure {
                    identifier: Some(identifier.clone()),
                    kind: err.kind(),
                    message: err.to_string(),
                }
            }
        }
    }
}
