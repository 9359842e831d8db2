//! ReceitaWS registry client.
//!
//! One GET per lookup, never retried. The registry can be reached directly or
//! through a cross-origin relay that wraps the registry body in a JSON
//! envelope (`{"contents": "..."}`), as browser deployments require.

use crate::core::formatter::{normalize, CNPJ_DIGITS};
use crate::domain::model::CnpjRecord;
use crate::domain::ports::{ConfigProvider, RegistrySource};
use crate::utils::error::{LookupError, Result, INVALID_CNPJ_MESSAGE};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use url::Url;

pub const DEFAULT_REGISTRY_URL: &str = "https://www.receitaws.com.br/v1/cnpj";
pub const DEFAULT_RELAY_URL: &str = "https://api.allorigins.win/get";

const STATUS_ERROR: &str = "ERROR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Direct,
    Relay { endpoint: String },
}

#[derive(Debug, Deserialize)]
struct PayloadStatus {
    status: Option<String>,
    message: Option<String>,
}

pub struct RegistryClient {
    http: Client,
    base_url: String,
    transport: Transport,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>, transport: Transport) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            min_interval: Duration::ZERO,
            last_request: Mutex::new(None),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let transport = match config.relay_endpoint() {
            Some(endpoint) => Transport::Relay {
                endpoint: endpoint.to_string(),
            },
            None => Transport::Direct,
        };

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let mut client = Self::new(config.registry_base_url(), transport);
        client.http = builder.build()?;
        client.min_interval = Duration::from_secs(config.min_interval_secs());
        Ok(client)
    }

    /// Spaces consecutive requests at least `interval` apart.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn registry_url(&self, digits: &str) -> String {
        format!("{}/{}", self.base_url, digits)
    }

    fn request_url(&self, digits: &str) -> Result<Url> {
        let target = self.registry_url(digits);
        let parsed = match &self.transport {
            Transport::Direct => Url::parse(&target),
            Transport::Relay { endpoint } => {
                Url::parse_with_params(endpoint, &[("url", target.as_str())])
            }
        };

        parsed.map_err(|e| LookupError::ConfigValidationError {
            field: "registry_url".to_string(),
            message: e.to_string(),
        })
    }

    async fn throttle(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!("Throttling registry request for {:?}", wait);
                sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    pub async fn fetch_record(&self, raw_identifier: &str) -> Result<CnpjRecord> {
        let digits = normalize(raw_identifier);
        if digits.len() != CNPJ_DIGITS {
            return Err(LookupError::validation(INVALID_CNPJ_MESSAGE));
        }

        let url = self.request_url(&digits)?;
        self.throttle().await;

        tracing::debug!("Making registry request to: {}", url);
        let response = self.http.get(url).send().await?;
        tracing::debug!("Registry response status: {}", response.status());

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::HttpStatusError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload = match self.transport {
            Transport::Direct => body,
            Transport::Relay { .. } => unwrap_envelope(&body)?,
        };

        parse_payload(&payload)
    }
}

#[async_trait]
impl RegistrySource for RegistryClient {
    async fn fetch_record(&self, raw_identifier: &str) -> Result<CnpjRecord> {
        RegistryClient::fetch_record(self, raw_identifier).await
    }
}

/// The envelope must be a JSON object whose `contents` is a string.
fn unwrap_envelope(body: &str) -> Result<String> {
    let envelope: serde_json::Value = serde_json::from_str(body)?;
    match envelope.as_object().and_then(|obj| obj.get("contents")) {
        Some(serde_json::Value::String(contents)) => Ok(contents.clone()),
        _ => Err(LookupError::malformed_response(
            "relay envelope has no string contents",
        )),
    }
}

/// Parses the registry body, turning `status: "ERROR"` into a not-found
/// failure before the record itself is decoded.
pub fn parse_payload(payload: &str) -> Result<CnpjRecord> {
    let value: serde_json::Value = serde_json::from_str(payload)?;

    let status: PayloadStatus = serde_json::from_value(value.clone())?;
    if status.status.as_deref() == Some(STATUS_ERROR) {
        tracing::warn!(
            "Registry rejected lookup: {}",
            status.message.as_deref().unwrap_or("<no message>")
        );
        return Err(LookupError::not_found(status.message.as_deref()));
    }

    Ok(serde_json::from_value(value)?)
}
