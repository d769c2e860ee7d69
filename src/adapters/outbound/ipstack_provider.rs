//! ipstack Geolocation Provider
//!
//! Implements GeolocationProvider on top of the ipstack HTTP API.
//!
//! See: https://ipstack.com/documentation

use crate::domain::entities::GeolocationRecord;
use crate::domain::errors::ProviderError;
use crate::domain::ports::GeolocationProvider;
use crate::domain::value_objects::NormalizedAddress;
use crate::infrastructure::RetryPolicy;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// ipstack's error code for "no data for this address".
const NOT_FOUND_CODE: i64 = 404;

/// Configuration for the ipstack client.
#[derive(Clone)]
pub struct IpStackConfig {
    /// Base URL for the API (e.g., "https://api.ipstack.com")
    pub base_url: String,
    pub access_key: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl IpStackConfig {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.ipstack.com".to_string(),
            access_key: access_key.into(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl std::fmt::Debug for IpStackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpStackConfig")
            .field("base_url", &self.base_url)
            .field("access_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// ipstack-backed geolocation provider.
///
/// Transport failures are retried under the configured policy (unbounded by
/// default). Logical failures reported in the body are translated, never
/// passed through.
pub struct IpStackProvider {
    config: IpStackConfig,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl IpStackProvider {
    pub fn new(config: IpStackConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            config,
            client,
            retry: RetryPolicy::unbounded(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// One request/response round trip. Only transport problems surface as
    /// `ProviderError::Transport`.
    async fn fetch(&self, address: &NormalizedAddress) -> Result<Value, ProviderError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), address);
        let response = self
            .client
            .get(&url)
            .query(&[("access_key", self.config.access_key.as_str()), ("fields", "main")])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::InternalConsistency(e.without_url().to_string()))
    }
}

/// Inspect a provider body and turn it into a record or a typed failure.
///
/// A body without a `success` key is a success. A present but empty flag
/// (`false`, `null`, `0`, `""`) marks a failure.
pub(crate) fn interpret_body(body: Value) -> Result<GeolocationRecord, ProviderError> {
    if body.get("success").is_some_and(is_empty_value) {
        return Err(translate_failure(&body));
    }

    serde_json::from_value(body).map_err(|e| ProviderError::InternalConsistency(e.to_string()))
}

/// JSON values that count as "nothing there" in a provider payload.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn translate_failure(body: &Value) -> ProviderError {
    // code 0 carries no information
    let code = body
        .get("error")
        .filter(|error| !is_empty_value(error))
        .and_then(|error| error.get("code"))
        .and_then(Value::as_i64)
        .filter(|code| *code != 0);

    match code {
        Some(NOT_FOUND_CODE) => ProviderError::NotFound,
        other => ProviderError::UnknownProvider { code: other },
    }
}

#[async_trait]
impl GeolocationProvider for IpStackProvider {
    async fn resolve(&self, address: &NormalizedAddress) -> Result<GeolocationRecord, ProviderError> {
        tracing::debug!("asking ipstack for {}", address);

        let body = self
            .retry
            .run("ipstack request", || self.fetch(address), ProviderError::is_transport)
            .await?;

        let result = interpret_body(body);
        match &result {
            Ok(_) => tracing::info!("ipstack resolved {}", address),
            Err(e) => tracing::warn!("ipstack could not resolve {}: {:?}", address, e),
        }
        result
    }
}
