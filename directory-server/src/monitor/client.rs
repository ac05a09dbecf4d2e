//! Realtime monitor HTTP client.
//!
//! One request per call, covering every requested stop. The response
//! envelope is validated before its data section is decoded, so an
//! upstream error is reported as such even when the rest of the payload is
//! missing or malformed. Nothing is retried.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::{StopId, join_stop_ids};

use super::error::MonitorError;
use super::types::{Monitor, MonitorData, ResponseMessage, SUCCESS_CODE};

/// Default base URL of the Wiener Linien realtime API.
pub const DEFAULT_MONITOR_BASE_URL: &str = "https://www.wienerlinien.at/ogd_realtime";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the monitor client.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_MONITOR_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Envelope with the data section left undecoded.
#[derive(Debug, Deserialize)]
struct Envelope {
    message: ResponseMessage,
    data: Option<serde_json::Value>,
}

/// Longest slice of an upstream body kept in errors.
const MAX_BODY_CHARS: usize = 500;

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_BODY_CHARS).collect()
}

fn json_error(e: serde_json::Error, body: &str) -> MonitorError {
    MonitorError::Json {
        message: e.to_string(),
        body: Some(truncate_body(body)),
    }
}

/// Validate a monitor response body and extract its monitors.
pub fn parse_monitor_response(body: &str) -> Result<Vec<Monitor>, MonitorError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| json_error(e, body))?;

    if envelope.message.message_code != SUCCESS_CODE {
        return Err(MonitorError::Status {
            code: envelope.message.message_code,
            message: envelope.message.value,
        });
    }

    let data = match envelope.data {
        None | Some(serde_json::Value::Null) => return Err(MonitorError::EmptyData),
        Some(data) => data,
    };

    let data: MonitorData = serde_json::from_value(data).map_err(|e| json_error(e, body))?;
    Ok(data.monitors)
}

/// Realtime monitor API client.
///
/// Uses a semaphore to limit concurrent requests to the upstream.
#[derive(Debug, Clone)]
pub struct MonitorClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl MonitorClient {
    /// Create a new monitor client with the given configuration.
    pub fn new(config: MonitorConfig) -> Result<Self, MonitorError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// URL for a monitor query over the given stops.
    fn monitor_url(&self, stop_ids: &[StopId]) -> String {
        format!("{}/monitor?rbl={}", self.base_url, join_stop_ids(stop_ids))
    }

    /// Get live departures for the given stops.
    ///
    /// Returns the upstream monitors as-is. An empty id list yields an empty
    /// result without contacting the API.
    pub async fn get_monitors(&self, stop_ids: &[StopId]) -> Result<Vec<Monitor>, MonitorError> {
        if stop_ids.is_empty() {
            return Ok(Vec::new());
        }

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| MonitorError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.monitor_url(stop_ids);
        debug!(%url, "requesting monitors");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let result = parse_monitor_response(&body);

        // A failed HTTP status only matters if the body isn't an envelope.
        if !status.is_success() && matches!(result, Err(MonitorError::Json { .. })) {
            warn!(status = status.as_u16(), "monitor request failed");
            return Err(MonitorError::Api {
                status: status.as_u16(),
                message: truncate_body(&body),
            });
        }

        if let Err(e) = &result {
            warn!(error = %e, stops = stop_ids.len(), "monitor response rejected");
        }

        result
    }
}
