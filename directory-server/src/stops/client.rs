//! Stop registry feeds: HTTP download and local file.

use std::future::Future;
use std::path::PathBuf;

use tracing::info;

use super::StopSource;
use super::error::StopError;
use super::record::{StopRecord, parse_stop_registry};

/// Default URL of the Wiener Linien stop registry ("Haltepunkte").
pub const DEFAULT_STOPS_URL: &str =
    "https://www.wienerlinien.at/ogd_realtime/doku/ogd/wienerlinien-ogd-haltepunkte.csv";

/// Configuration for the stop registry client.
#[derive(Debug, Clone)]
pub struct StopClientConfig {
    /// URL of the semicolon-delimited registry
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StopClientConfig {
    /// Create a config pointing at the public registry.
    pub fn new() -> Self {
        Self {
            url: DEFAULT_STOPS_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom registry URL (for testing or mirrors).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for StopClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client that downloads the stop registry over HTTP.
#[derive(Debug, Clone)]
pub struct StopClient {
    http: reqwest::Client,
    url: String,
}

impl StopClient {
    /// Create a new registry client.
    pub fn new(config: StopClientConfig) -> Result<Self, StopError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// Download and parse the registry.
    pub async fn fetch_all(&self) -> Result<Vec<StopRecord>, StopError> {
        info!(url = %self.url, "fetching stop registry");

        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(StopError::Fetch {
                message: format!("HTTP {} from {}", status.as_u16(), self.url),
            });
        }

        let body = response.text().await?;
        parse_stop_registry(&body)
    }
}

impl StopSource for StopClient {
    fn fetch(&self) -> impl Future<Output = Result<Vec<StopRecord>, StopError>> + Send {
        self.fetch_all()
    }
}

/// A stop registry read from a local copy of the CSV.
#[derive(Debug, Clone)]
pub struct StopFile {
    path: PathBuf,
}

impl StopFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read and parse the registry file.
    pub async fn read_all(&self) -> Result<Vec<StopRecord>, StopError> {
        info!(path = %self.path.display(), "reading stop registry");

        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StopError::Fetch {
                message: format!("failed to read {}: {}", self.path.display(), e),
            })?;

        parse_stop_registry(&body)
    }
}

impl StopSource for StopFile {
    fn fetch(&self) -> impl Future<Output = Result<Vec<StopRecord>, StopError>> + Send {
        self.read_all()
    }
}

/// Whichever registry feed the server was configured with.
#[derive(Debug, Clone)]
pub enum StopFeed {
    Http(StopClient),
    File(StopFile),
}

impl StopSource for StopFeed {
    async fn fetch(&self) -> Result<Vec<StopRecord>, StopError> {
        match self {
            StopFeed::Http(client) => client.fetch_all().await,
            StopFeed::File(file) => file.read_all().await,
        }
    }
}
