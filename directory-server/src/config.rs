//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::monitor::{DEFAULT_MONITOR_BASE_URL, MonitorConfig};
use crate::stops::{DEFAULT_STOPS_URL, StopClient, StopClientConfig, StopError, StopFeed, StopFile};

/// Error for an environment variable that is set but unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    key: &'static str,
    value: String,
    reason: String,
}

/// Runtime configuration of the directory server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to listen on (`BIND_ADDR`)
    pub bind_addr: SocketAddr,
    /// Stop registry URL (`STOPS_URL`)
    pub stops_url: String,
    /// Local registry copy; takes precedence over the URL (`STOPS_FILE`)
    pub stops_file: Option<PathBuf>,
    /// Realtime API base URL (`MONITOR_BASE_URL`)
    pub monitor_base_url: String,
    /// Concurrent realtime requests (`MONITOR_MAX_CONCURRENT`)
    pub monitor_max_concurrent: usize,
    /// Upstream request timeout in seconds (`HTTP_TIMEOUT_SECS`)
    pub http_timeout_secs: u64,
    /// Directory refresh period; `None` disables it (`DIRECTORY_REFRESH_HOURS`, 0 = off)
    pub refresh_interval: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            stops_url: DEFAULT_STOPS_URL.to_string(),
            stops_file: None,
            monitor_base_url: DEFAULT_MONITOR_BASE_URL.to_string(),
            monitor_max_concurrent: 5,
            http_timeout_secs: 30,
            refresh_interval: Some(Duration::from_secs(24 * 60 * 60)),
        }
    }
}

fn parse_var<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value.trim().parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(ConfigError {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

impl AppConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, falling back to defaults
    /// for unset or empty variables.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get("BIND_ADDR") {
            config.bind_addr = parse_var("BIND_ADDR", v)?;
        }
        if let Some(v) = get("STOPS_URL") {
            config.stops_url = v;
        }
        if let Some(v) = get("STOPS_FILE") {
            config.stops_file = Some(PathBuf::from(v));
        }
        if let Some(v) = get("MONITOR_BASE_URL") {
            config.monitor_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("MONITOR_MAX_CONCURRENT") {
            let n: usize = parse_var("MONITOR_MAX_CONCURRENT", v.clone())?;
            if n == 0 {
                return Err(ConfigError {
                    key: "MONITOR_MAX_CONCURRENT",
                    value: v,
                    reason: "must be at least 1".to_string(),
                });
            }
            config.monitor_max_concurrent = n;
        }
        if let Some(v) = get("HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = parse_var("HTTP_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = get("DIRECTORY_REFRESH_HOURS") {
            let hours: u64 = parse_var("DIRECTORY_REFRESH_HOURS", v)?;
            let secs = hours.checked_mul(60 * 60).ok_or_else(|| ConfigError {
                key: "DIRECTORY_REFRESH_HOURS",
                value: hours.to_string(),
                reason: "refresh period too long".to_string(),
            })?;
            config.refresh_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// The stop registry feed this configuration selects.
    pub fn stop_feed(&self) -> Result<StopFeed, StopError> {
        match &self.stops_file {
            Some(path) => Ok(StopFeed::File(StopFile::new(path))),
            None => {
                let config = StopClientConfig::new()
                    .with_url(&self.stops_url)
                    .with_timeout(self.http_timeout_secs);
                Ok(StopFeed::Http(StopClient::new(config)?))
            }
        }
    }

    /// Configuration for the realtime monitor client.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig::new()
            .with_base_url(&self.monitor_base_url)
            .with_max_concurrent(self.monitor_max_concurrent)
            .with_timeout(self.http_timeout_secs)
    }
}
