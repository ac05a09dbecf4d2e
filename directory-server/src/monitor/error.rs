//! Monitor client error types.

use std::fmt;

/// Errors from the realtime monitor client.
#[derive(Debug)]
pub enum MonitorError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// Response body was not a valid monitor envelope
    Json {
        message: String,
        body: Option<String>,
    },

    /// HTTP error status without a readable envelope
    Api { status: u16, message: String },

    /// Envelope reported a non-success message code
    Status { code: i64, message: String },

    /// Envelope reported success but carried no data section
    EmptyData,
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::Http(e) => write!(f, "HTTP error: {e}"),
            MonitorError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            MonitorError::Api { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            MonitorError::Status { code, message } => {
                write!(f, "monitor API reported code {code}: {message}")
            }
            MonitorError::EmptyData => write!(f, "monitor API returned no data"),
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MonitorError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        MonitorError::Http(err)
    }
}
