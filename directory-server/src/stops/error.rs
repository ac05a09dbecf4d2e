//! Stop registry error types.

/// Errors that can occur while loading the stop registry.
#[derive(Debug, thiserror::Error)]
pub enum StopError {
    /// The registry could not be retrieved (network, HTTP status, file I/O)
    #[error("failed to fetch stop registry: {message}")]
    Fetch { message: String },

    /// The payload did not have the expected tabular shape
    #[error("stop registry schema error at line {line}: {message}")]
    Schema { line: u64, message: String },
}

impl From<reqwest::Error> for StopError {
    fn from(e: reqwest::Error) -> Self {
        StopError::Fetch {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StopError::Fetch {
            message: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to fetch stop registry: connection refused"
        );

        let err = StopError::Schema {
            line: 3,
            message: "invalid digit".into(),
        };
        assert_eq!(
            err.to_string(),
            "stop registry schema error at line 3: invalid digit"
        );
    }
}
