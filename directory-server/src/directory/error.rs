//! Station directory error types.

use std::sync::Arc;

use crate::stops::StopError;

/// Errors from the station directory.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    /// No station with this exact name exists
    #[error("no such station: {name}")]
    StationNotFound { name: String },

    /// Building the directory failed; shared by every caller that waited on the build
    #[error("station directory unavailable: {0}")]
    Build(Arc<StopError>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DirectoryError::StationNotFound {
            name: "Nowhere".into(),
        };
        assert_eq!(err.to_string(), "no such station: Nowhere");

        let err = DirectoryError::Build(Arc::new(StopError::Fetch {
            message: "timed out".into(),
        }));
        assert_eq!(
            err.to_string(),
            "station directory unavailable: failed to fetch stop registry: timed out"
        );
    }
}
