//! Station query error types.

use crate::directory::DirectoryError;
use crate::favorites::FavoriteError;

/// Errors from station queries.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Favorite(#[from] FavoriteError),
}

impl QueryError {
    /// Whether this is the "no such station" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            QueryError::Directory(DirectoryError::StationNotFound { .. })
        )
    }
}
