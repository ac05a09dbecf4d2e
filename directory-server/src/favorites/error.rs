//! Favorite store error types.

use crate::domain::UserId;

/// Errors from a favorite store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FavoriteError {
    /// The user already has this station as a favorite
    #[error("{station} is already a favorite of {user}")]
    Duplicate { user: UserId, station: String },

    /// The backing store failed. The in-memory store never fails; this is
    /// for implementations backed by a database or a remote service.
    #[error("favorite store error: {message}")]
    Backend { message: String },
}
