/**
 * API Error Types
 *
 * This module defines the error type returned by HTTP handlers. Each
 * variant maps to an HTTP status code; the conversion to a JSON response
 * lives in `error::conversion`.
 *
 * Producer-side callers only ever see persistence problems as errors —
 * push-path failures are handled inside the alarm subsystem and never
 * surface here.
 */
use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::alarm::store::AlarmStoreError;

/// Errors surfaced by the HTTP API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Username is already taken (join)
    #[error("username {username} is already taken")]
    DuplicateUsername { username: String },

    /// Referenced user does not exist
    #[error("user {username} not found")]
    UserNotFound { username: String },

    /// Referenced post does not exist
    #[error("post {post_id} not found")]
    PostNotFound { post_id: Uuid },

    /// Credentials did not match (also covers unknown login names, so the
    /// response does not leak which usernames exist)
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Missing, malformed, or expired bearer token
    #[error("invalid token")]
    InvalidToken,

    /// Caller does not own the resource they tried to mutate
    #[error("user {user_id} has no permission on post {post_id}")]
    InvalidPermission { user_id: Uuid, post_id: Uuid },

    /// The caller already has a live like on this post
    #[error("user {user_id} already liked post {post_id}")]
    AlreadyLiked { user_id: Uuid, post_id: Uuid },

    /// The database is not configured on this deployment
    #[error("database not configured")]
    DatabaseUnavailable,

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Alarm persistence failure, propagated from the dispatcher
    #[error(transparent)]
    AlarmStore(#[from] AlarmStoreError),

    /// Password hashing failure
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// Token creation failure
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DuplicateUsername { .. } | Self::AlreadyLiked { .. } => StatusCode::CONFLICT,
            Self::UserNotFound { .. } | Self::PostNotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::InvalidPermission { .. } => StatusCode::FORBIDDEN,
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::AlarmStore(_) | Self::Hash(_) | Self::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_mappings() {
        let error = ApiError::DuplicateUsername {
            username: "alice".to_string(),
        };
        assert_eq!(error.status_code(), StatusCode::CONFLICT);

        let error = ApiError::AlreadyLiked {
            user_id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
        };
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_not_found_mappings() {
        let error = ApiError::PostNotFound {
            post_id: Uuid::new_v4(),
        };
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_auth_mappings() {
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);

        let error = ApiError::InvalidPermission {
            user_id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
        };
        assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_persistence_failure_is_internal() {
        let error = ApiError::from(AlarmStoreError::Unavailable("down".to_string()));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_credentials_error_does_not_leak_username() {
        let message = ApiError::InvalidCredentials.to_string();
        assert_eq!(message, "invalid username or password");
    }
}
