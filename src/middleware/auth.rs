/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require a
 * logged-in user. It extracts and verifies the JWT from the Authorization
 * header and attaches the authenticated identity to the request. Identity
 * from a verified token is trusted by everything downstream — the alarm
 * subsystem never re-validates it.
 */
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::auth::users::get_user_by_id;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Authenticated user data extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
}

/// Authentication middleware
///
/// 1. Extracts the bearer token from the Authorization header
/// 2. Verifies the token and parses the user id from its claims
/// 3. Confirms the account still exists (when a database is configured)
/// 4. Attaches [`AuthenticatedUser`] to request extensions
///
/// Returns 401 if any step fails.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("[Auth] Missing Authorization header");
            ApiError::InvalidToken
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("[Auth] Invalid Authorization header format");
        ApiError::InvalidToken
    })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::warn!("[Auth] Invalid token: {:?}", e);
        ApiError::InvalidToken
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("[Auth] Invalid user id in token: {:?}", e);
        ApiError::InvalidToken
    })?;

    // A deleted account's tokens stop working immediately.
    if let Some(pool) = &app_state.db_pool {
        if let Err(e) = verify_user_exists(pool, user_id).await {
            tracing::warn!("[Auth] User {} not found: {:?}", user_id, e);
            return Err(ApiError::InvalidToken);
        }
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

/// Verify user exists in database
async fn verify_user_exists(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    get_user_by_id(pool, user_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    Ok(())
}

/// Axum extractor for the authenticated user
///
/// Usable as a handler parameter on any route behind `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("[Auth] AuthenticatedUser not found in request extensions");
                ApiError::InvalidToken
            })?;

        Ok(AuthUser(user))
    }
}
