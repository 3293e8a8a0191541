/**
 * Join Handler
 *
 * User registration for POST /api/v1/users/join.
 *
 * # Process
 *
 * 1. Reject a username that is already taken (409)
 * 2. Hash the password with bcrypt
 * 3. Insert the user row
 */
use axum::{extract::State, response::Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::auth::handlers::types::{JoinRequest, JoinResponse};
use crate::auth::users::{create_user, get_user_by_username};
use crate::error::ApiError;

/// Handle user registration (POST /api/v1/users/join)
///
/// # Errors
///
/// * `409 Conflict` - username already taken
/// * `503 Service Unavailable` - database not configured
pub async fn join(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    tracing::info!("[Auth] Join request for username {}", request.username);

    if get_user_by_username(&pool, &request.username).await?.is_some() {
        return Err(ApiError::DuplicateUsername {
            username: request.username,
        });
    }

    let password_hash = hash(&request.password, DEFAULT_COST)?;
    let user = create_user(&pool, request.username, password_hash).await?;

    tracing::info!("[Auth] User {} joined as {}", user.id, user.username);

    Ok(Json(JoinResponse {
        id: user.id,
        username: user.username,
    }))
}
