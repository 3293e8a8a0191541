/**
 * Login Handler
 *
 * User authentication for POST /api/v1/users/login.
 *
 * # Security
 *
 * - Passwords are verified with bcrypt
 * - Unknown usernames and wrong passwords return the same 401, so the
 *   endpoint does not reveal which usernames exist
 * - Tokens expire after 30 days
 */
use axum::{extract::State, response::Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::auth::sessions::create_token;
use crate::auth::users::get_user_by_username;
use crate::error::ApiError;

/// Handle user authentication (POST /api/v1/users/login)
///
/// # Errors
///
/// * `401 Unauthorized` - unknown username or wrong password
/// * `503 Service Unavailable` - database not configured
pub async fn login(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    tracing::info!("[Auth] Login request for username {}", request.username);

    let user = get_user_by_username(&pool, &request.username)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = verify(&request.password, &user.password_hash)?;
    if !valid {
        tracing::warn!("[Auth] Invalid password for username {}", request.username);
        return Err(ApiError::InvalidCredentials);
    }

    let token = create_token(user.id, user.username.clone())?;

    tracing::info!("[Auth] User {} logged in", user.username);

    Ok(Json(LoginResponse { token }))
}
