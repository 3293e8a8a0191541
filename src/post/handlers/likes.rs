/**
 * Like Handlers
 *
 * Liking a post is an alarm producer: after the like row lands, the
 * handler dispatches a NEW_LIKE_ON_POST alarm to the post's author and
 * waits for its durable append (the alarm is part of the business
 * operation). It does not wait for any push — delivery to open
 * connections happens behind the dispatcher.
 */
use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::alarm::model::{AlarmArgs, AlarmType};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::post::db;
use crate::post::handlers::types::LikeCountResponse;
use crate::server::state::AppState;

/// Handle liking a post (POST /api/v1/posts/{post_id}/likes)
///
/// # Errors
///
/// * `404 Not Found` - post does not exist
/// * `409 Conflict` - caller already liked this post
/// * `500 Internal Server Error` - like landed but the alarm could not be
///   persisted; the caller should treat the operation as failed
pub async fn handle_post_like(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = app_state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let post = db::get_post_by_id(pool, post_id)
        .await?
        .ok_or(ApiError::PostNotFound { post_id })?;

    if db::like_exists(pool, user.user_id, post_id).await? {
        return Err(ApiError::AlreadyLiked {
            user_id: user.user_id,
            post_id,
        });
    }

    db::create_like(pool, user.user_id, post_id).await?;

    let alarm_id = app_state
        .alarm_dispatcher
        .dispatch(
            post.user_id,
            AlarmType::NewLikeOnPost,
            AlarmArgs {
                actor_id: user.user_id,
                post_id,
            },
        )
        .await?;

    tracing::info!(
        "[Post] User {} liked post {}, alarm {} raised for author {}",
        user.user_id,
        post_id,
        alarm_id,
        post.user_id
    );

    Ok(Json(serde_json::json!({})))
}

/// Handle like count (GET /api/v1/posts/{post_id}/likes)
pub async fn handle_like_count(
    State(app_state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<LikeCountResponse>, ApiError> {
    let pool = app_state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    db::get_post_by_id(pool, post_id)
        .await?
        .ok_or(ApiError::PostNotFound { post_id })?;

    let count = db::count_likes(pool, post_id).await?;

    Ok(Json(LikeCountResponse { count }))
}
