/**
 * Comment Handlers
 *
 * Commenting is the second alarm producer: after the comment row lands,
 * the handler dispatches a NEW_COMMENT_ON_POST alarm to the post's author
 * and waits for its durable append, never for any push.
 */
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use uuid::Uuid;

use crate::alarm::model::{AlarmArgs, AlarmType};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::pagination::PageParams;
use crate::post::db;
use crate::post::handlers::types::{CommentCreateRequest, CommentResponse};
use crate::server::state::AppState;

/// Handle commenting on a post (POST /api/v1/posts/{post_id}/comments)
///
/// # Errors
///
/// * `404 Not Found` - post does not exist
/// * `500 Internal Server Error` - comment landed but the alarm could not
///   be persisted
pub async fn handle_post_comment(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<Uuid>,
    Json(request): Json<CommentCreateRequest>,
) -> Result<Json<CommentResponse>, ApiError> {
    let pool = app_state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let post = db::get_post_by_id(pool, post_id)
        .await?
        .ok_or(ApiError::PostNotFound { post_id })?;

    let comment = db::create_comment(pool, user.user_id, post_id, request.comment).await?;

    let alarm_id = app_state
        .alarm_dispatcher
        .dispatch(
            post.user_id,
            AlarmType::NewCommentOnPost,
            AlarmArgs {
                actor_id: user.user_id,
                post_id,
            },
        )
        .await?;

    tracing::info!(
        "[Post] User {} commented on post {}, alarm {} raised for author {}",
        user.user_id,
        post_id,
        alarm_id,
        post.user_id
    );

    Ok(Json(comment.into()))
}

/// Handle comment listing (GET /api/v1/posts/{post_id}/comments)
pub async fn handle_comment_list(
    State(app_state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let pool = app_state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    db::get_post_by_id(pool, post_id)
        .await?
        .ok_or(ApiError::PostNotFound { post_id })?;

    let comments =
        db::list_comments(pool, post_id, params.page, params.per_page_clamped()).await?;

    Ok(Json(comments.into_iter().map(CommentResponse::from).collect()))
}
