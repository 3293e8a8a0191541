/**
 * Post CRUD Handlers
 *
 * Create, list, modify, and delete posts. Mutations require ownership:
 * only the author can modify or delete a post.
 */
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::pagination::PageParams;
use crate::post::db;
use crate::post::handlers::types::{PostCreateRequest, PostModifyRequest, PostResponse};
use crate::server::state::AppState;

/// Handle post creation (POST /api/v1/posts)
pub async fn handle_post_create(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<PostCreateRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let pool = app_state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let post = db::create_post(pool, user.user_id, request.title, request.body).await?;

    tracing::info!("[Post] Post {} created by user {}", post.id, user.user_id);

    Ok(Json(post.into()))
}

/// Handle post feed (GET /api/v1/posts)
pub async fn handle_post_list(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let pool = app_state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let posts = db::list_posts(pool, params.page, params.per_page_clamped()).await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Handle the caller's own posts (GET /api/v1/posts/my)
pub async fn handle_my_posts(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    let pool = app_state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let posts =
        db::list_posts_by_user(pool, user.user_id, params.page, params.per_page_clamped()).await?;

    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

/// Handle post modification (PUT /api/v1/posts/{post_id})
///
/// # Errors
///
/// * `404 Not Found` - post does not exist
/// * `403 Forbidden` - caller is not the author
pub async fn handle_post_modify(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<Uuid>,
    Json(request): Json<PostModifyRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    let pool = app_state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let post = db::get_post_by_id(pool, post_id)
        .await?
        .ok_or(ApiError::PostNotFound { post_id })?;

    if post.user_id != user.user_id {
        return Err(ApiError::InvalidPermission {
            user_id: user.user_id,
            post_id,
        });
    }

    let updated = db::update_post(pool, post_id, request.title, request.body).await?;

    Ok(Json(updated.into()))
}

/// Handle post deletion (DELETE /api/v1/posts/{post_id})
///
/// Soft-deletes the post along with its comments and likes.
pub async fn handle_post_delete(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let pool = app_state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let post = db::get_post_by_id(pool, post_id)
        .await?
        .ok_or(ApiError::PostNotFound { post_id })?;

    if post.user_id != user.user_id {
        return Err(ApiError::InvalidPermission {
            user_id: user.user_id,
            post_id,
        });
    }

    db::delete_post(pool, post_id).await?;

    tracing::info!("[Post] Post {} deleted by user {}", post_id, user.user_id);

    Ok(Json(serde_json::json!({})))
}
