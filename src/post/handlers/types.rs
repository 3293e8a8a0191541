/**
 * Post Request/Response Types
 *
 * DTOs for the posting endpoints. Responses omit the soft-delete marker —
 * deleted rows never reach a handler in the first place.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::post::db::{Comment, Post};

/// Request body for POST /api/v1/posts
#[derive(Debug, Deserialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub body: String,
}

/// Request body for PUT /api/v1/posts/{post_id}
#[derive(Debug, Deserialize)]
pub struct PostModifyRequest {
    pub title: String,
    pub body: String,
}

/// Post as returned by the API
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            body: post.body,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Request body for POST /api/v1/posts/{post_id}/comments
#[derive(Debug, Deserialize)]
pub struct CommentCreateRequest {
    pub comment: String,
}

/// Comment as returned by the API
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id,
            post_id: comment.post_id,
            comment: comment.comment,
            created_at: comment.created_at,
        }
    }
}

/// Response body for GET /api/v1/posts/{post_id}/likes
#[derive(Debug, Serialize)]
pub struct LikeCountResponse {
    pub count: i64,
}
