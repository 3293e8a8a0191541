/**
 * Database Operations for Posts, Comments, and Likes
 *
 * This module provides the persistence layer for the posting domain. All
 * three tables are soft-deleted; queries filter on `deleted_at IS NULL`.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Post record as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    /// Author of the post — the recipient of like/comment alarms on it
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Comment record as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Create a new post
pub async fn create_post(
    pool: &PgPool,
    user_id: Uuid,
    title: String,
    body: String,
) -> Result<Post, sqlx::Error> {
    let now = Utc::now();

    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, user_id, title, body, created_at, updated_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, $4)
        RETURNING id, user_id, title, body, created_at, updated_at, deleted_at
        "#,
    )
    .bind(user_id)
    .bind(&title)
    .bind(&body)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Get a live post by ID
pub async fn get_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, user_id, title, body, created_at, updated_at, deleted_at
        FROM posts
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// List live posts, newest first
pub async fn list_posts(pool: &PgPool, page: u32, per_page: u32) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, user_id, title, body, created_at, updated_at, deleted_at
        FROM posts
        WHERE deleted_at IS NULL
        ORDER BY created_at DESC, id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(i64::from(per_page))
    .bind(i64::from(page) * i64::from(per_page))
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// List one author's live posts, newest first
pub async fn list_posts_by_user(
    pool: &PgPool,
    user_id: Uuid,
    page: u32,
    per_page: u32,
) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, user_id, title, body, created_at, updated_at, deleted_at
        FROM posts
        WHERE user_id = $1 AND deleted_at IS NULL
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(i64::from(per_page))
    .bind(i64::from(page) * i64::from(per_page))
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Update a post's title and body
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    title: String,
    body: String,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET title = $1, body = $2, updated_at = $3
        WHERE id = $4 AND deleted_at IS NULL
        RETURNING id, user_id, title, body, created_at, updated_at, deleted_at
        "#,
    )
    .bind(&title)
    .bind(&body)
    .bind(Utc::now())
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Soft-delete a post together with its comments and likes
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE comments SET deleted_at = $1 WHERE post_id = $2 AND deleted_at IS NULL")
        .bind(now)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE likes SET deleted_at = $1 WHERE post_id = $2 AND deleted_at IS NULL")
        .bind(now)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE posts SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL")
        .bind(now)
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Create a new comment on a post
pub async fn create_comment(
    pool: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
    comment: String,
) -> Result<Comment, sqlx::Error> {
    let now = Utc::now();

    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, user_id, post_id, comment, created_at, updated_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, $4)
        RETURNING id, user_id, post_id, comment, created_at, updated_at, deleted_at
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .bind(&comment)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// List a post's live comments, newest first
pub async fn list_comments(
    pool: &PgPool,
    post_id: Uuid,
    page: u32,
    per_page: u32,
) -> Result<Vec<Comment>, sqlx::Error> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, user_id, post_id, comment, created_at, updated_at, deleted_at
        FROM comments
        WHERE post_id = $1 AND deleted_at IS NULL
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(post_id)
    .bind(i64::from(per_page))
    .bind(i64::from(page) * i64::from(per_page))
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Check whether a user already has a live like on a post
pub async fn like_exists(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT id FROM likes
        WHERE user_id = $1 AND post_id = $2 AND deleted_at IS NULL
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// Create a new like on a post
pub async fn create_like(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<(), sqlx::Error> {
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO likes (id, user_id, post_id, created_at, updated_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $3)
        "#,
    )
    .bind(user_id)
    .bind(post_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Count a post's live likes
pub async fn count_likes(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM likes
        WHERE post_id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
