/**
 * API Route Configuration
 *
 * Sub-routers per domain, assembled by `routes::router`. The user routes
 * are public; everything else is mounted behind the auth middleware by
 * the assembler.
 */
use axum::{
    routing::{get, post, put},
    Router,
};

use crate::alarm::handlers::{handle_alarm_list, handle_alarm_subscription};
use crate::auth::handlers::{join, login};
use crate::post::handlers::{
    handle_comment_list, handle_like_count, handle_my_posts, handle_post_comment,
    handle_post_create, handle_post_delete, handle_post_like, handle_post_list,
    handle_post_modify,
};
use crate::server::state::AppState;

/// Public user routes: registration and login
pub fn configure_user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users/join", post(join))
        .route("/api/v1/users/login", post(login))
}

/// Alarm routes: the durable list and the SSE push subscription
pub fn configure_alarm_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users/alarm", get(handle_alarm_list))
        .route(
            "/api/v1/users/alarm/subscribe",
            get(handle_alarm_subscription),
        )
}

/// Post routes: CRUD plus the like/comment producers
pub fn configure_post_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/posts",
            post(handle_post_create).get(handle_post_list),
        )
        .route("/api/v1/posts/my", get(handle_my_posts))
        .route(
            "/api/v1/posts/{post_id}",
            put(handle_post_modify).delete(handle_post_delete),
        )
        .route(
            "/api/v1/posts/{post_id}/likes",
            post(handle_post_like).get(handle_like_count),
        )
        .route(
            "/api/v1/posts/{post_id}/comments",
            post(handle_post_comment).get(handle_comment_list),
        )
}
