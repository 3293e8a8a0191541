/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Public user routes (join, login)
 * 2. Protected routes (alarms, posts) behind the auth middleware
 * 3. Fallback handler (404)
 */
use axum::{http::StatusCode, middleware, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::auth::auth_middleware;
use crate::routes::api_routes::{configure_alarm_routes, configure_post_routes, configure_user_routes};
use crate::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Route Details
///
/// ## User Routes (public)
///
/// - `POST /api/v1/users/join` - User registration
/// - `POST /api/v1/users/login` - User login
///
/// ## Alarm Routes (authenticated)
///
/// - `GET /api/v1/users/alarm` - Paginated alarm list
/// - `GET /api/v1/users/alarm/subscribe` - SSE alarm subscription
///
/// ## Post Routes (authenticated)
///
/// - `GET|POST /api/v1/posts`, `GET /api/v1/posts/my`
/// - `PUT|DELETE /api/v1/posts/{post_id}`
/// - `GET|POST /api/v1/posts/{post_id}/likes`
/// - `GET|POST /api/v1/posts/{post_id}/comments`
pub fn create_router(app_state: AppState) -> Router<()> {
    let protected = configure_alarm_routes()
        .merge(configure_post_routes())
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    let router = configure_user_routes()
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .fallback(|| async { (StatusCode::NOT_FOUND, "404 Not Found") });

    router.with_state(app_state)
}
