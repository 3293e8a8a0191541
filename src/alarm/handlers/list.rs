/**
 * Alarm List Handler
 *
 * Paginated read over the durable alarm log for the authenticated user.
 * This is the recovery path for anything a client missed while offline:
 * the push stream is best-effort, the list is authoritative.
 */
use axum::{
    extract::{Query, State},
    response::Json,
};

use crate::alarm::model::AlarmRecord;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::pagination::PageParams;
use crate::server::state::AppState;

/// Handle alarm list (GET /api/v1/users/alarm)
///
/// Returns the caller's alarms newest first.
pub async fn handle_alarm_list(
    State(app_state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<AlarmRecord>>, ApiError> {
    let alarms = app_state
        .alarm_store
        .list_by_recipient(user.user_id, params.page, params.per_page_clamped())
        .await?;

    tracing::debug!(
        "[Alarm] Listed {} alarm(s) for user {} (page {})",
        alarms.len(),
        user.user_id,
        params.page
    );

    Ok(Json(alarms))
}
