/**
 * Error Conversion
 *
 * `IntoResponse` for `ApiError`, so handlers can return it directly. Error
 * responses are JSON:
 *
 * ```json
 * {
 *   "error": "post 7f0c... not found",
 *   "status": 404
 * }
 * ```
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("[Server] Internal error: {:?}", self);
        }

        let body = Json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_response_status_matches_error() {
        let error = ApiError::PostNotFound {
            post_id: Uuid::new_v4(),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_response() {
        let error = ApiError::DatabaseUnavailable;
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
