/**
 * Auth Request/Response Types
 *
 * DTOs for the join and login endpoints. Password hashes never appear in
 * any response type.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for POST /api/v1/users/join
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub username: String,
    pub password: String,
}

/// Response body for a successful join
#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub id: Uuid,
    pub username: String,
}

/// Request body for POST /api/v1/users/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}
