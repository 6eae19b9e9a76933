/*
 * Responsibility
 * - /api/auth/ 配下の request/response DTO
 * - provider の応答 body は serde_json::Value のまま転送するため、ここには置かない
 */
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UserEmailResponse {
    pub email: Option<String>,
}
