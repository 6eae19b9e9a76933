/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / `{"error": "..."}` body)
 * - RepoError / IdCodecError / ProviderError を統一的に変換
 *
 * Unauthorized は理由を区別しない (token 不正 / 期限切れ / provider 障害を外に漏らさない)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::id_codec::IdCodecError;
use crate::services::identity::ProviderError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<IdCodecError> for AppError {
    fn from(e: IdCodecError) -> Self {
        match e {
            // Client supplied a malformed public id (e.g. /memos/{id})
            IdCodecError::DecodeInvalidFormat | IdCodecError::DecodeOutOfRange => {
                AppError::bad_request("Invalid memo id")
            }
            // Server-side config / programming errors
            other => {
                tracing::error!(error = %other, "id codec error");
                AppError::Internal
            }
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        tracing::error!(error = %e, "identity provider call failed");
        AppError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, String) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn unauthorized_body_is_generic() {
        let (status, body) = body_of(AppError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"error":"Unauthorized"}"#);
    }

    #[tokio::test]
    async fn not_found_names_the_resource() {
        let (status, body) = body_of(AppError::not_found("Memo")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, r#"{"error":"Memo not found"}"#);
    }

    #[test]
    fn malformed_public_id_is_a_client_error() {
        let err = AppError::from(IdCodecError::DecodeInvalidFormat);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = AppError::from(IdCodecError::NegativeId { value: -1 });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
