/*
 * Responsibility
 * - /auth/ 配下の handler (register / login / user / logout / GitHub redirect)
 * - すべて gate の exempt path 上にあるため、token の検証はここで行う
 * - provider の status/body は基本そのまま転送する
 */
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    api::dto::auth::{AuthForm, MessageResponse, UserEmailResponse},
    error::AppError,
    middleware::auth::bearer,
    services::identity::IdentityResolver,
    state::AppState,
};

/// Frontend base URL the provider redirects back to after email confirmation or OAuth.
fn base_host_url(headers: &HeaderMap) -> String {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    };

    let host = header_str("x-forwarded-host")
        .or_else(|| header_str(header::HOST.as_str()))
        .unwrap_or("localhost");
    let scheme = header_str("x-forwarded-proto").unwrap_or("http");

    tracing::debug!(host, scheme, "base host url");
    format!("{}://{}/", scheme, host)
}

pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<AuthForm>,
) -> Result<Response, AppError> {
    let redirect_to = base_host_url(&headers);
    let res = state
        .identity
        .signup(&form.email, &form.password, &redirect_to)
        .await?;

    if res.has_id() {
        Ok(Json(MessageResponse {
            message: "Registration successful. Please check your email for confirmation.",
        })
        .into_response())
    } else {
        tracing::info!(status = res.status.as_u16(), "signup rejected by provider");
        Ok((StatusCode::BAD_REQUEST, Json(res.body)).into_response())
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<AuthForm>,
) -> Result<Response, AppError> {
    let res = state
        .identity
        .login_with_password(&form.email, &form.password)
        .await?;
    Ok((res.status, Json(res.body)).into_response())
}

pub async fn current_user(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let credential = match bearer::extract_from_headers(&headers) {
        Ok(credential) => credential,
        Err(err) => {
            tracing::warn!(error = %err, "user lookup without bearer credential");
            return (
                StatusCode::UNAUTHORIZED,
                Json(UserEmailResponse { email: None }),
            )
                .into_response();
        }
    };

    match state.identity.resolve(&credential).await {
        Ok(identity) => Json(UserEmailResponse {
            email: identity.email,
        })
        .into_response(),
        Err(err) => {
            tracing::warn!(status = err.status.as_u16(), error = %err.message, "user lookup failed");
            (err.status, Json(UserEmailResponse { email: None })).into_response()
        }
    }
}

/// Always succeeds from the client's point of view; the local session is gone either way.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<MessageResponse> {
    if let Ok(credential) = bearer::extract_from_headers(&headers) {
        match state.identity.logout(credential.as_str()).await {
            Ok(res) if !res.status.is_success() => {
                tracing::info!(status = res.status.as_u16(), "provider logout not accepted");
            }
            Ok(_) => {}
            Err(err) => tracing::warn!(error = %err, "provider logout failed"),
        }
    }

    Json(MessageResponse {
        message: "Logout successful.",
    })
}

pub async fn github_redirect(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let redirect_to = base_host_url(&headers);
    let url = state.identity.github_signin_url(&redirect_to)?;
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}
