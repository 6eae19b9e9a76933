/*
 * Responsibility
 * - /api の URL 構造を定義 (app.rs で "/api" に nest される)
 * - 認証の要否はここでは決めない: middleware::auth の ExemptPaths が判定する
 *   (/api/auth/ 配下は exempt, /api/memos は gate 通過後のみ到達)
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use crate::api::handlers::{
    auth::{current_user, github_redirect, login, logout, register},
    memos::{create_memo, delete_memo, list_memos, update_memo},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/user", get(current_user))
        .route("/auth/logout", post(logout))
        .route("/auth/oauth2/github", get(github_redirect))
        .route("/memos", get(list_memos).post(create_memo))
        .route("/memos/{id}", put(update_memo).delete(delete_memo))
}
