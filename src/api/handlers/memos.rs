/*
 * Responsibility
 * - /memos 系 CRUD handler
 * - user_id は AuthCtx (gate が解決したもの) からのみ取得する
 * - Path の {id} は公開 ID → extractor で内部 ID に変換して受け取る
 */
use axum::{Json, extract::State};

use crate::{
    api::{
        dto::memos::{DeletedMemoResponse, MemoRequest, MemoResponse},
        extractors::{AuthCtxExtractor, public_id::PublicMemoId},
    },
    error::AppError,
    repos::memo_repo,
    services::id_codec::IdCodec,
    state::AppState,
};

fn row_to_response(codec: &IdCodec, row: memo_repo::MemoRow) -> Result<MemoResponse, AppError> {
    Ok(MemoResponse {
        id: codec.encode(row.id)?,
        user_id: row.user_id,
        title: row.title,
        content: row.content,
        created_at: row.created_at,
    })
}

pub async fn list_memos(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<Vec<MemoResponse>>, AppError> {
    let rows = memo_repo::list(&state.db, &auth.user_id).await?;

    let res = rows
        .into_iter()
        .map(|row| row_to_response(&state.id_codec, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(res))
}

pub async fn create_memo(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Json(req): Json<MemoRequest>,
) -> Result<Json<MemoResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let row = memo_repo::create(&state.db, &auth.user_id, &req.title, &req.content).await?;
    tracing::info!(user_id = %auth.user_id, memo_id = row.id, "memo created");

    Ok(Json(row_to_response(&state.id_codec, row)?))
}

pub async fn update_memo(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    memo_id: PublicMemoId,
    Json(req): Json<MemoRequest>,
) -> Result<Json<MemoResponse>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let row = memo_repo::update(
        &state.db,
        memo_id.id,
        &auth.user_id,
        &req.title,
        &req.content,
    )
    .await?
    .ok_or(AppError::not_found("Memo"))?;

    Ok(Json(row_to_response(&state.id_codec, row)?))
}

pub async fn delete_memo(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    memo_id: PublicMemoId,
) -> Result<Json<DeletedMemoResponse>, AppError> {
    let deleted = memo_repo::delete(&state.db, memo_id.id, &auth.user_id).await?;
    if !deleted {
        return Err(AppError::not_found("Memo"));
    }

    tracing::info!(user_id = %auth.user_id, memo_id = memo_id.id, "memo deleted");
    Ok(Json(DeletedMemoResponse {
        id: state.id_codec.encode(memo_id.id)?,
    }))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn response_exposes_public_id_only() {
        let codec = IdCodec::new(10, "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789")
            .unwrap();
        let row = memo_repo::MemoRow {
            id: 7,
            user_id: "u1".to_string(),
            title: "t".to_string(),
            content: "c".to_string(),
            created_at: Utc::now(),
        };

        let res = row_to_response(&codec, row).unwrap();

        assert_ne!(res.id, "7");
        assert_eq!(codec.decode(&res.id).unwrap(), 7);
        assert_eq!(res.user_id, "u1");
    }
}
