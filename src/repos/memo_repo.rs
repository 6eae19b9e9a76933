/*
 * Responsibility
 * - memos テーブル向け SQLx 操作
 * - 全クエリを user_id で絞る (row-level ownership)
 *   他人の memo は「存在しない」と同じ扱い (None / false)
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct MemoRow {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

pub async fn list(db: &PgPool, user_id: &str) -> Result<Vec<MemoRow>, RepoError> {
    let rows = sqlx::query_as::<_, MemoRow>(
        r#"
        SELECT id, user_id, title, content, created_at
        FROM memos
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(
    db: &PgPool,
    user_id: &str,
    title: &str,
    content: &str,
) -> Result<MemoRow, RepoError> {
    let row = sqlx::query_as::<_, MemoRow>(
        r#"
        INSERT INTO memos (user_id, title, content)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, title, content, created_at
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(content)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn update(
    db: &PgPool,
    memo_id: i64,
    user_id: &str,
    title: &str,
    content: &str,
) -> Result<Option<MemoRow>, RepoError> {
    let row = sqlx::query_as::<_, MemoRow>(
        r#"
        UPDATE memos
        SET title = $3, content = $4
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, title, content, created_at
        "#,
    )
    .bind(memo_id)
    .bind(user_id)
    .bind(title)
    .bind(content)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn delete(db: &PgPool, memo_id: i64, user_id: &str) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM memos
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(memo_id)
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
