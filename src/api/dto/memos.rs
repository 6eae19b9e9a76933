/*
 * Responsibility
 * - Memos の request/response DTO
 * - 公開 ID は encode 済みの値を返す (内部 ID を漏らさない)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_CHARS: usize = 200;

/// Body of both create and update (PUT replaces title and content).
/// Missing fields are stored as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MemoRequest {
    pub title: String,
    pub content: String,
}

impl MemoRequest {
    /// Only the title length is bounded; empty titles and contents are valid memos.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.chars().count() > TITLE_MAX_CHARS {
            return Err("title must be <= 200 chars");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct MemoResponse {
    pub id: String, // encoded
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DeletedMemoResponse {
    pub id: String, // encoded
}
