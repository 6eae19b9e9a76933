/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - 「見つからない / 他人の memo」は Option::None で返し、ここには含めない
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
}
