/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - auth gate が identity provider で解決した結果を request extensions に格納し、
 *   handler はこの型だけを受け取る
 *
 * Notes
 * - request ごとに生成され、request 終了と共に破棄される (cache/永続化しない)
 */
use crate::services::identity::ResolvedIdentity;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は identity provider のユーザーID (memos.user_id と突き合わせる)
/// - `email` は provider が返した場合のみ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: String,
    pub email: Option<String>,
}

impl From<ResolvedIdentity> for AuthCtx {
    fn from(identity: ResolvedIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
        }
    }
}
