/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, id_codec: IdCodec, identity: SupabaseAuthClient
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - auth gate は AppState を持たず、identity の Arc だけを共有する
 */
use std::sync::Arc;

use crate::services::{id_codec::IdCodec, identity::SupabaseAuthClient};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub id_codec: IdCodec,
    pub identity: Arc<SupabaseAuthClient>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, id_codec: IdCodec, identity: Arc<SupabaseAuthClient>) -> Self {
        Self {
            db,
            id_codec,
            identity,
        }
    }
}
