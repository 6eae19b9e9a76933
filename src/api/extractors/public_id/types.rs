/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *
 * 置かないもの
 *  - decode ロジック / extractor 実装 (core.rs)
 */
use super::core::PublicId;

// memos
pub enum MemoTag {}
pub type PublicMemoId = PublicId<MemoTag>;
