/*
 * Responsibility
 * - 認証 gate の公開インターフェース
 * - paths: 認証不要パス判定 / bearer: credential 抽出 / gate: orchestration + middleware
 */
pub mod bearer;
pub mod gate;
pub mod paths;

pub use gate::{AuthGate, apply};
pub use paths::ExemptPaths;
