pub mod error;
pub mod memo_repo;
