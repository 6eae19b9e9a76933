//! Identity resolution contract.
//!
//! The gate only depends on this trait; the concrete provider adapter lives in
//! `supabase.rs` and tests substitute their own fakes.
use std::fmt;

use async_trait::async_trait;
use axum::http::StatusCode;
use thiserror::Error;

/// Opaque bearer token presented by the caller.
///
/// Never printed: `Debug` redacts the value so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

/// The authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionErrorKind {
    /// Provider answered but did not accept the credential.
    Rejected,
    /// Provider could not be reached (transport-level failure).
    Unreachable,
}

#[derive(Debug, Clone, Error)]
#[error("identity resolution failed ({kind:?}, status {status}): {message}")]
pub struct ResolutionError {
    pub kind: ResolutionErrorKind,
    /// Status the auth endpoints forward to clients. The gate ignores it.
    pub status: StatusCode,
    pub message: String,
}

impl ResolutionError {
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            kind: ResolutionErrorKind::Rejected,
            status,
            message: message.into(),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            kind: ResolutionErrorKind::Unreachable,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn is_unreachable(&self) -> bool {
        self.kind == ResolutionErrorKind::Unreachable
    }
}

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a credential with exactly one round trip. No retries, no caching.
    async fn resolve(&self, credential: &Credential) -> Result<ResolvedIdentity, ResolutionError>;
}
