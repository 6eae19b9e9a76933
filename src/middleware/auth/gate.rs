//! Request authorization gate.
//!
//! Every inbound request passes through here before any handler:
//!
//! 1. exempt path → pass through, no identity bound
//! 2. extract the bearer credential (no I/O)
//! 3. resolve it with the identity provider (one round trip, no retry)
//! 4. bind `AuthCtx` into request extensions, or answer 401
//!
//! The response to any denial is the same generic 401 so callers cannot tell
//! a malformed header from an expired token or a provider outage. The
//! distinguishing detail goes to the log only.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::{self, Next},
    response::Response,
};

use super::bearer::{self, ExtractionError};
use super::paths::ExemptPaths;
use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::identity::{IdentityResolver, ResolutionError, ResolvedIdentity};

#[derive(Debug)]
pub enum DenyReason {
    Extraction(ExtractionError),
    Resolution(ResolutionError),
}

/// Outcome of the gate for one request. Computed once, never stored.
#[derive(Debug)]
pub enum AuthDecision {
    Exempt,
    Authorized(ResolvedIdentity),
    Denied(DenyReason),
}

/// Immutable gate configuration, cheap to clone into each request.
#[derive(Clone)]
pub struct AuthGate {
    exempt: Arc<ExemptPaths>,
    resolver: Arc<dyn IdentityResolver>,
}

impl AuthGate {
    pub fn new(exempt: ExemptPaths, resolver: Arc<dyn IdentityResolver>) -> Self {
        Self {
            exempt: Arc::new(exempt),
            resolver,
        }
    }

    pub async fn decide(&self, path: &str, authorization: Option<&HeaderValue>) -> AuthDecision {
        if self.exempt.is_exempt(path) {
            return AuthDecision::Exempt;
        }

        let credential = match bearer::extract(authorization) {
            Ok(credential) => credential,
            Err(err) => return AuthDecision::Denied(DenyReason::Extraction(err)),
        };

        match self.resolver.resolve(&credential).await {
            Ok(identity) => AuthDecision::Authorized(identity),
            Err(err) => AuthDecision::Denied(DenyReason::Resolution(err)),
        }
    }
}

/// Put the gate in front of every route of `router` (fallback included).
pub fn apply<S>(router: Router<S>, gate: AuthGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(gate, gate_middleware))
}

async fn gate_middleware(
    State(gate): State<AuthGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Owned copies: the request must not be borrowed across the resolver await.
    let path = req.uri().path().to_owned();
    let authorization = req.headers().get(header::AUTHORIZATION).cloned();

    match gate.decide(&path, authorization.as_ref()).await {
        AuthDecision::Exempt => Ok(next.run(req).await),
        AuthDecision::Authorized(identity) => {
            tracing::debug!(path = %path, user_id = %identity.user_id, "request authorized");
            req.extensions_mut().insert(AuthCtx::from(identity));
            Ok(next.run(req).await)
        }
        AuthDecision::Denied(reason) => {
            log_denial(&path, &reason);
            Err(AppError::Unauthorized)
        }
    }
}

fn log_denial(path: &str, reason: &DenyReason) {
    match reason {
        DenyReason::Extraction(err) => {
            tracing::warn!(path = %path, error = %err, "authorization header rejected");
        }
        DenyReason::Resolution(err) if err.is_unreachable() => {
            tracing::error!(
                path = %path,
                status = err.status.as_u16(),
                error = %err.message,
                "identity provider unreachable"
            );
        }
        DenyReason::Resolution(err) => {
            tracing::warn!(
                path = %path,
                status = err.status.as_u16(),
                error = %err.message,
                "credential rejected by identity provider"
            );
        }
    }
}
