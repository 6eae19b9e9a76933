//! CORS policy for the browser frontend.
//!
//! Responsibility:
//! - Answer preflight requests before they reach the auth gate
//!   (apply this layer outside `middleware::auth`).
//!
//! Policy:
//! - Allowlist configured (`CORS_ALLOWED_ORIGINS`): exact-match origins, WITH credentials.
//! - Production without allowlist: no origin is allowed.
//! - Development without allowlist: permissive (Allow-Origin: *), WITHOUT credentials.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

/// Apply CORS policy to the given Router.
///
/// Never combine a wildcard origin with `allow_credentials(true)`; tower-http
/// panics on that combination.
pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config))
}

fn layer(config: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(60 * 10));

    if !config.cors_allowed_origins.is_empty() {
        // Predicate instead of `AllowOrigin::list`: a stray "*" entry must not panic at startup.
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter(|s| s.as_str() != "*")
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        base.allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            allowed.contains(origin)
        }))
        .allow_credentials(true)
    } else if config.app_env.is_production() {
        base.allow_origin(AllowOrigin::predicate(|_: &HeaderValue, _| false))
    } else {
        base.allow_origin(Any)
    }
}
