/*
 * Responsibility
 * - tracing / panic hook 初期化
 * - Config読み込み → 依存生成 (PgPool, migration, IdCodec, identity client)
 * - Router 組み立てと middleware の適用順
 *     http (request id / trace / limits) > security headers > CORS > auth gate > routes/static
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware::{
        self,
        auth::{AuthGate, ExemptPaths},
    },
    services::{id_codec::IdCodec, identity::SupabaseAuthClient},
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,memo_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting memo API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    tracing::info!("database connected");

    sqlx::migrate!()
        .run(&db)
        .await
        .context("failed to run migrations")?;

    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet)?;

    let identity = SupabaseAuthClient::new(
        &config.supabase_url,
        config.supabase_anon_key.clone(),
        Duration::from_secs(config.identity_timeout_seconds),
    )?;

    Ok(AppState::new(db, id_codec, Arc::new(identity)))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let gate = AuthGate::new(ExemptPaths::default(), state.identity.clone());

    let router = Router::new()
        .nest("/api", api::routes())
        .fallback_service(ServeDir::new(&config.static_dir))
        .with_state(state);

    // Innermost first: the gate sees every request that survives the outer layers,
    // and CORS answers preflights before the gate can reject them.
    let router = middleware::auth::apply(router, gate);
    let router = middleware::cors::apply(router, config);
    let router = middleware::security_headers::apply(router);
    middleware::http::apply(router, config)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::AppEnv;

    fn config(origins: Vec<String>) -> Config {
        Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            app_env: AppEnv::Development,
            database_url: "postgres://localhost/memo_test".to_string(),
            database_max_connections: 1,
            supabase_url: "http://127.0.0.1:9".to_string(),
            supabase_anon_key: "anon-key".to_string(),
            identity_timeout_seconds: 1,
            cors_allowed_origins: origins,
            static_dir: PathBuf::from("./static-does-not-exist"),
            request_timeout_seconds: 5,
            body_limit_bytes: 1024,
            sqids_min_length: 10,
            sqids_alphabet: "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789"
                .to_string(),
        }
    }

    fn router(config: &Config) -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet).unwrap();
        let identity = SupabaseAuthClient::new(
            &config.supabase_url,
            config.supabase_anon_key.clone(),
            Duration::from_secs(1),
        )
        .unwrap();

        build_router(AppState::new(db, codec, Arc::new(identity)), config)
    }

    #[tokio::test]
    async fn memos_without_header_are_rejected_with_security_headers() {
        let config = config(Vec::new());
        let resp = router(&config)
            .oneshot(
                Request::builder()
                    .uri("/api/memos")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().contains_key("x-request-id"));
        assert_eq!(resp.headers()["x-content-type-options"], "nosniff");

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], br#"{"error":"Unauthorized"}"#);
    }

    #[tokio::test]
    async fn static_paths_reach_the_file_service() {
        let config = config(Vec::new());

        for uri in ["/", "/app.js", "/favicon.ico"] {
            let resp = router(&config)
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            // The static dir is missing, so the file service answers 404, not the gate 401.
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn protected_path_with_unreachable_provider_is_401() {
        let config = config(Vec::new());
        let resp = router(&config)
            .oneshot(
                Request::builder()
                    .uri("/api/memos")
                    .header(header::AUTHORIZATION, "Bearer tok")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn preflight_is_answered_by_cors_before_the_gate() {
        let config = config(vec!["http://localhost:3000".to_string()]);
        let resp = router(&config)
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/memos")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }
}
