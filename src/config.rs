/*
 * Responsibility
 * - 環境変数の読み込み (DATABASE_URL, SUPABASE_*, CORS 許可, limits など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動時に一度だけ組み立て、各 service に明示的に渡す (global にしない)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub identity_timeout_seconds: u64,

    pub cors_allowed_origins: Vec<String>,
    pub static_dir: PathBuf,

    pub request_timeout_seconds: u64,
    pub body_limit_bytes: usize,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,
}

fn var(key: &'static str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    var(key).ok_or(ConfigError::Missing(key))
}

/// Optional numeric value: absent falls back to `default`, unparsable is an error.
fn parsed_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match var(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parsed_or("PORT", 8280)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url = required("DATABASE_URL")?;
        let database_max_connections = parsed_or("DATABASE_MAX_CONNECTIONS", 5)?;

        let supabase_url = required("SUPABASE_URL")?;
        url::Url::parse(&supabase_url).map_err(|_| ConfigError::Invalid("SUPABASE_URL"))?;
        let supabase_anon_key = required("SUPABASE_ANON_KEY")?;
        let identity_timeout_seconds = parsed_or("IDENTITY_TIMEOUT_SECONDS", 10)?;

        let cors_allowed_origins = parse_origins(&var("CORS_ALLOWED_ORIGINS").unwrap_or_default())?;

        let static_dir = PathBuf::from(var("STATIC_DIR").unwrap_or_else(|| "./static".to_string()));

        let request_timeout_seconds = parsed_or("REQUEST_TIMEOUT_SECONDS", 30)?;
        let body_limit_bytes = parsed_or("BODY_LIMIT_BYTES", 1024 * 1024)?;

        let sqids_min_length = parsed_or("SQIDS_MIN_LENGTH", 10)?;
        let sqids_alphabet = var("SQIDS_ALPHABET").unwrap_or_else(|| {
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string()
        });

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            supabase_url,
            supabase_anon_key,
            identity_timeout_seconds,
            cors_allowed_origins,
            static_dir,
            request_timeout_seconds,
            body_limit_bytes,
            sqids_min_length,
            sqids_alphabet,
        })
    }
}

/// Comma-separated exact origins. `*` is refused: the allowlist is sent with credentials.
fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if origins.iter().any(|o| o == "*") {
        return Err(ConfigError::Invalid("CORS_ALLOWED_ORIGINS"));
    }
    Ok(origins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_env_accepts_short_and_long_production_names() {
        assert!(AppEnv::parse("production").is_production());
        assert!(AppEnv::parse("PROD").is_production());
        assert!(!AppEnv::parse("staging").is_production());
        assert!(!AppEnv::parse("").is_production());
    }

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        assert_eq!(
            parse_origins(" http://localhost:8080/ ,,http://localhost:3000").unwrap(),
            vec!["http://localhost:8080", "http://localhost:3000"]
        );
        assert!(parse_origins("").unwrap().is_empty());
    }

    #[test]
    fn wildcard_origin_is_a_config_error() {
        assert!(matches!(
            parse_origins("*"),
            Err(ConfigError::Invalid("CORS_ALLOWED_ORIGINS"))
        ));
        assert!(matches!(
            parse_origins("http://localhost:3000, *"),
            Err(ConfigError::Invalid("CORS_ALLOWED_ORIGINS"))
        ));
    }

    #[test]
    fn config_error_names_the_key() {
        assert_eq!(
            ConfigError::Missing("DATABASE_URL").to_string(),
            "missing configuration: DATABASE_URL"
        );
        assert_eq!(
            ConfigError::Invalid("PORT").to_string(),
            "invalid configuration: PORT"
        );
    }
}
