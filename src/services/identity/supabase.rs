//! Supabase (GoTrue) auth API client.
//!
//! Responsibility:
//! - Every call to the identity provider goes through `api_request`
//!   (`apikey` header, JSON body, optional bearer token).
//! - Transport failures are returned as `ProviderError`, never panics.
//! - Implements `IdentityResolver` on top of `GET /auth/v1/user`.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use url::Url;

use super::resolver::{Credential, IdentityResolver, ResolutionError, ResolvedIdentity};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid provider url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    Client(reqwest::Error),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Raw provider answer: status plus JSON body (`{}` when the body is not JSON).
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ProviderResponse {
    pub fn has_id(&self) -> bool {
        self.body.get("id").is_some_and(|v| !v.is_null())
    }
}

/// Subset of the GoTrue user / error payloads the resolver cares about.
#[derive(Debug, Default, Deserialize)]
struct UserPayload {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl UserPayload {
    fn error_message(&self) -> String {
        self.error_description
            .as_deref()
            .or(self.msg.as_deref())
            .or(self.message.as_deref())
            .or(self.error.as_deref())
            .unwrap_or("no user id in provider response")
            .to_string()
    }
}

#[derive(Clone, Debug)]
pub struct SupabaseAuthClient {
    base_url: String,
    anon_key: String,
    http: Client,
}

impl SupabaseAuthClient {
    pub fn new(
        base_url: &str,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Url::parse(base_url)?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::Client)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            http,
        })
    }

    async fn api_request(
        &self,
        method: Method,
        path: &str,
        data: Option<Value>,
        access_token: Option<&str>,
    ) -> Result<ProviderResponse, ProviderError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let mut request = self
            .http
            .request(method, &url)
            .header("apikey", &self.anon_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = data {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or_else(|_| json!({}));

        Ok(ProviderResponse { status, body })
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let data = json!({
            "email": email,
            "password": password,
            "options": { "email_redirect_to": redirect_to }
        });
        self.api_request(Method::POST, "/auth/v1/signup", Some(data), None)
            .await
    }

    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        let data = json!({ "email": email, "password": password });
        self.api_request(
            Method::POST,
            "/auth/v1/token?grant_type=password",
            Some(data),
            None,
        )
        .await
    }

    pub async fn get_user(&self, access_token: &str) -> Result<ProviderResponse, ProviderError> {
        self.api_request(Method::GET, "/auth/v1/user", None, Some(access_token))
            .await
    }

    pub async fn logout(&self, access_token: &str) -> Result<ProviderResponse, ProviderError> {
        self.api_request(Method::POST, "/auth/v1/logout", None, Some(access_token))
            .await
    }

    pub fn github_signin_url(&self, redirect_to: &str) -> Result<String, ProviderError> {
        let mut url = Url::parse(&format!("{}/auth/v1/authorize", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("provider", "github")
            .append_pair("redirect_to", redirect_to)
            .append_pair("scopes", "user:email");
        Ok(url.into())
    }
}

#[async_trait]
impl IdentityResolver for SupabaseAuthClient {
    async fn resolve(&self, credential: &Credential) -> Result<ResolvedIdentity, ResolutionError> {
        let response = self
            .get_user(credential.as_str())
            .await
            .map_err(|err| ResolutionError::unreachable(err.to_string()))?;

        let payload: UserPayload = serde_json::from_value(response.body).unwrap_or_default();

        match payload.id.as_deref() {
            Some(id) if !id.is_empty() && response.status.is_success() => Ok(ResolvedIdentity {
                user_id: id.to_string(),
                email: payload.email,
            }),
            _ => {
                // A 2xx without a user id is still a rejection, not a success.
                let status = if response.status.is_success() {
                    StatusCode::UNAUTHORIZED
                } else {
                    response.status
                };
                Err(ResolutionError::rejected(status, payload.error_message()))
            }
        }
    }
}
