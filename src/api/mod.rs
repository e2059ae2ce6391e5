//! HTTP client for the Orbita platform API.
//!
//! Every request goes through one pipeline: attach the current bearer
//! credential, dispatch, and on a 401 run the refresh protocol once and
//! replay the original request with the new token. A 401 on the replay is
//! returned as-is, so a caller never sees more than one automatic retry.
//!
//! Concurrent 401s are collapsed into a single refresh (single-flight):
//! the first failing request performs the exchange while the others wait
//! on the same gate and reuse the resulting token.

pub mod error;
pub mod types;

use std::sync::{Arc, RwLock};

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::{Session, TokenStore, refresh};

pub use error::ApiError;
use types::{
    LoginRequest, MeResponse, MinorHistoryEntry, MinorSummary, RegisterRequest, SelectMinorRequest,
    SpecializationSummary, TokenResponse,
};

type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<TokenStore>,
    /// Single-flight gate for the refresh protocol.
    refresh_gate: tokio::sync::Mutex<()>,
    /// Invoked after session teardown. The host subscribes and performs
    /// navigation; the pipeline itself stays navigation-agnostic.
    on_session_expired: RwLock<Option<SessionExpiredHook>>,
}

impl ApiClient {
    /// Creates a client with a default HTTP transport.
    pub fn new(base_url: impl Into<String>, store: Arc<TokenStore>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, store)
    }

    /// Creates a client over a preconfigured transport (timeouts, proxies).
    pub fn with_http(
        http: reqwest::Client,
        base_url: impl Into<String>,
        store: Arc<TokenStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            store,
            refresh_gate: tokio::sync::Mutex::new(()),
            on_session_expired: RwLock::new(None),
        }
    }

    /// Registers a hook invoked when the session is torn down after a
    /// failed refresh. Replaces any previously registered hook.
    pub fn on_session_expired<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut slot = self
            .on_session_expired
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(Arc::new(hook));
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Auth endpoints ──────────────────────────────────────────────────

    /// Logs in and stores the resulting token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let tokens: TokenResponse = self
            .request(Method::POST, "/api/auth/login", Some(&to_body(&LoginRequest { email, password })))
            .await?;
        self.install_session(tokens)
    }

    /// Registers a new account and stores the resulting token pair.
    pub async fn register(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<Session, ApiError> {
        let body = to_body(&RegisterRequest {
            email,
            full_name,
            password,
        });
        let tokens: TokenResponse = self
            .request(Method::POST, "/api/auth/register", Some(&body))
            .await?;
        self.install_session(tokens)
    }

    pub async fn me(&self) -> Result<MeResponse, ApiError> {
        self.request(Method::GET, "/api/auth/me", None).await
    }

    // ── Onboarding endpoints ────────────────────────────────────────────

    pub async fn minor_history(&self) -> Result<Vec<MinorHistoryEntry>, ApiError> {
        self.request(Method::GET, "/api/minors/my/history", None).await
    }

    pub async fn specializations(&self) -> Result<Vec<SpecializationSummary>, ApiError> {
        self.request(Method::GET, "/api/specializations/", None).await
    }

    pub async fn minors(&self) -> Result<Vec<MinorSummary>, ApiError> {
        self.request(Method::GET, "/api/minors/", None).await
    }

    pub async fn set_specialization(&self, specialization_id: u64) -> Result<(), ApiError> {
        let path = format!(
            "/api/students/me/specialization?specialization_id={}",
            specialization_id
        );
        let _: Value = self.request(Method::PUT, &path, None).await?;
        Ok(())
    }

    pub async fn select_minor(&self, minor_id: u64) -> Result<(), ApiError> {
        let body = to_body(&SelectMinorRequest { minor_id });
        let _: Value = self
            .request(Method::POST, "/api/minors/select", Some(&body))
            .await?;
        Ok(())
    }

    /// Returns the raw progress document (`GET /api/students/me/progress`).
    pub async fn progress(&self) -> Result<Value, ApiError> {
        self.request(Method::GET, "/api/students/me/progress", None).await
    }

    // ── Pipeline ────────────────────────────────────────────────────────

    /// Runs one logical request through the pipeline and decodes the body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let response = self.send_with_retry(method, path, body).await?;
        response.json().await.map_err(|e| ApiError::decode(&e))
    }

    async fn send_with_retry(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let session = self.store.get();
        let access = session.access_token;
        let response = self
            .dispatch(method.clone(), path, body, access.as_deref())
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::into_result(response).await;
        }

        // A 401 on an uncredentialed request (login, register) has nothing
        // to refresh and no session to tear down; surface it unchanged.
        if access.is_none() && session.refresh_token.is_none() {
            return Self::into_result(response).await;
        }

        tracing::debug!(path, "unauthorized response, refreshing access token");
        let token = self.fresh_access_token(access.as_deref()).await?;

        // Replay exactly once with the new credential. A second 401 is
        // surfaced as a plain status error, never another refresh.
        let response = self.dispatch(method, path, body, Some(&token)).await?;
        Self::into_result(response).await
    }

    /// Returns an access token that post-dates the given stale one,
    /// refreshing if no other request already did.
    ///
    /// All 401 handlers serialize on `refresh_gate`; whoever wins the race
    /// performs the exchange and the rest observe the updated store. Any
    /// failure tears the session down before propagating.
    async fn fresh_access_token(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _flight = self.refresh_gate.lock().await;

        if let Some(current) = self.store.get().access_token
            && stale != Some(current.as_str())
        {
            return Ok(current);
        }

        match refresh::exchange(&self.http, &self.base_url, &self.store).await {
            Ok(access) => Ok(access),
            Err(err) => {
                self.teardown();
                Err(err)
            }
        }
    }

    /// Session teardown: null both tokens and notify the host.
    fn teardown(&self) {
        if let Err(err) = self.store.clear() {
            tracing::warn!(error = %err, "failed to persist cleared session");
        }

        let hook = self
            .on_session_expired
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        if let Some(hook) = hook {
            hook();
        }
        tracing::info!("session torn down after failed refresh");
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        access_token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, &url);

        if let Some(token) = access_token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(json) = body {
            builder = builder.json(json);
        }

        builder.send().await.map_err(|e| ApiError::network(&e))
    }

    async fn into_result(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::status(status.as_u16(), &body))
    }

    fn install_session(&self, tokens: TokenResponse) -> Result<Session, ApiError> {
        let session = Session {
            access_token: Some(tokens.access_token),
            refresh_token: tokens.refresh_token,
        };
        if let Err(err) = self.store.set(session.clone()) {
            tracing::warn!(error = %err, "failed to persist session");
        }
        Ok(session)
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).expect("request body serialization cannot fail")
}
