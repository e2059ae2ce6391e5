//! Refresh protocol: exchanges the refresh credential for a new token pair.
//!
//! Deliberately isolated from the request pipeline so the exchange is never
//! itself subject to the 401 → refresh → replay cycle.

use crate::api::error::ApiError;
use crate::api::types::TokenResponse;

use super::session::{Session, TokenStore};

/// Exchanges the stored refresh token for a new access token.
///
/// Fails fast with `NoRefreshToken` when no refresh credential exists (no
/// network call). On success both tokens are written to the store as one
/// atomic update; if the server omits a new refresh token the existing one
/// is kept. Any exchange failure is `RefreshRejected` and the caller must
/// tear down the session.
pub async fn exchange(
    http: &reqwest::Client,
    base_url: &str,
    store: &TokenStore,
) -> Result<String, ApiError> {
    let Some(refresh_token) = store.get().refresh_token else {
        return Err(ApiError::NoRefreshToken);
    };

    let url = format!("{}/api/auth/refresh", base_url);
    let response = http
        .post(&url)
        .json(&serde_json::json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .map_err(|e| ApiError::RefreshRejected {
            message: format!("refresh request failed: {}", e),
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::RefreshRejected {
            message: format!("HTTP {}: {}", status.as_u16(), body.trim()),
        });
    }

    let tokens: TokenResponse =
        response
            .json()
            .await
            .map_err(|e| ApiError::RefreshRejected {
                message: format!("invalid refresh response: {}", e),
            })?;

    let session = Session {
        access_token: Some(tokens.access_token.clone()),
        refresh_token: tokens.refresh_token.or(Some(refresh_token)),
    };

    // The in-memory session is what callers observe; a failed disk write
    // must not invalidate an otherwise successful refresh.
    if let Err(err) = store.set(session) {
        tracing::warn!(error = %err, "failed to persist refreshed session");
    }

    tracing::debug!("access token refreshed");
    Ok(tokens.access_token)
}
