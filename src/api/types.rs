//! Wire types for the Orbita platform API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `POST /api/auth/login` and `/api/auth/register` response.
///
/// The refresh endpoint reuses this shape; there the refresh token is
/// optional and the previous one is kept when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub full_name: &'a str,
    pub password: &'a str,
}

/// `GET /api/auth/me` response.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub id: u64,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub specialization_id: Option<u64>,
    #[serde(default)]
    pub minor_ids: Vec<u64>,
}

/// One entry of `GET /api/minors/my/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct MinorHistoryEntry {
    pub minor_id: u64,
    /// "selected", "completed" or "archived"
    pub status: String,
    #[serde(default)]
    pub selected_at: Option<DateTime<Utc>>,
}

impl MinorHistoryEntry {
    pub const STATUS_SELECTED: &'static str = "selected";

    pub fn is_selected(&self) -> bool {
        self.status == Self::STATUS_SELECTED
    }
}

#[derive(Debug, Serialize)]
pub struct SelectMinorRequest {
    pub minor_id: u64,
}

/// Summary row of `GET /api/specializations/`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecializationSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Summary row of `GET /api/minors/`.
#[derive(Debug, Clone, Deserialize)]
pub struct MinorSummary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: a profile response without `is_active` is malformed and must
    /// not decode; the account is never assumed verified.
    #[test]
    fn test_me_response_requires_is_active() {
        let body = serde_json::json!({
            "id": 1,
            "email": "student@example.com",
            "full_name": "Test Student",
            "specialization_id": null,
            "minor_ids": []
        });
        assert!(serde_json::from_value::<MeResponse>(body).is_err());
    }
}
