use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub app_metadata: Option<serde_json::Value>,
    pub user_metadata: Option<serde_json::Value>,
    pub aud: Option<String>,
    pub iat: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Doctor,
    Patient,
    Other,
}

impl UserRole {
    pub fn parse(role: Option<&str>) -> Self {
        match role.map(|r| r.trim().to_ascii_lowercase()).as_deref() {
            Some("doctor") => UserRole::Doctor,
            Some("patient") => UserRole::Patient,
            _ => UserRole::Other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    /// Server-managed `app_metadata` claim.
    pub app_metadata: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Portal role. Supabase puts `authenticated` in the top-level `role`
    /// claim, so the portal role is read from `app_metadata` first. The
    /// user-editable `user_metadata` never grants a role.
    pub fn portal_role(&self) -> UserRole {
        let from_metadata = self
            .app_metadata
            .as_ref()
            .and_then(|m| m.get("role"))
            .and_then(|r| r.as_str());

        match UserRole::parse(from_metadata) {
            UserRole::Other => UserRole::parse(self.role.as_deref()),
            role => role,
        }
    }

    pub fn is_doctor(&self) -> bool {
        self.portal_role() == UserRole::Doctor
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub valid: bool,
    pub user_id: String,
    pub email: Option<String>,
    pub role: Option<String>,
}
