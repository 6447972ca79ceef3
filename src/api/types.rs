//! REST API payload types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{Error, Result};

/// Common response envelope: `{success, message?, ...}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl ApiResponse {
    /// Turn `success=false` into an error carrying the backend's message
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(Error::Api(
                self.message.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }

    /// Deserialize one field of the payload
    pub fn field<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .data
            .get(key)
            .cloned()
            .ok_or_else(|| Error::Api(format!("response is missing '{}'", key)))?;
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserInfo {
    pub fn role(&self) -> &'static str {
        if self.is_superuser {
            "Superuser"
        } else if self.is_staff {
            "Staff"
        } else {
            "User"
        }
    }
}

/// Token and user returned by register/login
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminStats {
    pub total_users: u64,
    pub active_users: u64,
    pub total_chat_sessions: u64,
    pub total_files: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhitelistStatus {
    pub enabled: bool,
    pub total_emails: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhitelistEmail {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub size: Option<u64>,
}
