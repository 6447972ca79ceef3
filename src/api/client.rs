//! Client for the backend's REST API
//!
//! Thin request/response wrappers: every call either returns the decoded
//! payload or an error. No retries.

use std::path::Path;

use reqwest::{Method, RequestBuilder};
use serde_json::Value;

use crate::common::{Error, Result};

use super::types::*;

/// REST client holding the base URL and an optional bearer token
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        if self.token.is_none() {
            return Err(Error::AuthRequired);
        }
        Ok(self.request(method, path))
    }

    async fn call(builder: RequestBuilder) -> Result<ApiResponse> {
        let response = builder.send().await?;
        tracing::debug!(status = %response.status(), url = %response.url(), "API response");
        let body: ApiResponse = response.json().await?;
        body.into_result()
    }

    /// `GET /api/status` (public, no success flag)
    pub async fn status(&self) -> Result<Value> {
        let response = self.request(Method::GET, "/api/status").send().await?;
        Ok(response.json().await?)
    }

    /// Register and keep the returned token
    pub async fn register(&mut self, email: &str, username: &str, password: &str) -> Result<AuthSession> {
        let body = RegisterRequest {
            email,
            username,
            password,
        };
        let response =
            Self::call(self.request(Method::POST, "/api/auth/register").json(&body)).await?;
        self.adopt_session(&response)
    }

    /// Log in and keep the returned token
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthSession> {
        let body = LoginRequest { email, password };
        let response = Self::call(self.request(Method::POST, "/api/auth/login").json(&body)).await?;
        self.adopt_session(&response)
    }

    fn adopt_session(&mut self, response: &ApiResponse) -> Result<AuthSession> {
        let session = AuthSession {
            token: response.field("token")?,
            user: response.field("user")?,
        };
        self.token = Some(session.token.clone());
        Ok(session)
    }

    /// Verify the current token; an invalid token is dropped
    pub async fn verify(&mut self) -> Result<ApiResponse> {
        let result = Self::call(self.authed(Method::GET, "/api/auth/verify")?).await;
        if matches!(result, Err(Error::Api(_))) {
            self.token = None;
        }
        result
    }

    /// Upload one file, optionally attached to a chat session
    pub async fn upload(&self, path: &Path, session_id: Option<&str>) -> Result<Vec<UploadedFile>> {
        let bytes = tokio::fs::read(path).await.map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let form = reqwest::multipart::Form::new().part(
            "files",
            reqwest::multipart::Part::bytes(bytes).file_name(file_name),
        );

        let endpoint = match session_id {
            Some(id) => format!("/upload/session/{}", id),
            None => "/upload".to_string(),
        };

        let response = Self::call(self.request(Method::POST, &endpoint).multipart(form)).await?;
        if response.data.contains_key("files") {
            response.field("files")
        } else {
            Ok(Vec::new())
        }
    }

    pub async fn admin_stats(&self) -> Result<AdminStats> {
        let response = Self::call(self.authed(Method::GET, "/api/admin/stats")?).await?;
        response.field("stats")
    }

    pub async fn users(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<(Vec<UserInfo>, Pagination)> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query.push(("search", search.to_string()));
        }

        let response =
            Self::call(self.authed(Method::GET, "/api/admin/users")?.query(&query)).await?;
        Ok((response.field("users")?, response.field("pagination")?))
    }

    pub async fn whitelist_status(&self) -> Result<WhitelistStatus> {
        let response = Self::call(self.authed(Method::GET, "/api/admin/whitelist/status")?).await?;
        response.field("status")
    }

    pub async fn whitelist_toggle(&self, enabled: bool) -> Result<()> {
        let body = serde_json::json!({ "enabled": enabled });
        Self::call(self.authed(Method::POST, "/api/admin/whitelist/toggle")?.json(&body)).await?;
        Ok(())
    }

    pub async fn whitelist_emails(&self) -> Result<Vec<WhitelistEmail>> {
        let response = Self::call(self.authed(Method::GET, "/api/admin/whitelist/emails")?).await?;
        response.field("emails")
    }

    pub async fn whitelist_add(&self, email: &str) -> Result<()> {
        let body = serde_json::json!({ "email": email });
        Self::call(self.authed(Method::POST, "/api/admin/whitelist/emails")?.json(&body)).await?;
        Ok(())
    }

    pub async fn whitelist_remove(&self, id: i64) -> Result<()> {
        let path = format!("/api/admin/whitelist/emails/{}", id);
        Self::call(self.authed(Method::DELETE, &path)?).await?;
        Ok(())
    }
}
