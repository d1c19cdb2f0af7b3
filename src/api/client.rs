//! Thin reqwest wrapper around the review service.
//!
//! Responsibilities beyond request plumbing:
//! - attaches the stored bearer token to every request
//! - maps status codes onto the `ApiError` taxonomy (FastAPI-style
//!   `{"detail": ...}` bodies are used for messages when present)
//! - on a 401 from any non-auth endpoint, clears stored credentials and
//!   broadcasts a logout signal; a 401 from login/register/profile is
//!   surfaced as-is so a failed login does not wipe an unrelated session
//! - retries connection-level failures a bounded number of times; nothing
//!   else is retried here (status polling has its own loop)

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use tokio::sync::broadcast;

use crate::api::models::{
    AuthToken, CodeSubmission, CommonIssuesResponse, ExportFilters, HealthCheck,
    LanguageBreakdown, LoginRequest, RegisterRequest, Review, ReviewFilters, ReviewListResponse,
    ReviewResponse, StatsResponse, StatsSummary, TrendData, User,
};
use crate::auth::{CredentialStore, StoredCredentials};
use crate::errors::ApiError;
use crate::session::ReviewFetcher;

/// Extra attempts after a connection-level failure.
const TRANSIENT_RETRY_LIMIT: u32 = 2;
/// Base delay between retry attempts, multiplied by the attempt number.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Why a forced logout happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The service rejected the stored token on a non-auth endpoint.
    Unauthorized,
}

/// Client for the review service.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
    logout_tx: broadcast::Sender<LogoutReason>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        credentials: Arc<CredentialStore>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the HTTP client")?;
        let (logout_tx, _) = broadcast::channel(4);
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            logout_tx,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Observe forced logouts (401 on a non-auth endpoint).
    pub fn subscribe_logout(&self) -> broadcast::Receiver<LogoutReason> {
        self.logout_tx.subscribe()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and map non-2xx statuses onto the error taxonomy.
    /// Connection-level failures of GETs are retried a bounded number of
    /// times; such a request never reached the service, so resending cannot
    /// duplicate work.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        customize: impl Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
        auth_endpoint: bool,
    ) -> Result<reqwest::Response, ApiError> {
        let retryable = method == Method::GET;
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let mut request = customize(self.http.request(method.clone(), self.url(path)));
            if let Some(token) = self.credentials.token() {
                request = request.bearer_auth(token);
            }
            match request.send().await {
                Ok(response) => return self.check_status(response, auth_endpoint).await,
                Err(err) => {
                    let mapped = ApiError::from_transport(err);
                    if mapped.is_transient() && retryable && attempt <= TRANSIENT_RETRY_LIMIT {
                        tracing::debug!(attempt, path, "transient transport failure, retrying");
                        tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                        continue;
                    }
                    return Err(mapped);
                }
            }
        }
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
        auth_endpoint: bool,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = Self::error_detail(response).await;
        match status {
            StatusCode::UNAUTHORIZED => {
                if auth_endpoint {
                    Err(ApiError::Unauthorized { message })
                } else {
                    // The stored token is no longer accepted: force a logout.
                    if let Err(err) = self.credentials.clear() {
                        tracing::warn!(%err, "failed to clear stored credentials");
                    }
                    let _ = self.logout_tx.send(LogoutReason::Unauthorized);
                    tracing::warn!("service rejected the stored token; credentials cleared");
                    Err(ApiError::Unauthorized {
                        message: "Session expired. Please log in again.".to_string(),
                    })
                }
            }
            StatusCode::TOO_MANY_REQUESTS => Err(ApiError::RateLimited { message }),
            s if s.is_server_error() => Err(ApiError::Server {
                status: s.as_u16(),
                message,
            }),
            s => Err(ApiError::Api {
                status: s.as_u16(),
                message,
            }),
        }
    }

    /// Best-effort extraction of the `detail` field from an error body.
    async fn error_detail(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            match json.get("detail") {
                Some(serde_json::Value::String(detail)) => return detail.clone(),
                Some(other) if !other.is_null() => return other.to_string(),
                _ => {}
            }
        }
        let trimmed = body.trim();
        if trimmed.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        } else {
            trimmed.to_string()
        }
    }

    async fn json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        response.json::<T>().await.map_err(ApiError::from_transport)
    }

    // ========== REVIEWS ==========

    /// Validate and submit a code sample. The returned identifier is the
    /// handle for status polling.
    pub async fn submit_review(
        &self,
        submission: &CodeSubmission,
    ) -> Result<ReviewResponse, ApiError> {
        submission.validate()?;
        let response = self
            .execute(Method::POST, "/reviews", |r| r.json(submission), false)
            .await?;
        Self::json(response).await
    }

    pub async fn get_review(&self, id: &str) -> Result<Review, ApiError> {
        let response = self
            .execute(Method::GET, &format!("/reviews/{}", id), |r| r, false)
            .await?;
        Self::json(response).await
    }

    pub async fn list_reviews(
        &self,
        filters: &ReviewFilters,
    ) -> Result<ReviewListResponse, ApiError> {
        let response = self
            .execute(Method::GET, "/reviews", |r| r.query(filters), false)
            .await?;
        Self::json(response).await
    }

    pub async fn delete_review(&self, id: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, &format!("/reviews/{}", id), |r| r, false)
            .await?;
        Ok(())
    }

    /// Download the filtered review history as CSV bytes.
    pub async fn export_reviews_csv(&self, filters: &ExportFilters) -> Result<Vec<u8>, ApiError> {
        let query = filters.to_query();
        let response = self
            .execute(Method::GET, "/reviews/export/csv", |r| r.query(&query), false)
            .await?;
        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        Ok(bytes.to_vec())
    }

    // ========== STATISTICS ==========

    pub async fn get_statistics(&self) -> Result<StatsResponse, ApiError> {
        let response = self.execute(Method::GET, "/stats", |r| r, false).await?;
        Self::json(response).await
    }

    pub async fn stats_summary(&self) -> Result<StatsSummary, ApiError> {
        let response = self
            .execute(Method::GET, "/stats/summary", |r| r, false)
            .await?;
        Self::json(response).await
    }

    pub async fn language_stats(&self) -> Result<LanguageBreakdown, ApiError> {
        let response = self
            .execute(Method::GET, "/stats/languages", |r| r, false)
            .await?;
        Self::json(response).await
    }

    pub async fn trends(&self) -> Result<TrendData, ApiError> {
        let response = self
            .execute(Method::GET, "/stats/trends", |r| r, false)
            .await?;
        Self::json(response).await
    }

    pub async fn common_issues(&self) -> Result<CommonIssuesResponse, ApiError> {
        let response = self
            .execute(Method::GET, "/stats/issues", |r| r, false)
            .await?;
        Self::json(response).await
    }

    pub async fn export_stats_csv(&self) -> Result<Vec<u8>, ApiError> {
        let response = self
            .execute(Method::GET, "/stats/export/csv", |r| r, false)
            .await?;
        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        Ok(bytes.to_vec())
    }

    // ========== HEALTH ==========

    pub async fn health(&self) -> Result<HealthCheck, ApiError> {
        let response = self.execute(Method::GET, "/health", |r| r, false).await?;
        Self::json(response).await
    }

    // ========== AUTHENTICATION ==========

    /// Log in and persist the issued token. A 401 here means bad
    /// credentials and never clears an existing session.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthToken, ApiError> {
        let response = self
            .execute(Method::POST, "/auth/login", |r| r.json(request), true)
            .await?;
        let token: AuthToken = Self::json(response).await?;
        self.persist(&token)?;
        Ok(token)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthToken, ApiError> {
        let response = self
            .execute(Method::POST, "/auth/register", |r| r.json(request), true)
            .await?;
        let token: AuthToken = Self::json(response).await?;
        self.persist(&token)?;
        Ok(token)
    }

    pub async fn profile(&self) -> Result<User, ApiError> {
        let response = self
            .execute(Method::GET, "/auth/profile", |r| r, true)
            .await?;
        Self::json(response).await
    }

    /// Notify the service (best effort) and clear local credentials. Local
    /// state is cleared even when the service call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self
            .execute(Method::POST, "/auth/logout", |r| r, true)
            .await;
        if let Err(err) = result {
            tracing::debug!(%err, "logout request failed; clearing local credentials anyway");
        }
        self.credentials.clear().map_err(ApiError::Other)?;
        Ok(())
    }

    fn persist(&self, token: &AuthToken) -> Result<(), ApiError> {
        self.credentials
            .store(StoredCredentials {
                access_token: token.access_token.clone(),
                user: token.user.clone(),
            })
            .map_err(ApiError::Other)
    }
}

#[async_trait]
impl ReviewFetcher for ApiClient {
    async fn fetch_review(&self, id: &str) -> Result<Review, ApiError> {
        self.get_review(id).await
    }
}
