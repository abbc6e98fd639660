//! HTTP clients for the Noonyar backend

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::traits::AccountsApi;
use crate::types::{
    ErrorBody, QueueStatusResponse, SendCodeRequest, VerifyCodeRequest, VerifyCodeResponse,
};

fn build_http(timeout: Duration) -> ApiResult<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Turn a non-success response into `ApiError::Rejected`, keeping the
/// server's `error` field when the body has one.
async fn reject(response: Response) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error);
    if message.is_none() && !body.is_empty() {
        debug!(%status, body = %body, "Error response without an error field");
    }
    ApiError::Rejected {
        status: status.as_u16(),
        message,
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// reqwest-backed accounts API (`/api/accounts`)
#[derive(Clone)]
pub struct HttpAccountsApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAccountsApi {
    /// `base_url` is the accounts root, e.g. `http://127.0.0.1:8000/api/accounts`
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(15))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            client: build_http(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        Self::with_timeout(config.accounts_url(), config.request_timeout)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/", self.base_url, path)
    }
}

#[async_trait]
impl AccountsApi for HttpAccountsApi {
    async fn send_code(&self, phone_number: &str) -> ApiResult<()> {
        let response = self
            .client
            .post(self.endpoint("send-code"))
            .json(&SendCodeRequest { phone_number })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        Ok(())
    }

    async fn verify_code(&self, phone_number: &str, code: &str) -> ApiResult<VerifyCodeResponse> {
        let response = self
            .client
            .post(self.endpoint("verify-code"))
            .json(&VerifyCodeRequest { phone_number, code })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(reject(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

// ============================================================================
// Queue status
// ============================================================================

/// Client for the ticket status endpoint (`GET /res/`)
#[derive(Clone)]
pub struct QueueClient {
    client: reqwest::Client,
    api_url: String,
    access_token: Option<String>,
}

impl QueueClient {
    /// `api_url` is the API origin, e.g. `http://127.0.0.1:8000`
    pub fn new(api_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(api_url, Duration::from_secs(15))
    }

    pub fn with_timeout(api_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        Ok(Self {
            client: build_http(timeout)?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: None,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        Self::with_timeout(&config.api_url, config.request_timeout)
    }

    /// Send the access token the login flow stored, as the backend reads it
    /// from the `access_token` cookie
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Look up `ticket` in the queue of bakery `bakery_id`
    pub async fn ticket_status(&self, bakery_id: u64, ticket: u64) -> ApiResult<QueueStatusResponse> {
        let mut request = self
            .client
            .get(format!("{}/res/", self.api_url))
            .query(&[("b", bakery_id), ("t", ticket)]);

        if let Some(token) = &self.access_token {
            request = request.header(COOKIE, format!("access_token={}", token));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(bakery_id, "Queue status rejected the stored access token");
        }
        if !status.is_success() {
            return Err(reject(response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}
