//! Wire types for the accounts and queue APIs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ApiError;

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SendCodeRequest<'a> {
    pub phone_number: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyCodeRequest<'a> {
    pub phone_number: &'a str,
    pub code: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

/// Body of a successful `verify-code/` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyCodeResponse {
    pub is_new_user: bool,
    #[serde(default)]
    pub registration_token: Option<String>,
    #[serde(default)]
    pub tokens: Option<AuthTokens>,
}

/// Body of a failed accounts call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// What a successful verification means for the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Unknown phone: continue to signup with this token.
    NewUser { registration_token: String },
    /// Known phone: signed in.
    ExistingUser { tokens: AuthTokens },
}

impl TryFrom<VerifyCodeResponse> for Verification {
    type Error = ApiError;

    fn try_from(response: VerifyCodeResponse) -> Result<Self, Self::Error> {
        if response.is_new_user {
            response
                .registration_token
                .map(|registration_token| Verification::NewUser { registration_token })
                .ok_or_else(|| ApiError::Malformed("new user without registration_token".into()))
        } else {
            response
                .tokens
                .map(|tokens| Verification::ExistingUser { tokens })
                .ok_or_else(|| ApiError::Malformed("existing user without tokens".into()))
        }
    }
}

// ============================================================================
// Queue status
// ============================================================================

/// Where a ticket stands in a bakery's queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueStatus {
    /// The ticket's bread is ready
    pub ready: bool,
    /// `wait_until` is measured from actual baking progress
    pub accurate_time: bool,
    /// Estimated seconds until ready
    pub wait_until: i64,
    pub is_user_exists: bool,
    pub people_in_queue: u32,
    pub empty_slot_time_avg: f64,
    pub in_queue_customers_time: f64,
    /// Bread name -> count, when the ticket exists
    #[serde(default)]
    pub user_breads: Option<HashMap<String, u32>>,
    /// Decoded access token claims, when signed in
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Body of `GET /res/`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum QueueStatusResponse {
    Status(QueueStatus),
    /// e.g. "bakery does not exist", "queue is empty"
    Message { msg: String },
}
