//! Testing utilities including mock implementations.
//!
//! These let the login flow run without a backend or a rendered page.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{ApiError, ApiResult};
use crate::inputs::FocusHandle;
use crate::traits::{AccountsApi, Destination, Navigator};
use crate::types::{AuthTokens, VerifyCodeResponse};

/// The code the mock backend accepts.
pub const MOCK_CODE: &str = "12345";

/// Record of a call made to the mock accounts API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAccountsCall {
    SendCode { phone_number: String },
    VerifyCode { phone_number: String, code: String },
}

/// In-memory accounts backend.
///
/// Accepts [`MOCK_CODE`] for every phone. Phones registered with
/// [`MockAccountsApi::with_existing_user`] sign in; all others are new users.
#[derive(Default)]
pub struct MockAccountsApi {
    existing_users: RwLock<HashSet<String>>,
    fail_send: RwLock<bool>,
    fail_verify_network: RwLock<bool>,
    verify_override: RwLock<Option<VerifyCodeResponse>>,
    calls: RwLock<Vec<MockAccountsCall>>,
}

impl MockAccountsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_existing_user(self, phone_number: impl Into<String>) -> Self {
        self.existing_users
            .write()
            .unwrap()
            .insert(phone_number.into());
        self
    }

    /// Make `send_code` fail as if the backend were down.
    pub fn failing_send(self) -> Self {
        self.set_send_failing(true);
        self
    }

    pub fn set_send_failing(&self, failing: bool) {
        *self.fail_send.write().unwrap() = failing;
    }

    /// Make `verify_code` fail before reaching the backend.
    pub fn set_verify_network_failing(&self, failing: bool) {
        *self.fail_verify_network.write().unwrap() = failing;
    }

    /// Return `response` from every correct verification.
    pub fn with_verify_response(self, response: VerifyCodeResponse) -> Self {
        *self.verify_override.write().unwrap() = Some(response);
        self
    }

    pub fn calls(&self) -> Vec<MockAccountsCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockAccountsCall::SendCode { .. }))
            .count()
    }

    pub fn verify_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockAccountsCall::VerifyCode { .. }))
            .count()
    }
}

#[async_trait]
impl AccountsApi for MockAccountsApi {
    async fn send_code(&self, phone_number: &str) -> ApiResult<()> {
        self.calls.write().unwrap().push(MockAccountsCall::SendCode {
            phone_number: phone_number.to_string(),
        });

        if *self.fail_send.read().unwrap() {
            return Err(ApiError::Rejected {
                status: 503,
                message: None,
            });
        }
        Ok(())
    }

    async fn verify_code(&self, phone_number: &str, code: &str) -> ApiResult<VerifyCodeResponse> {
        self.calls.write().unwrap().push(MockAccountsCall::VerifyCode {
            phone_number: phone_number.to_string(),
            code: code.to_string(),
        });

        if *self.fail_verify_network.read().unwrap() {
            return Err(ApiError::Malformed("connection reset".to_string()));
        }

        if code != MOCK_CODE {
            return Err(ApiError::Rejected {
                status: 400,
                message: Some("Invalid or expired code".to_string()),
            });
        }

        if let Some(response) = self.verify_override.read().unwrap().clone() {
            return Ok(response);
        }

        if self.existing_users.read().unwrap().contains(phone_number) {
            Ok(VerifyCodeResponse {
                is_new_user: false,
                registration_token: None,
                tokens: Some(AuthTokens {
                    access: format!("access-{}", phone_number),
                    refresh: format!("refresh-{}", phone_number),
                }),
            })
        } else {
            Ok(VerifyCodeResponse {
                is_new_user: true,
                registration_token: Some(format!("registration-{}", phone_number)),
                tokens: None,
            })
        }
    }
}

/// Navigator that remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: RwLock<Vec<Destination>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<Destination> {
        self.visited.read().unwrap().clone()
    }

    pub fn last(&self) -> Option<Destination> {
        self.visited().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination) {
        self.visited.write().unwrap().push(destination);
    }
}

/// Focus handle that counts how often it was focused.
#[derive(Clone, Default)]
pub struct RecordingFocus {
    count: Arc<AtomicUsize>,
}

impl RecordingFocus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Arc<dyn FocusHandle> {
        Arc::new(self.clone())
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl FocusHandle for RecordingFocus {
    fn focus(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
