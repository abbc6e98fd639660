// Trait definitions for the login controller's collaborators
//
// These are INFRASTRUCTURE seams only - the flow itself lives in the controller.

use async_trait::async_trait;

use crate::error::{ApiResult, StoreResult};
use crate::types::VerifyCodeResponse;

// =============================================================================
// Accounts API (send / verify OTP)
// =============================================================================

#[async_trait]
pub trait AccountsApi: Send + Sync {
    /// Ask the backend to text a fresh code to `phone_number`
    async fn send_code(&self, phone_number: &str) -> ApiResult<()>;

    /// Check `code` for `phone_number`
    async fn verify_code(&self, phone_number: &str, code: &str) -> ApiResult<VerifyCodeResponse>;
}

// =============================================================================
// Token Store (client-side key-value persistence)
// =============================================================================

pub trait TokenStore: Send + Sync {
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn remove(&self, key: &str) -> StoreResult<()>;

    /// Write several values. Implementations should make this atomic where
    /// they can.
    fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

// =============================================================================
// Navigation
// =============================================================================

/// Pages the login flow can hand off to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Registration for a phone the backend has not seen before
    Signup,
    /// Signed-in landing page
    Dashboard,
}

impl Destination {
    pub fn path(&self) -> &'static str {
        match self {
            Destination::Signup => "/signup",
            Destination::Dashboard => "/dashboard",
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}
