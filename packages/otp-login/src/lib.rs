//! Noonyar login client
//!
//! Phone one-time-password login for the Noonyar queue app, plus the ticket
//! status lookup that signed-in pages use.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use otp_login::{ClientConfig, FileTokenStore, HttpAccountsApi, LoginController, LoginDeps, TimerService};
//!
//! let config = ClientConfig::from_env()?;
//! let deps = LoginDeps {
//!     accounts: Arc::new(HttpAccountsApi::from_config(&config)?),
//!     tokens: Arc::new(FileTokenStore::new(&config.token_store_path)),
//!     navigator: Arc::new(my_navigator),
//! };
//! let mut login = LoginController::new(deps, TimerService::default(), config.login_settings());
//!
//! login.submit_phone("09123456789").await;
//! login.paste_code("12345");
//! login.submit_code().await;
//! ```
//!
//! # Modules
//!
//! - [`controller`] - The login state machine
//! - [`timer`] - Resend cooldown countdown
//! - [`draft`] - Form state and validation
//! - [`inputs`] - Indexed focus handles for the code slots
//! - [`traits`] - Collaborator seams (accounts API, token store, navigator)
//! - [`client`] - reqwest implementations of the backend APIs
//! - [`store`] - Token store implementations
//! - [`testing`] - Mock implementations for testing

pub mod client;
pub mod config;
pub mod controller;
pub mod draft;
pub mod error;
pub mod inputs;
pub mod store;
pub mod testing;
pub mod timer;
pub mod traits;
pub mod types;

pub use client::{HttpAccountsApi, QueueClient};
pub use config::ClientConfig;
pub use controller::{
    messages, CodeOutcome, LoginController, LoginDeps, LoginSettings, LoginStep, PhoneOutcome,
    ResendOutcome, SubmitOutcome,
};
pub use draft::{is_valid_phone, CodeDigits, SessionDraft, CODE_LENGTH};
pub use error::{ApiError, StoreError};
pub use inputs::{CodeInputs, FocusHandle};
pub use store::{FileTokenStore, MemoryTokenStore};
pub use timer::TimerService;
pub use traits::{AccountsApi, Destination, Navigator, TokenStore};
pub use types::{AuthTokens, QueueStatus, QueueStatusResponse, Verification, VerifyCodeResponse};
