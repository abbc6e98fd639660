//! Phone OTP login controller.
//!
//! Drives one login attempt through
//! `PhoneEntry -> CodeVerification -> Authenticated` (or `SignupRequired`
//! for a new phone), with an explicit "edit phone" edge back to
//! `PhoneEntry`. Collaborator failures never escape: they are logged and
//! turned into field messages on the draft.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{error, info};

use crate::draft::{
    filter_phone_input, is_valid_phone, mask_phone, CodeError, SessionDraft, CODE_LENGTH,
};
use crate::inputs::CodeInputs;
use crate::store::{ACCESS_TOKEN, PHONE_FOR_SIGNUP, REFRESH_TOKEN, REGISTRATION_TOKEN};
use crate::timer::TimerService;
use crate::traits::{AccountsApi, Destination, Navigator, TokenStore};
use crate::types::Verification;

/// User-facing messages
pub mod messages {
    pub const INVALID_PHONE: &str = "Phone number must start with 09 and be 11 digits.";
    pub const SEND_FAILED: &str = "Could not send the code. Please try again.";
    pub const INCOMPLETE_CODE: &str = "Please fill in every digit.";
    pub const INVALID_CODE: &str = "The code is incorrect or has expired.";
    pub const SESSION_SAVE_FAILED: &str = "Could not save your session. Please try again.";
}

/// Timing knobs for the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginSettings {
    /// Seconds before "resend code" is allowed again
    pub resend_cooldown_secs: u32,
    /// How long a rejected-code error stays on screen
    pub code_error_display: Duration,
}

impl LoginSettings {
    pub const DEFAULT_RESEND_COOLDOWN_SECS: u32 = 120;
    pub const DEFAULT_CODE_ERROR_DISPLAY: Duration = Duration::from_secs(3);
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            resend_cooldown_secs: Self::DEFAULT_RESEND_COOLDOWN_SECS,
            code_error_display: Self::DEFAULT_CODE_ERROR_DISPLAY,
        }
    }
}

/// External collaborators of the controller
#[derive(Clone)]
pub struct LoginDeps {
    pub accounts: Arc<dyn AccountsApi>,
    pub tokens: Arc<dyn TokenStore>,
    pub navigator: Arc<dyn Navigator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    PhoneEntry,
    CodeVerification,
    /// New phone: handed off to signup (terminal)
    SignupRequired,
    /// Known phone: signed in (terminal)
    Authenticated,
}

impl LoginStep {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoginStep::SignupRequired | LoginStep::Authenticated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneOutcome {
    /// Phone failed validation; nothing was sent
    Invalid,
    /// The backend could not send a code
    SendFailed,
    CodeSent,
    /// The flow already finished
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeOutcome {
    /// Some slot is empty; nothing was sent
    Incomplete,
    /// Wrong or expired code, or the session could not be saved
    Rejected,
    SignupRequired,
    Authenticated,
    /// Not waiting for a code
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResendOutcome {
    CoolingDown { remaining: u32 },
    Resent(PhoneOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Phone(PhoneOutcome),
    Code(CodeOutcome),
    Ignored,
}

pub struct LoginController {
    deps: LoginDeps,
    settings: LoginSettings,
    timer: TimerService,
    inputs: CodeInputs,
    draft: SessionDraft,
    step: LoginStep,
}

impl LoginController {
    pub fn new(deps: LoginDeps, timer: TimerService, settings: LoginSettings) -> Self {
        Self {
            deps,
            settings,
            timer,
            inputs: CodeInputs::new(),
            draft: SessionDraft::new(),
            step: LoginStep::PhoneEntry,
        }
    }

    // ------------------------------------------------------------------
    // State access
    // ------------------------------------------------------------------

    pub fn step(&self) -> LoginStep {
        self.step
    }

    pub fn draft(&self) -> &SessionDraft {
        &self.draft
    }

    pub fn settings(&self) -> &LoginSettings {
        &self.settings
    }

    /// Seconds until resend is allowed
    pub fn countdown(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn can_resend(&self) -> bool {
        self.timer.remaining() == 0
    }

    pub fn countdown_updates(&self) -> watch::Receiver<u32> {
        self.timer.subscribe()
    }

    pub fn is_code_complete(&self) -> bool {
        self.draft.is_code_complete()
    }

    /// Slot handles, for the front end to mount into
    pub fn inputs_mut(&mut self) -> &mut CodeInputs {
        &mut self.inputs
    }

    pub fn focused_slot(&self) -> Option<usize> {
        self.inputs.focused()
    }

    // ------------------------------------------------------------------
    // Phone
    // ------------------------------------------------------------------

    /// Phone field input: keeps ASCII digits only. The number is fixed
    /// once a code is sent; go through `edit_phone` to change it.
    pub fn set_phone(&mut self, raw: &str) {
        if self.step != LoginStep::PhoneEntry {
            return;
        }
        self.draft.phone = filter_phone_input(raw);
    }

    /// Validate `phone` and ask the backend to send a code to it.
    /// Only acts in `PhoneEntry`; a new code for the same number goes
    /// through `resend_code`.
    pub async fn submit_phone(&mut self, phone: &str) -> PhoneOutcome {
        if self.step != LoginStep::PhoneEntry {
            return PhoneOutcome::Ignored;
        }
        self.draft.phone = phone.to_string();
        self.send_code().await
    }

    async fn send_code(&mut self) -> PhoneOutcome {
        if !is_valid_phone(&self.draft.phone) {
            self.draft.phone_error = Some(messages::INVALID_PHONE.to_string());
            return PhoneOutcome::Invalid;
        }
        self.draft.phone_error = None;
        self.draft.loading = true;

        let masked = mask_phone(&self.draft.phone);
        let result = self.deps.accounts.send_code(&self.draft.phone).await;
        self.draft.loading = false;

        match result {
            Ok(()) => {
                info!(phone = %masked, "Verification code sent");
                self.step = LoginStep::CodeVerification;
                self.draft.verification_visible = true;
                self.draft.edit_phone_visible = true;
                self.timer.start(self.settings.resend_cooldown_secs);
                self.draft.reset_code();
                self.inputs.focus(0);
                PhoneOutcome::CodeSent
            }
            Err(e) => {
                error!(phone = %masked, "Send code error: {}", e);
                self.draft.phone_error = Some(messages::SEND_FAILED.to_string());
                PhoneOutcome::SendFailed
            }
        }
    }

    /// Back from code entry to phone entry
    pub fn edit_phone(&mut self) {
        if self.step != LoginStep::CodeVerification {
            return;
        }
        self.step = LoginStep::PhoneEntry;
        self.draft.verification_visible = false;
        self.draft.edit_phone_visible = false;
        self.timer.reset();
        self.draft.reset_code();
        self.inputs.blur();
    }

    /// Request a fresh code once the cooldown has run out
    pub async fn resend_code(&mut self) -> ResendOutcome {
        if self.step != LoginStep::CodeVerification {
            return ResendOutcome::Resent(PhoneOutcome::Ignored);
        }
        let remaining = self.timer.remaining();
        if remaining > 0 {
            return ResendOutcome::CoolingDown { remaining };
        }
        ResendOutcome::Resent(self.send_code().await)
    }

    // ------------------------------------------------------------------
    // Code
    // ------------------------------------------------------------------

    /// Verify the entered code and hand off to signup or the dashboard
    pub async fn submit_code(&mut self) -> CodeOutcome {
        if self.step != LoginStep::CodeVerification {
            return CodeOutcome::Ignored;
        }

        let Some(code) = self.draft.code.code() else {
            self.draft.code_error = Some(CodeError::persistent(messages::INCOMPLETE_CODE));
            return CodeOutcome::Incomplete;
        };

        self.draft.loading = true;
        self.draft.code_error = None;

        let result = self
            .deps
            .accounts
            .verify_code(&self.draft.phone, &code)
            .await
            .and_then(Verification::try_from);
        self.draft.loading = false;

        let masked = mask_phone(&self.draft.phone);
        let verification = match result {
            Ok(verification) => verification,
            Err(e) => {
                error!(phone = %masked, "Verify code error: {}", e);
                let message = e.server_message().unwrap_or(messages::INVALID_CODE).to_string();
                self.show_code_error(message);
                return CodeOutcome::Rejected;
            }
        };

        match verification {
            Verification::NewUser { registration_token } => {
                let saved = self.deps.tokens.set_many(&[
                    (REGISTRATION_TOKEN, registration_token.as_str()),
                    (PHONE_FOR_SIGNUP, self.draft.phone.as_str()),
                ]);
                if let Err(e) = saved {
                    error!("Failed to store registration token: {}", e);
                    self.show_code_error(messages::SESSION_SAVE_FAILED.to_string());
                    return CodeOutcome::Rejected;
                }

                info!(phone = %masked, "New user verified, continuing to signup");
                self.finish(LoginStep::SignupRequired, Destination::Signup);
                CodeOutcome::SignupRequired
            }
            Verification::ExistingUser { tokens } => {
                let saved = self.deps.tokens.set_many(&[
                    (ACCESS_TOKEN, tokens.access.as_str()),
                    (REFRESH_TOKEN, tokens.refresh.as_str()),
                ]);
                if let Err(e) = saved {
                    error!("Failed to store auth tokens: {}", e);
                    self.show_code_error(messages::SESSION_SAVE_FAILED.to_string());
                    return CodeOutcome::Rejected;
                }

                info!(phone = %masked, "User signed in");
                self.finish(LoginStep::Authenticated, Destination::Dashboard);
                CodeOutcome::Authenticated
            }
        }
    }

    /// Form submit: phone in the first step, code in the second
    pub async fn handle_submit(&mut self) -> SubmitOutcome {
        match self.step {
            LoginStep::PhoneEntry => SubmitOutcome::Phone(self.send_code().await),
            LoginStep::CodeVerification => SubmitOutcome::Code(self.submit_code().await),
            LoginStep::SignupRequired | LoginStep::Authenticated => SubmitOutcome::Ignored,
        }
    }

    fn show_code_error(&mut self, message: String) {
        let expires_at = Instant::now() + self.settings.code_error_display;
        self.draft.code_error = Some(CodeError::until(message, expires_at));
    }

    fn finish(&mut self, step: LoginStep, destination: Destination) {
        self.step = step;
        self.timer.cancel();
        self.inputs.blur();
        self.deps.navigator.navigate(destination);
    }

    // ------------------------------------------------------------------
    // Digit entry
    // ------------------------------------------------------------------

    /// Input event on slot `index` with the field's new `value`
    pub fn input_digit(&mut self, index: usize, value: &str) {
        if index >= CODE_LENGTH {
            return;
        }

        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (None, _) => self.draft.code.clear_slot(index),
            (Some(c), None) => {
                if self.draft.code.set(index, c) {
                    if index < CODE_LENGTH - 1 {
                        self.inputs.focus(index + 1);
                    }
                } else {
                    self.draft.code.clear_slot(index);
                }
            }
            // Autofill or multi-character insert
            (Some(_), Some(_)) => {
                let written = self.draft.code.distribute(value);
                if written == 0 {
                    self.draft.code.clear_slot(index);
                } else {
                    self.inputs.focus(written.min(CODE_LENGTH - 1));
                }
            }
        }
    }

    /// Paste into the code inputs: digits fill from slot 0
    pub fn paste_code(&mut self, text: &str) {
        let written = self.draft.code.distribute(text);
        if written > 0 {
            self.inputs.focus(written - 1);
        }
    }

    /// Backspace on slot `index`. Returns true when handled here, meaning the
    /// front end should suppress the default key action.
    pub fn backspace(&mut self, index: usize) -> bool {
        if index == 0 || index >= CODE_LENGTH || !self.draft.code.is_empty_at(index) {
            return false;
        }
        self.draft.code.clear_slot(index - 1);
        self.inputs.focus(index - 1);
        true
    }
}

