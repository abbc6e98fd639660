//! In-memory form state for the login flow.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use tokio::time::Instant;

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 5;

lazy_static! {
    // ASCII only: `\d` would also accept Persian and Arabic-Indic digits
    static ref PHONE_REGEX: Regex = Regex::new(r"^09[0-9]{9}$").unwrap();
}

/// Whether `phone` is a mobile number of the form `09XXXXXXXXX`.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Keep only ASCII digits, as the phone field does on input.
pub fn filter_phone_input(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Mask all but the last four digits for logging.
pub fn mask_phone(phone: &str) -> String {
    let visible = phone.chars().count().saturating_sub(4);
    phone
        .chars()
        .enumerate()
        .map(|(i, c)| if i < visible { '*' } else { c })
        .collect()
}

/// Fixed-length sequence of code slots, each empty or a single ASCII digit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeDigits {
    slots: [Option<char>; CODE_LENGTH],
}

impl CodeDigits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    /// Store `digit` in slot `index`. Returns false (and leaves the slot
    /// untouched) for out-of-range slots or non-digits.
    pub fn set(&mut self, index: usize, digit: char) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if digit.is_ascii_digit() => {
                *slot = Some(digit);
                true
            }
            _ => false,
        }
    }

    pub fn clear_slot(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    pub fn clear(&mut self) {
        self.slots = [None; CODE_LENGTH];
    }

    /// Write the digits found in `text` into slots starting at 0.
    ///
    /// Non-digits are skipped and anything past the last slot is dropped.
    /// Slots beyond the pasted digits keep their value. Returns how many
    /// slots were written.
    pub fn distribute(&mut self, text: &str) -> usize {
        let mut written = 0;
        for digit in text.chars().filter(char::is_ascii_digit).take(CODE_LENGTH) {
            self.slots[written] = Some(digit);
            written += 1;
        }
        written
    }

    /// True iff every slot holds a digit.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The joined code, or `None` while any slot is empty.
    pub fn code(&self) -> Option<String> {
        self.slots.iter().copied().collect()
    }
}

impl fmt::Display for CodeDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.slots {
            write!(f, "{}", slot.unwrap_or('_'))?;
        }
        Ok(())
    }
}

/// Error shown under the code field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeError {
    pub message: String,
    /// When set, the error disappears at this instant.
    pub expires_at: Option<Instant>,
}

impl CodeError {
    pub fn persistent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expires_at: None,
        }
    }

    pub fn until(message: impl Into<String>, expires_at: Instant) -> Self {
        Self {
            message: message.into(),
            expires_at: Some(expires_at),
        }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.expires_at.map(|at| now < at).unwrap_or(true)
    }
}

/// Form state of one login attempt.
#[derive(Debug, Clone, Default)]
pub struct SessionDraft {
    pub phone: String,
    pub code: CodeDigits,
    pub phone_error: Option<String>,
    /// Read through `code_error_message` so an expired error stays hidden.
    pub(crate) code_error: Option<CodeError>,
    pub verification_visible: bool,
    pub edit_phone_visible: bool,
    pub loading: bool,
}

impl SessionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_code_complete(&self) -> bool {
        self.code.is_complete()
    }

    /// The code error message, if it is still on display.
    pub fn code_error_message(&self) -> Option<&str> {
        self.code_error
            .as_ref()
            .filter(|e| e.is_active(Instant::now()))
            .map(|e| e.message.as_str())
    }

    /// Whether the code inputs should render in their error style.
    pub fn code_has_visual_error(&self) -> bool {
        self.code_error
            .as_ref()
            .map(|e| e.expires_at.is_some() && e.is_active(Instant::now()))
            .unwrap_or(false)
    }

    pub(crate) fn reset_code(&mut self) {
        self.code.clear();
        self.code_error = None;
    }
}
