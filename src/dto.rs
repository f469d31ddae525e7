//! Request and response bodies for the password reset flows.

use crate::error::IdentityError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Minimum accepted password length.
pub const PASSWORD_MIN_LEN: usize = 4;
/// Maximum accepted password length.
pub const PASSWORD_MAX_LEN: usize = 30;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// A single rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub code: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, code: &'static str) -> Self {
        FieldError { field, code }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn into_result(errors: Vec<FieldError>) -> Result<(), IdentityError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(IdentityError::Validation(errors))
    }
}

/// Body of the "forgot password" request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

impl ForgotPasswordRequest {
    /// Check fields, reporting every failure.
    pub fn validate(&self) -> Result<(), IdentityError> {
        let mut errors = Vec::new();
        if is_blank(&self.email) {
            errors.push(FieldError::new("email", "EMAIL_REQUIRED"));
        } else if !EMAIL_PATTERN.is_match(self.email.trim()) {
            errors.push(FieldError::new("email", "EMAIL_INVALID"));
        }
        into_result(errors)
    }
}

/// Body of the "is this reset link still usable" request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResetTokenRequest {
    #[serde(default)]
    pub token: String,
}

impl ValidateResetTokenRequest {
    pub fn validate(&self) -> Result<(), IdentityError> {
        let mut errors = Vec::new();
        if is_blank(&self.token) {
            errors.push(FieldError::new("token", "TOKEN_REQUIRED"));
        }
        into_result(errors)
    }
}

/// Body of the password reset submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> Result<(), IdentityError> {
        let mut errors = Vec::new();

        if is_blank(&self.token) {
            errors.push(FieldError::new("token", "TOKEN_REQUIRED"));
        }

        let password_len = self.new_password.chars().count();
        if is_blank(&self.new_password) {
            errors.push(FieldError::new("newPassword", "PASSWORD_REQUIRED"));
        } else if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password_len) {
            errors.push(FieldError::new("newPassword", "PASSWORD_INVALID"));
        }

        if is_blank(&self.confirm_password) {
            errors.push(FieldError::new("confirmPassword", "CONFIRM_PASSWORD_REQUIRED"));
        } else if !is_blank(&self.new_password) && self.new_password != self.confirm_password {
            errors.push(FieldError::new("confirmPassword", "PASSWORD_NOT_MATCH"));
        }

        into_result(errors)
    }
}

/// Answer to [`ValidateResetTokenRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResetTokenResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub message: String,
}
