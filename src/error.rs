//! Error handling for the identity service.
//!
//! Two layers:
//! - [`ResetTokenError`]: the closed set of outcomes a password reset token
//!   operation can fail with.
//! - [`IdentityError`]: everything else the service can fail with (startup,
//!   request validation, social login), wrapping [`ResetTokenError`].
//!
//! [`ErrorResponse`] is the only view that leaves the process. It never carries
//! internal diagnostic text, and an invalid token never says which check failed.

use crate::dto::FieldError;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Failure kinds of password reset token issuance and verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResetTokenError {
    /// Malformed token, bad signature, wrong purpose or audience, missing claims.
    #[error("Password reset token invalid")]
    TokenInvalid,

    /// Sound token whose validity window has passed.
    #[error("Password reset token expired")]
    TokenExpired,

    /// The signing primitive itself failed. Detail stays server-side.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResetTokenError {
    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        ResetTokenError::Internal(msg.into())
    }

    /// Get the public error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::TokenInvalid => ErrorCode::ResetTokenInvalid,
            Self::TokenExpired => ErrorCode::ResetTokenExpired,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::TokenInvalid => "invalid",
            Self::TokenExpired => "expired",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Service-wide error type.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Signing key generation failed. Fatal at startup.
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Request fields failed validation.
    #[error("Request validation failed: {0:?}")]
    Validation(Vec<FieldError>),

    /// The social login provider call failed.
    #[error("OAuth provider error: {0}")]
    OAuth(String),

    /// Password reset token failure.
    #[error(transparent)]
    ResetToken(#[from] ResetTokenError),
}

impl IdentityError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        IdentityError::Config(msg.into())
    }

    /// Create an OAuth provider error.
    #[must_use]
    pub fn oauth(msg: impl Into<String>) -> Self {
        IdentityError::OAuth(msg.into())
    }

    /// Get the public error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Config(_) | Self::KeyGeneration(_) => ErrorCode::Internal,
            Self::Validation(_) => ErrorCode::InvalidRequest,
            Self::OAuth(_) => ErrorCode::OAuthProvider,
            Self::ResetToken(err) => err.code(),
        }
    }

    /// Build the public response for this error.
    pub fn to_response(&self, correlation_id: Uuid) -> ErrorResponse {
        ErrorResponse::from_error(self, correlation_id)
    }
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        IdentityError::OAuth(err.to_string())
    }
}

/// Public error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    /// Reset token rejected.
    #[serde(rename = "PASSWORD_RESET_TOKEN_INVALID")]
    ResetTokenInvalid,
    /// Reset token past its window.
    #[serde(rename = "PASSWORD_RESET_TOKEN_EXPIRED")]
    ResetTokenExpired,
    /// Request fields rejected.
    #[serde(rename = "INVALID_REQUEST")]
    InvalidRequest,
    /// Social login provider failed.
    #[serde(rename = "OAUTH_PROVIDER_ERROR")]
    OAuthProvider,
    /// Anything internal.
    #[serde(rename = "INTERNAL_ERROR")]
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResetTokenInvalid => "PASSWORD_RESET_TOKEN_INVALID",
            Self::ResetTokenExpired => "PASSWORD_RESET_TOKEN_EXPIRED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::OAuthProvider => "OAUTH_PROVIDER_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ResetTokenInvalid | Self::ResetTokenExpired | Self::InvalidRequest => 400,
            Self::OAuthProvider => 502,
            Self::Internal => 500,
        }
    }

    /// Fixed user-facing message for this code.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::ResetTokenInvalid => "This password reset link is not valid",
            Self::ResetTokenExpired => {
                "This password reset link has expired, please request a new one"
            }
            Self::InvalidRequest => "Request validation failed",
            Self::OAuthProvider => "Login provider temporarily unavailable",
            Self::Internal => "Internal error",
        }
    }
}

/// Structured error response with correlation ID
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message, never internal detail
    pub message: String,
    /// Field-level validation codes, only for invalid requests
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
    /// Correlation ID for tracing
    pub correlation_id: Uuid,
}

impl ErrorResponse {
    /// Create a new error response from an [`IdentityError`]
    pub fn from_error(error: &IdentityError, correlation_id: Uuid) -> Self {
        let code = error.code();
        let fields = match error {
            IdentityError::Validation(fields) => fields.clone(),
            _ => Vec::new(),
        };

        ErrorResponse {
            code,
            message: code.public_message().to_string(),
            fields,
            correlation_id,
        }
    }

    /// HTTP status to send with this response.
    pub fn status(&self) -> u16 {
        self.code.http_status()
    }
}
