//! Identity Service library.
//!
//! Provides password reset token issuance and verification, session cookie
//! assembly and Facebook login.

#![forbid(unsafe_code)]

pub mod config;
pub mod context;
pub mod dto;
pub mod error;
pub mod metrics;
pub mod oauth;
pub mod observability;
pub mod reset;
pub mod session;

// Re-exports for convenience
pub use config::Config;
pub use context::IdentityContext;
pub use error::{IdentityError, ResetTokenError};
pub use reset::{KeyMaterial, PasswordResetService, TokenIssuer, TokenVerifier, ValidatedTokenData};
