//! Password reset tokens: key material, claims, issuance and verification.

pub mod claims;
pub mod issuer;
pub mod keys;
pub mod service;
pub mod verifier;

pub use claims::{PasswordResetClaims, PASSWORD_RESET_AUDIENCE, PURPOSE_PASSWORD_RESET, TOKEN_TTL_SECONDS};
pub use issuer::TokenIssuer;
pub use keys::{KeyMaterial, MIN_KEY_BITS};
pub use service::PasswordResetService;
pub use verifier::{TokenVerifier, ValidatedTokenData};
