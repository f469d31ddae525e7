//! Password reset token verification.
//!
//! Checks run in a fixed order and stop at the first failure:
//! structure, signature, expiry, purpose, audience, required claims.
//! Only expiry is reported distinctly; every other failure is
//! [`ResetTokenError::TokenInvalid`].

use crate::error::ResetTokenError;
use crate::metrics;
use crate::reset::claims::{PASSWORD_RESET_AUDIENCE, PURPOSE_PASSWORD_RESET};
use crate::reset::keys::KeyMaterial;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Data proven by a valid password reset token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTokenData {
    pub user_id: String,
    pub email: String,
}

/// Audience may be a single string or an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Audience {
    Single(String),
    Many(Vec<String>),
}

impl Audience {
    fn contains(&self, marker: &str) -> bool {
        match self {
            Audience::Single(aud) => aud == marker,
            Audience::Many(auds) => auds.iter().any(|aud| aud == marker),
        }
    }
}

/// Signature-checked payload; every claim is still untrusted.
#[derive(Debug, Deserialize)]
struct UnverifiedClaims {
    sub: Option<String>,
    exp: Option<i64>,
    aud: Option<Audience>,
    purpose: Option<String>,
    email: Option<String>,
}

/// Verifies password reset tokens with the process public key.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    keys: Arc<KeyMaterial>,
}

impl TokenVerifier {
    pub fn new(keys: Arc<KeyMaterial>) -> Self {
        TokenVerifier { keys }
    }

    /// Validate `token` against the current time.
    pub fn validate(&self, token: &str) -> Result<ValidatedTokenData, ResetTokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate `token` as if the current time were `now`.
    pub fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<ValidatedTokenData, ResetTokenError> {
        let result = self.run_checks(token, now.timestamp());
        match &result {
            Ok(data) => {
                info!(user_id = %data.user_id, "Validated password reset token");
                metrics::record_token_validation("valid");
            }
            Err(err) => metrics::record_token_validation(err.outcome()),
        }
        result
    }

    fn run_checks(&self, token: &str, now: i64) -> Result<ValidatedTokenData, ResetTokenError> {
        // 1. structure
        if let Err(e) = decode_header(token) {
            warn!(error = %e, "Failed to parse password reset token");
            return Err(ResetTokenError::TokenInvalid);
        }

        // 2. signature; claim checks below are done by hand to keep their order
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = decode::<UnverifiedClaims>(token, self.keys.decoding_key(), &validation)
            .map_err(|e| {
                warn!(error = %e, "Password reset token failed signature verification");
                ResetTokenError::TokenInvalid
            })?
            .claims;

        // 3. expiry
        match claims.exp {
            Some(exp) if now <= exp => {}
            _ => {
                warn!("Password reset token has expired");
                return Err(ResetTokenError::TokenExpired);
            }
        }

        // 4. purpose
        if claims.purpose.as_deref() != Some(PURPOSE_PASSWORD_RESET) {
            warn!("Invalid purpose claim in password reset token");
            return Err(ResetTokenError::TokenInvalid);
        }

        // 5. audience
        if !claims
            .aud
            .as_ref()
            .is_some_and(|aud| aud.contains(PASSWORD_RESET_AUDIENCE))
        {
            warn!("Invalid audience in password reset token");
            return Err(ResetTokenError::TokenInvalid);
        }

        // 6. required claims
        match (claims.sub, claims.email) {
            (Some(user_id), Some(email)) if !user_id.is_empty() && !email.is_empty() => {
                Ok(ValidatedTokenData { user_id, email })
            }
            _ => {
                warn!("Missing required claims in password reset token");
                Err(ResetTokenError::TokenInvalid)
            }
        }
    }
}
