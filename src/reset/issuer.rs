//! Password reset token issuance.

use crate::error::ResetTokenError;
use crate::metrics;
use crate::reset::claims::PasswordResetClaims;
use crate::reset::keys::KeyMaterial;
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, Header};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Signs password reset tokens with the process private key.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: Arc<KeyMaterial>,
    issuer: String,
}

impl TokenIssuer {
    pub fn new(keys: Arc<KeyMaterial>, issuer: impl Into<String>) -> Self {
        TokenIssuer {
            keys,
            issuer: issuer.into(),
        }
    }

    /// Value of the `iss` claim on issued tokens.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issue a token for `user_id` valid for five minutes from now.
    ///
    /// # Errors
    ///
    /// [`ResetTokenError::Internal`] if either input is empty or signing fails.
    pub fn generate(&self, user_id: &str, email: &str) -> Result<String, ResetTokenError> {
        self.generate_at(user_id, email, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn generate_at(
        &self,
        user_id: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, ResetTokenError> {
        if user_id.is_empty() || email.is_empty() {
            error!("Refusing to issue password reset token with empty subject or email");
            metrics::record_token_issued("error");
            return Err(ResetTokenError::internal(
                "password reset token requires user id and email",
            ));
        }

        let claims = PasswordResetClaims::new(self.issuer.as_str(), user_id, email, now);
        let token = self.sign(&claims)?;

        info!(user_id = %user_id, jti = %claims.jti, "Generated password reset token");
        Ok(token)
    }

    fn sign(&self, claims: &PasswordResetClaims) -> Result<String, ResetTokenError> {
        self.encode_claims(claims)
    }

    /// Sign any payload with the process key, for building malformed tokens.
    #[cfg(test)]
    pub(crate) fn sign_raw<T: Serialize>(&self, claims: &T) -> Result<String, ResetTokenError> {
        self.encode_claims(claims)
    }

    fn encode_claims<T: Serialize>(&self, claims: &T) -> Result<String, ResetTokenError> {
        let mut header = Header::new(Algorithm::RS256);
        header.typ = Some("JWT".to_string());
        header.kid = Some(self.keys.key_id().to_string());

        match encode(&header, claims, self.keys.encoding_key()) {
            Ok(token) => {
                metrics::record_token_issued("success");
                Ok(token)
            }
            Err(e) => {
                error!(error = %e, "Failed to sign password reset token");
                metrics::record_token_issued("error");
                Err(ResetTokenError::internal(e.to_string()))
            }
        }
    }
}
