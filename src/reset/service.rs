//! Password reset flows built on the token issuer and verifier.

use crate::dto::{ResetPasswordRequest, ValidateResetTokenRequest, ValidateResetTokenResponse};
use crate::error::{ErrorCode, IdentityError, ResetTokenError};
use crate::reset::issuer::TokenIssuer;
use crate::reset::keys::KeyMaterial;
use crate::reset::verifier::{TokenVerifier, ValidatedTokenData};
use std::sync::Arc;

/// Message returned with a usable reset link.
pub const TOKEN_VALID_MESSAGE: &str = "Token is valid";

/// Issues reset tokens and checks them at the request boundary.
#[derive(Debug, Clone)]
pub struct PasswordResetService {
    issuer: TokenIssuer,
    verifier: TokenVerifier,
}

impl PasswordResetService {
    pub fn new(keys: Arc<KeyMaterial>, issuer: impl Into<String>) -> Self {
        PasswordResetService {
            issuer: TokenIssuer::new(Arc::clone(&keys), issuer),
            verifier: TokenVerifier::new(keys),
        }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Issue a reset token for delivery in a reset link.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<String, ResetTokenError> {
        self.issuer.generate(user_id, email)
    }

    /// Tell the client whether a reset link can still be used.
    ///
    /// The message never says why a token was rejected beyond expiry.
    pub fn check(&self, request: &ValidateResetTokenRequest) -> ValidateResetTokenResponse {
        if request.validate().is_err() {
            return rejected(ErrorCode::ResetTokenInvalid);
        }

        match self.verifier.validate(request.token.trim()) {
            Ok(data) => ValidateResetTokenResponse {
                valid: true,
                email: Some(data.email),
                message: TOKEN_VALID_MESSAGE.to_string(),
            },
            Err(err) => rejected(err.code()),
        }
    }

    /// Validate a reset submission and return whose credential may change.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Validation`] for bad fields, otherwise the token failure.
    pub fn authorize_reset(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<ValidatedTokenData, IdentityError> {
        request.validate()?;
        Ok(self.verifier.validate(request.token.trim())?)
    }
}

fn rejected(code: ErrorCode) -> ValidateResetTokenResponse {
    ValidateResetTokenResponse {
        valid: false,
        email: None,
        message: code.public_message().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reset::keys::test_keys;

    fn service() -> PasswordResetService {
        PasswordResetService::new(test_keys(), "identity-service")
    }

    #[test]
    fn test_check_valid_token() {
        let service = service();
        let token = service.issue("u1", "a@b.com").unwrap();

        let response = service.check(&ValidateResetTokenRequest { token });
        assert!(response.valid);
        assert_eq!(response.email.as_deref(), Some("a@b.com"));
        assert_eq!(response.message, TOKEN_VALID_MESSAGE);
    }

    #[test]
    fn test_check_blank_token() {
        let response = service().check(&ValidateResetTokenRequest {
            token: " ".to_string(),
        });
        assert!(!response.valid);
        assert!(response.email.is_none());
    }

    #[test]
    fn test_authorize_reset() {
        let service = service();
        let token = service.issue("u1", "a@b.com").unwrap();

        let data = service
            .authorize_reset(&ResetPasswordRequest {
                token,
                new_password: "newpass".to_string(),
                confirm_password: "newpass".to_string(),
            })
            .unwrap();
        assert_eq!(data.user_id, "u1");
    }

    #[test]
    fn test_authorize_reset_validates_fields_first() {
        let result = service().authorize_reset(&ResetPasswordRequest {
            token: "not-a-token".to_string(),
            new_password: "abc".to_string(),
            confirm_password: "abc".to_string(),
        });
        assert!(matches!(result, Err(IdentityError::Validation(_))));
    }

    #[test]
    fn test_authorize_reset_invalid_token() {
        let result = service().authorize_reset(&ResetPasswordRequest {
            token: "not-a-token".to_string(),
            new_password: "abcd".to_string(),
            confirm_password: "abcd".to_string(),
        });
        assert!(matches!(
            result,
            Err(IdentityError::ResetToken(ResetTokenError::TokenInvalid))
        ));
    }
}
