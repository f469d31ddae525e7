//! Password reset token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime of a password reset token.
pub const TOKEN_TTL_SECONDS: i64 = 5 * 60;

/// Audience marker scoping tokens to the password reset flow.
pub const PASSWORD_RESET_AUDIENCE: &str = "password-reset";

/// Value of the `purpose` claim.
pub const PURPOSE_PASSWORD_RESET: &str = "password_reset";

/// Claims carried by a password reset token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PasswordResetClaims {
    // Standard JWT claims
    pub iss: String,
    pub sub: String,
    pub aud: Vec<String>,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,

    // Custom claims
    pub email: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub purpose: String,
}

impl PasswordResetClaims {
    /// Claims for `user_id` issued at `issued_at`, with a fresh `jti`.
    pub fn new(
        issuer: impl Into<String>,
        user_id: impl Into<String>,
        email: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let user_id = user_id.into();
        let iat = issued_at.timestamp();
        PasswordResetClaims {
            iss: issuer.into(),
            sub: user_id.clone(),
            aud: vec![PASSWORD_RESET_AUDIENCE.to_string()],
            jti: uuid::Uuid::new_v4().to_string(),
            iat,
            exp: iat + TOKEN_TTL_SECONDS,
            email: email.into(),
            user_id,
            purpose: PURPOSE_PASSWORD_RESET.to_string(),
        }
    }

    pub fn is_expired_at(&self, timestamp: i64) -> bool {
        timestamp > self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_creation() {
        let now = Utc::now();
        let claims = PasswordResetClaims::new("identity-service", "u1", "a@b.com", now);

        assert_eq!(claims.iss, "identity-service");
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.aud, vec!["password-reset".to_string()]);
        assert_eq!(claims.purpose, "password_reset");
        assert_eq!(claims.exp - claims.iat, 300);
        assert!(uuid::Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let claims = PasswordResetClaims::new("iss", "u1", "a@b.com", now);

        assert!(!claims.is_expired_at((now + Duration::minutes(5)).timestamp()));
        assert!(claims.is_expired_at((now + Duration::minutes(5) + Duration::seconds(1)).timestamp()));
    }

    #[test]
    fn test_wire_field_names() {
        let claims = PasswordResetClaims::new("iss", "u1", "a@b.com", Utc::now());
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["userId"], "u1");
        assert_eq!(json["email"], "a@b.com");
        assert!(json.get("user_id").is_none());
    }
}
