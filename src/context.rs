//! Startup composition.
//!
//! [`IdentityContext::initialize`] runs once, before traffic is accepted.
//! An error from it is fatal: the process must not serve password resets
//! without its signing key.

use crate::config::Config;
use crate::error::IdentityError;
use crate::oauth::FacebookClient;
use crate::reset::{KeyMaterial, PasswordResetService};
use crate::session::SessionCookies;
use std::sync::Arc;
use tracing::{error, info};

/// Everything request handlers need, built once at startup.
#[derive(Debug, Clone)]
pub struct IdentityContext {
    pub password_reset: PasswordResetService,
    pub cookies: SessionCookies,
    pub facebook: Option<FacebookClient>,
}

impl IdentityContext {
    /// Generate the signing key and wire the services.
    ///
    /// # Errors
    ///
    /// [`IdentityError::KeyGeneration`] if the RSA key cannot be generated,
    /// [`IdentityError::Config`] if the HTTP client cannot be built.
    pub fn initialize(config: &Config) -> Result<Self, IdentityError> {
        let keys = KeyMaterial::initialize(config.reset_token.key_bits).map_err(|e| {
            error!(error = %e, "Failed to initialize password reset signing key");
            e
        })?;

        Self::with_keys(config, Arc::new(keys))
    }

    /// Wire the services around existing key material.
    pub fn with_keys(config: &Config, keys: Arc<KeyMaterial>) -> Result<Self, IdentityError> {
        let password_reset = PasswordResetService::new(keys, config.reset_token.issuer.as_str());
        let cookies = SessionCookies::new(config.cookie.clone());
        let facebook = config
            .facebook
            .clone()
            .map(FacebookClient::new)
            .transpose()?;

        info!(
            issuer = %config.reset_token.issuer,
            facebook_login = facebook.is_some(),
            "Identity service initialized"
        );

        Ok(Self {
            password_reset,
            cookies,
            facebook,
        })
    }
}
