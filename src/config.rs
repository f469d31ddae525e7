//! Centralized configuration for the identity service.
//!
//! All configuration is loaded from environment variables and validated
//! at startup.

use crate::error::IdentityError;
use crate::reset::MIN_KEY_BITS;
use cookie::SameSite;
use std::env;
use secrecy::SecretString;
use std::time::Duration;

/// Default `iss` claim on password reset tokens.
pub const DEFAULT_ISSUER: &str = "AI-PhotoFun-Studio";

/// Default Facebook Graph API base URL.
pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com";

/// Password reset token settings.
#[derive(Debug, Clone)]
pub struct ResetTokenConfig {
    /// Issuer claim
    pub issuer: String,
    /// RSA modulus size for the process signing key
    pub key_bits: usize,
}

impl Default for ResetTokenConfig {
    fn default() -> Self {
        Self {
            issuer: DEFAULT_ISSUER.to_string(),
            key_bits: MIN_KEY_BITS,
        }
    }
}

/// Session cookie attributes.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// Set the `Secure` attribute
    pub secure: bool,
    /// `SameSite` attribute, omitted when unset
    pub same_site: Option<SameSite>,
    /// `Domain` attribute, omitted when unset
    pub domain: Option<String>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: true,
            same_site: None,
            domain: None,
        }
    }
}

/// Facebook login settings.
#[derive(Debug, Clone)]
pub struct FacebookConfig {
    /// App client ID
    pub client_id: String,
    /// App client secret
    pub client_secret: SecretString,
    /// Redirect URI registered with the app
    pub redirect_uri: String,
    /// Graph API base URL
    pub graph_url: String,
    /// Graph API version path segment
    pub api_version: String,
    /// Profile fields requested from `/me`
    pub user_fields: String,
    /// Request timeout
    pub timeout: Duration,
}

/// Identity service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON logs
    pub log_json: bool,
    /// Password reset tokens
    pub reset_token: ResetTokenConfig,
    /// Session cookies
    pub cookie: CookieConfig,
    /// Facebook login, disabled when credentials are absent
    pub facebook: Option<FacebookConfig>,
}

impl Config {
    /// Load configuration from `.env` and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if variables are present but invalid.
    pub fn from_env() -> Result<Self, IdentityError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IdentityError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_json = parse_var(&lookup, "LOG_JSON", false)?;

        let key_bits = parse_var(&lookup, "RESET_TOKEN_KEY_BITS", MIN_KEY_BITS)?;
        if key_bits < MIN_KEY_BITS {
            return Err(IdentityError::config(format!(
                "RESET_TOKEN_KEY_BITS must be at least {}, got {}",
                MIN_KEY_BITS, key_bits
            )));
        }
        let reset_token = ResetTokenConfig {
            issuer: non_blank(&lookup, "RESET_TOKEN_ISSUER")
                .unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            key_bits,
        };

        let cookie = CookieConfig {
            secure: parse_var(&lookup, "COOKIE_SECURE", true)?,
            same_site: non_blank(&lookup, "COOKIE_SAME_SITE")
                .map(|value| parse_same_site(&value))
                .transpose()?,
            domain: non_blank(&lookup, "COOKIE_DOMAIN"),
        };

        let timeout = Duration::from_secs(parse_var(&lookup, "HTTP_TIMEOUT_SECS", 10)?);
        let facebook = parse_facebook(&lookup, timeout)?;

        Ok(Self {
            log_level,
            log_json,
            reset_token,
            cookie,
            facebook,
        })
    }
}

/// Parse a variable with a default value.
fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, IdentityError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(val) => val
            .trim()
            .parse()
            .map_err(|e| IdentityError::config(format!("Invalid {}: {}", name, e))),
        None => Ok(default),
    }
}

fn non_blank<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_same_site(value: &str) -> Result<SameSite, IdentityError> {
    match value.to_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" => Ok(SameSite::None),
        _ => Err(IdentityError::config(format!(
            "Invalid COOKIE_SAME_SITE: {}",
            value
        ))),
    }
}

fn parse_facebook<F>(lookup: &F, timeout: Duration) -> Result<Option<FacebookConfig>, IdentityError>
where
    F: Fn(&str) -> Option<String>,
{
    let credentials = (
        non_blank(lookup, "FB_CLIENT_ID"),
        non_blank(lookup, "FB_CLIENT_SECRET"),
        non_blank(lookup, "FB_REDIRECT_URI"),
    );

    match credentials {
        (None, None, None) => Ok(None),
        (Some(client_id), Some(client_secret), Some(redirect_uri)) => Ok(Some(FacebookConfig {
            client_id,
            client_secret: SecretString::from(client_secret),
            redirect_uri,
            graph_url: non_blank(lookup, "FB_GRAPH_URL")
                .unwrap_or_else(|| DEFAULT_GRAPH_URL.to_string()),
            api_version: non_blank(lookup, "FB_API_VERSION").unwrap_or_else(|| "v17.0".to_string()),
            user_fields: non_blank(lookup, "FB_USER_FIELDS")
                .unwrap_or_else(|| "id,name,email,picture".to_string()),
            timeout,
        })),
        _ => Err(IdentityError::config(
            "FB_CLIENT_ID, FB_CLIENT_SECRET and FB_REDIRECT_URI must be set together",
        )),
    }
}
