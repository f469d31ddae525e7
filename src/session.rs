//! Session cookie assembly.

use crate::config::CookieConfig;
use cookie::{Cookie, CookieBuilder};

/// Name of the session JWT cookie.
pub const JWT_COOKIE_NAME: &str = "jwt";

/// Lifetime of the session cookie.
pub const JWT_COOKIE_MAX_AGE: time::Duration = time::Duration::days(1);

/// Builds `Set-Cookie` values for the session JWT.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    config: CookieConfig,
}

impl SessionCookies {
    pub fn new(config: CookieConfig) -> Self {
        SessionCookies { config }
    }

    /// Cookie carrying `token` for one day.
    pub fn jwt_cookie(&self, token: impl Into<String>) -> Cookie<'static> {
        self.builder(token.into())
            .max_age(JWT_COOKIE_MAX_AGE)
            .build()
    }

    /// Cookie that clears the session on the client.
    pub fn expired_jwt_cookie(&self) -> Cookie<'static> {
        self.builder(String::new())
            .max_age(time::Duration::ZERO)
            .build()
    }

    fn builder(&self, value: String) -> CookieBuilder<'static> {
        let mut builder = Cookie::build((JWT_COOKIE_NAME, value))
            .http_only(true)
            .secure(self.config.secure)
            .path("/");

        if let Some(same_site) = self.config.same_site {
            builder = builder.same_site(same_site);
        }

        if let Some(domain) = self
            .config
            .domain
            .as_deref()
            .map(str::trim)
            .filter(|domain| !domain.is_empty())
        {
            builder = builder.domain(domain.to_string());
        }

        builder
    }
}
