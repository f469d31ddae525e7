//! Facebook login: authorization code exchange and profile fetch.

use crate::config::FacebookConfig;
use crate::error::IdentityError;
use crate::metrics;
use crate::oauth::models::{FbTokenResponse, FbUserInfoResponse};
use reqwest::{Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

const USER_AGENT: &str = "identity-service/0.1";

/// Client for the Facebook Graph API.
#[derive(Debug, Clone)]
pub struct FacebookClient {
    http: Client,
    config: FacebookConfig,
}

impl FacebookClient {
    /// Build a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: FacebookConfig) -> Result<Self, IdentityError> {
        let http = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(USER_AGENT)
            .use_rustls_tls()
            .build()
            .map_err(|e| IdentityError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.graph_url.trim_end_matches('/'),
            self.config.api_version,
            path
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn get_access_token(&self, code: &str) -> Result<FbTokenResponse, IdentityError> {
        let response = self
            .http
            .get(self.endpoint("oauth/access_token"))
            .query(&[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_secret", self.config.client_secret.expose_secret()),
                ("code", code),
            ])
            .send()
            .await;

        read_json("access_token", response).await
    }

    /// Fetch the profile behind an access token.
    pub async fn get_user_info(
        &self,
        access_token: &str,
    ) -> Result<FbUserInfoResponse, IdentityError> {
        let response = self
            .http
            .get(self.endpoint("me"))
            .query(&[
                ("fields", self.config.user_fields.as_str()),
                ("access_token", access_token),
            ])
            .send()
            .await;

        read_json("user_info", response).await
    }

    /// Run the whole login exchange for an authorization code.
    pub async fn exchange_code(&self, code: &str) -> Result<FbUserInfoResponse, IdentityError> {
        let token = self.get_access_token(code).await?;
        let profile = self.get_user_info(&token.access_token).await?;
        debug!(fb_user_id = %profile.id, "Fetched Facebook profile");
        Ok(profile)
    }
}

async fn read_json<T: DeserializeOwned>(
    operation: &str,
    response: Result<Response, reqwest::Error>,
) -> Result<T, IdentityError> {
    let response = response.map_err(|e| {
        warn!(operation, error = %e, "Facebook request failed");
        metrics::record_oauth_request(operation, "error");
        IdentityError::from(e.without_url())
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(operation, status = status.as_u16(), body = %body, "Facebook returned an error");
        metrics::record_oauth_request(operation, "error");
        return Err(IdentityError::oauth(format!(
            "{} failed with status {}",
            operation,
            status.as_u16()
        )));
    }

    match response.json::<T>().await {
        Ok(value) => {
            metrics::record_oauth_request(operation, "success");
            Ok(value)
        }
        Err(e) => {
            warn!(operation, error = %e, "Failed to decode Facebook response");
            metrics::record_oauth_request(operation, "error");
            Err(IdentityError::from(e.without_url()))
        }
    }
}
