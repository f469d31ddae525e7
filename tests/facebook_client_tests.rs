//! Facebook login client against a mock Graph API.

use identity_service::config::FacebookConfig;
use identity_service::oauth::FacebookClient;
use identity_service::IdentityError;
use secrecy::SecretString;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> FacebookClient {
    FacebookClient::new(FacebookConfig {
        client_id: "app-id".to_string(),
        client_secret: SecretString::from("app-secret".to_string()),
        redirect_uri: "https://example.com/callback".to_string(),
        graph_url: server.uri(),
        api_version: "v17.0".to_string(),
        user_fields: "id,name,email,picture".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_get_access_token_sends_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v17.0/oauth/access_token"))
        .and(query_param("client_id", "app-id"))
        .and(query_param("client_secret", "app-secret"))
        .and(query_param("redirect_uri", "https://example.com/callback"))
        .and(query_param("code", "auth-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fb-token",
            "token_type": "bearer",
            "expires_in": 5183944
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = client_for(&server).get_access_token("auth-code").await.unwrap();

    assert_eq!(token.access_token, "fb-token");
    assert_eq!(token.token_type.as_deref(), Some("bearer"));
    assert_eq!(token.expires_in, Some(5183944));
}

#[tokio::test]
async fn test_get_user_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v17.0/me"))
        .and(query_param("fields", "id,name,email,picture"))
        .and(query_param("access_token", "fb-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1234",
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "picture": {"data": {"height": 50, "is_silhouette": false, "url": "https://cdn.example.com/ada.jpg", "width": 50}}
        })))
        .mount(&server)
        .await;

    let profile = client_for(&server).get_user_info("fb-token").await.unwrap();

    assert_eq!(profile.id, "1234");
    assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
    assert_eq!(profile.picture_url(), Some("https://cdn.example.com/ada.jpg"));
}

#[tokio::test]
async fn test_exchange_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v17.0/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "fb-token"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v17.0/me"))
        .and(query_param("access_token", "fb-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1234"})))
        .mount(&server)
        .await;

    let profile = client_for(&server).exchange_code("auth-code").await.unwrap();

    assert_eq!(profile.id, "1234");
    assert!(profile.name.is_none());
}

#[tokio::test]
async fn test_provider_error_not_echoed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v17.0/oauth/access_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "Invalid verification code format.", "type": "OAuthException"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).get_access_token("bad").await.unwrap_err();

    match &err {
        IdentityError::OAuth(msg) => {
            assert!(msg.contains("400"));
            assert!(!msg.contains("verification code"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.code().http_status(), 502);
}

#[tokio::test]
async fn test_malformed_body_is_oauth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v17.0/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_user_info("fb-token").await.unwrap_err();

    assert!(matches!(err, IdentityError::OAuth(_)));
    assert!(!err.to_string().contains("fb-token"));
}
