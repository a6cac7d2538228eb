//! Bearer token acquisition.

use async_trait::async_trait;
use common::AuthToken;
use contracts::{Contract, TokenRequest, TokenResponse};

use crate::error::{FulfillmentError, Result};
use crate::transport::Method;
use crate::transport::http::read_json;

/// Supplies the bearer token used for fulfillment API calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<AuthToken>;
}

/// Exchanges client credentials for a token at the identity provider.
pub struct HttpIdentityClient {
    http: reqwest::Client,
    identity_url: String,
    client_id: String,
    client_secret: String,
}

impl HttpIdentityClient {
    pub fn new(
        identity_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::with_client(reqwest::Client::new(), identity_url, client_id, client_secret)
    }

    pub fn with_client(
        http: reqwest::Client,
        identity_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            identity_url: identity_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl std::fmt::Debug for HttpIdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpIdentityClient")
            .field("identity_url", &self.identity_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for HttpIdentityClient {
    #[tracing::instrument(skip(self), fields(client_id = %self.client_id))]
    async fn token(&self) -> Result<AuthToken> {
        let body = TokenRequest::new(&self.client_id, &self.client_secret).validated()?;

        let response = self
            .http
            .post(&self.identity_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FulfillmentError::Transport {
                method: Method::Post,
                path: self.identity_url.clone(),
                reason: e.to_string(),
            })?;
        let value = read_json(response, Method::Post, &self.identity_url).await?;
        let token = TokenResponse::parse(&value)?;

        tracing::info!("Bearer token acquired");
        Ok(AuthToken::new(token.id_token))
    }
}

/// Hands out a token acquired elsewhere.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AuthToken,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AuthToken::new(token),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<AuthToken> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_returns_its_token() {
        let provider = StaticTokenProvider::new("abc");
        assert_eq!(provider.token().await.unwrap().expose(), "abc");
    }

    #[test]
    fn test_debug_hides_client_secret() {
        let client = HttpIdentityClient::new("http://identity", "client", "hunter2");
        let debug = format!("{client:?}");
        assert!(debug.contains("client"));
        assert!(!debug.contains("hunter2"));
    }

    #[tokio::test]
    async fn test_empty_credentials_fail_before_sending() {
        let client = HttpIdentityClient::new("http://127.0.0.1:1/unreachable", "", "");
        let err = client.token().await.unwrap_err();
        assert!(err.is_contract_violation());
    }
}
