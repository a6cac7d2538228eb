//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use super::{ApiRequest, Method, Transport};
use crate::error::FulfillmentError;

/// Talks to the fulfillment API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport with a default client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a transport whose requests time out after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FulfillmentError> {
        let base_url = base_url.into();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FulfillmentError::ClientSetup(e.to_string()))?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, FulfillmentError> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Patch => self.http.patch(&url),
        };
        builder = builder.header(AUTHORIZATION, request.token.bearer_header());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FulfillmentError::Transport {
                method: request.method,
                path: request.path.clone(),
                reason: e.to_string(),
            })?;

        read_json(response, request.method, &request.path).await
    }
}

/// Reads a JSON body, turning non-success statuses into errors.
///
/// An empty success body decodes to `null`.
pub(crate) async fn read_json(
    response: reqwest::Response,
    method: Method,
    path: &str,
) -> Result<Value, FulfillmentError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| FulfillmentError::Transport {
            method,
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    if !status.is_success() {
        return Err(FulfillmentError::Status {
            status: status.as_u16(),
            method,
            path: path.to_string(),
            body: text,
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| FulfillmentError::Decode {
        method,
        path: path.to_string(),
        reason: e.to_string(),
    })
}
