//! Transport seam between the workflow engine and the fulfillment API.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use common::AuthToken;
use serde_json::Value;

use crate::error::FulfillmentError;

pub use http::HttpTransport;
pub use memory::InMemoryTransport;

/// HTTP methods used by the fulfillment API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single authenticated call against the fulfillment API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,

    /// Path relative to the API base URL, e.g. `/pickjobs/pj-1`.
    pub path: String,

    pub query: Vec<(String, String)>,
    pub token: AuthToken,
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>, token: &AuthToken, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            token: token.clone(),
            body,
        }
    }

    pub fn get(path: impl Into<String>, token: &AuthToken) -> Self {
        Self::new(Method::Get, path, token, None)
    }

    pub fn post(path: impl Into<String>, token: &AuthToken, body: Value) -> Self {
        Self::new(Method::Post, path, token, Some(body))
    }

    pub fn patch(path: impl Into<String>, token: &AuthToken, body: Value) -> Self {
        Self::new(Method::Patch, path, token, Some(body))
    }

    /// Appends a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Returns the value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sends requests to the fulfillment API and returns the decoded JSON body.
///
/// Implementations forward the bearer token, map non-success statuses to
/// [`FulfillmentError::Status`] and connection failures to
/// [`FulfillmentError::Transport`]. They never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, FulfillmentError>;
}
