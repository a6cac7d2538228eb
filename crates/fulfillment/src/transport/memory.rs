//! In-memory transport for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiRequest, Method, Transport};
use crate::error::FulfillmentError;

#[derive(Debug, Clone)]
enum ScriptedResponse {
    Body(Value),
    Status(u16, String),
}

type Route = (Method, String);

#[derive(Debug, Default)]
struct InMemoryTransportState {
    queued: HashMap<Route, VecDeque<ScriptedResponse>>,
    fallback: HashMap<Route, ScriptedResponse>,
    requests: Vec<ApiRequest>,
}

/// Scripted transport: answers each route from a FIFO of prepared responses
/// and records every request it receives.
///
/// Routes are matched on method and path; query parameters are recorded but
/// not matched. A route with nothing queued answers with its fallback, or
/// with HTTP 404 when it has none.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransport {
    state: Arc<RwLock<InMemoryTransportState>>,
}

impl InMemoryTransport {
    /// Creates a new in-memory transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response body for the route.
    pub fn respond(&self, method: Method, path: impl Into<String>, body: Value) {
        self.enqueue(method, path.into(), ScriptedResponse::Body(body));
    }

    /// Queues an HTTP failure for the route.
    pub fn fail(&self, method: Method, path: impl Into<String>, status: u16, body: impl Into<String>) {
        self.enqueue(method, path.into(), ScriptedResponse::Status(status, body.into()));
    }

    /// Sets the response used once the route's queue is drained.
    pub fn respond_always(&self, method: Method, path: impl Into<String>, body: Value) {
        self.state
            .write()
            .unwrap()
            .fallback
            .insert((method, path.into()), ScriptedResponse::Body(body));
    }

    /// Returns every request received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.read().unwrap().requests.clone()
    }

    /// Returns the requests received for one route.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.state
            .read()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    /// Returns the number of requests received.
    pub fn request_count(&self) -> usize {
        self.state.read().unwrap().requests.len()
    }

    fn enqueue(&self, method: Method, path: String, response: ScriptedResponse) {
        self.state
            .write()
            .unwrap()
            .queued
            .entry((method, path))
            .or_default()
            .push_back(response);
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, FulfillmentError> {
        let mut state = self.state.write().unwrap();
        let route = (request.method, request.path.clone());
        let queued = state.queued.get_mut(&route).and_then(VecDeque::pop_front);
        let scripted = queued.or_else(|| state.fallback.get(&route).cloned());
        state.requests.push(request);

        match scripted {
            Some(ScriptedResponse::Body(body)) => Ok(body),
            Some(ScriptedResponse::Status(status, body)) => Err(FulfillmentError::Status {
                status,
                method: route.0,
                path: route.1,
                body,
            }),
            None => Err(FulfillmentError::Status {
                status: 404,
                method: route.0,
                path: route.1,
                body: "no scripted response".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AuthToken;
    use serde_json::json;

    #[tokio::test]
    async fn test_queued_responses_are_served_in_order() {
        let transport = InMemoryTransport::new();
        let token = AuthToken::new("t");
        transport.respond(Method::Get, "/pickjobs", json!({"n": 1}));
        transport.respond(Method::Get, "/pickjobs", json!({"n": 2}));

        let first = transport.send(ApiRequest::get("/pickjobs", &token)).await.unwrap();
        let second = transport.send(ApiRequest::get("/pickjobs", &token)).await.unwrap();
        assert_eq!(first["n"], 1);
        assert_eq!(second["n"], 2);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_fallback_after_queue_is_drained() {
        let transport = InMemoryTransport::new();
        let token = AuthToken::new("t");
        transport.respond(Method::Get, "/pickjobs", json!("queued"));
        transport.respond_always(Method::Get, "/pickjobs", json!("fallback"));

        for expected in ["queued", "fallback", "fallback"] {
            let body = transport.send(ApiRequest::get("/pickjobs", &token)).await.unwrap();
            assert_eq!(body, json!(expected));
        }
    }

    #[tokio::test]
    async fn test_unscripted_route_is_not_found() {
        let transport = InMemoryTransport::new();
        let err = transport
            .send(ApiRequest::get("/orders/x", &AuthToken::new("t")))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let transport = InMemoryTransport::new();
        transport.fail(Method::Patch, "/pickjobs/pj-1", 409, "version conflict");

        let err = transport
            .send(ApiRequest::patch("/pickjobs/pj-1", &AuthToken::new("t"), json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(transport.requests_to(Method::Patch, "/pickjobs/pj-1").len(), 1);
    }
}
