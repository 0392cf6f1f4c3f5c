//! Scripted in-memory transport for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;

use super::{ApiRequest, Transport, Verb};
use crate::error::TransportError;

type Responder = dyn Fn(&RecordedRequest) -> Result<Value, TransportError> + Send + Sync;

/// A request as seen by the stub, with the bearer token exposed.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Verb,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl RecordedRequest {
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Answers every request with a closure and records what it was asked.
pub struct StubTransport {
    responder: Box<Responder>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Result<Value, TransportError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub fn not_found() -> TransportError {
    TransportError::Status {
        status: 404,
        message: "Not Found".into(),
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let recorded = RecordedRequest {
            method: request.method,
            path: request.path,
            query: request.query,
            body: request.body,
            bearer: request.bearer.map(|t| t.expose_secret().to_string()),
        };
        let result = (self.responder)(&recorded);
        self.requests.lock().unwrap().push(recorded);
        result
    }
}
