//! HTTP gateway to the laundry backend.
//!
//! Every call goes through the [`Transport`] trait so services can be driven by
//! a stub in tests. The reqwest-backed [`HttpGateway`] folds every network,
//! status and decoding failure into a [`TransportError`]; nothing past this
//! boundary sees a `reqwest::Error`.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{ConfigError, TransportError};

/// HTTP verbs the backend is called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    fn as_method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Verb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            other => Err(ConfigError::ParseError(format!("unknown HTTP verb '{other}'"))),
        }
    }
}

/// A single backend call.
#[derive(Debug)]
pub struct ApiRequest {
    pub method: Verb,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<SecretString>,
}

impl ApiRequest {
    pub fn new(method: Verb, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Verb::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Verb::Post, path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_bearer(mut self, token: &SecretString) -> Self {
        self.bearer = Some(SecretString::from(token.expose_secret()));
        self
    }
}

/// Sends requests to the backend and returns the decoded JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError>;
}

/// reqwest-backed transport.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &ApiConfig) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Request {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpGateway {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        let url = self.url(&request.path);
        tracing::debug!(method = %request.method, url = %url, "Backend request");

        let mut builder = self
            .client
            .request(request.method.as_method(), &url)
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }
        if let Some(ref token) = request.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %request.method, url = %url, "Backend request failed: {}", e);
            TransportError::Request {
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| TransportError::Request {
            message: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            tracing::warn!(
                method = %request.method,
                url = %url,
                status = status.as_u16(),
                "Backend returned error status"
            );
            let message = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("HTTP error").to_string()
            } else {
                text
            };
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|_| TransportError::Decode {
            status: status.as_u16(),
            message: if text.trim().is_empty() {
                "Invalid response format".to_string()
            } else {
                text
            },
        })
    }
}
