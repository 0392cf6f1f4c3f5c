//! Error types for the laundry chat front-end.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

/// Failures raised before a backend envelope could be inspected.
///
/// The gateway never lets these escape as panics; services fold them into a
/// [`ServiceError`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("API request failed: {message}")]
    Request { message: String },

    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response format (status {status}): {message}")]
    Decode { status: u16, message: String },
}

impl TransportError {
    /// HTTP status attached to the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { .. } => None,
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The raw message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Request { message }
            | Self::Status { message, .. }
            | Self::Decode { message, .. } => message,
        }
    }
}

/// A failed domain operation: transport failure or a backend envelope that
/// signalled failure.
///
/// `message` is safe to show to the user; `detail` carries the backend's or
/// transport's explanation when there is one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
    pub detail: Option<String>,
}

impl ServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// The most specific explanation available.
    pub fn detail_or_message(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.message)
    }
}

/// Internal faults inside a conversation handler.
///
/// These are caught at the turn boundary and turned into a generic reply.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("Session is missing {0}")]
    MissingSessionData(&'static str),

    #[error("Session is not authenticated")]
    NotAuthenticated,

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: crate::chat::ConversationState,
        to: crate::chat::ConversationState,
    },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
