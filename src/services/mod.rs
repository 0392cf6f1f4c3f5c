//! Domain services over the backend gateway.
//!
//! Services never panic or bubble transport errors: every call returns either
//! its payload or a [`ServiceError`] with a user-safe message.

pub mod auth;
pub mod order;
pub mod postcode;

use std::sync::Arc;

use serde_json::Value;

pub use auth::{AuthService, LoginSuccess};
pub use order::{OrderCreated, OrderService, OrderUpdated};
pub use postcode::{PostcodeCheck, PostcodeService};

use crate::api::Transport;
use crate::api::envelope::envelope_message;
use crate::config::ApiConfig;
use crate::error::{ServiceError, TransportError};

/// The three services the conversation talks to, sharing one transport.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<AuthService>,
    pub orders: Arc<OrderService>,
    pub postcodes: Arc<PostcodeService>,
}

impl Services {
    pub fn new(transport: Arc<dyn Transport>, config: &ApiConfig) -> Self {
        Self {
            auth: Arc::new(AuthService::new(Arc::clone(&transport), &config.endpoints)),
            orders: Arc::new(OrderService::new(
                Arc::clone(&transport),
                &config.endpoints,
                config.update_attempts.clone(),
            )),
            postcodes: Arc::new(PostcodeService::new(transport, &config.endpoints)),
        }
    }
}

/// A transport failure seen through a service: user message plus the
/// transport's explanation.
pub(crate) fn transport_failure(message: &str, error: &TransportError) -> ServiceError {
    ServiceError::new(message).with_detail(error.message())
}

/// An envelope that signalled failure: keep the backend's message as detail.
pub(crate) fn envelope_failure(message: &str, response: &Value, fallback: &str) -> ServiceError {
    ServiceError::new(message)
        .with_detail(envelope_message(response).unwrap_or_else(|| fallback.to_string()))
}
