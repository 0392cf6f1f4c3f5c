//! Service-area check for postcodes.

use std::sync::Arc;

use super::transport_failure;
use crate::api::envelope::is_envelope_success;
use crate::api::{ApiRequest, Transport};
use crate::config::Endpoints;
use crate::error::ServiceError;

/// Outcome of a postcode lookup that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeCheck {
    pub is_valid: bool,
    pub message: String,
}

pub struct PostcodeService {
    transport: Arc<dyn Transport>,
    path: String,
}

impl PostcodeService {
    pub fn new(transport: Arc<dyn Transport>, endpoints: &Endpoints) -> Self {
        Self {
            transport,
            path: endpoints.validate_postcode.clone(),
        }
    }

    /// Ask whether `postcode` is inside the service area.
    ///
    /// A domain failure in the envelope means "not served here" and is an
    /// `Ok` with `is_valid == false`; only transport failures are errors.
    pub async fn validate(&self, postcode: &str) -> Result<PostcodeCheck, ServiceError> {
        let request = ApiRequest::get(&self.path)
            .with_query("isGetData", "true")
            .with_query("code", postcode)
            .with_query("culture", "en-IN");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| transport_failure("Unable to validate postcode", &e))?;

        if is_envelope_success(&response) {
            tracing::info!(postcode, "Postcode is serviceable");
            Ok(PostcodeCheck {
                is_valid: true,
                message: "We are serving in your area! 🎉".to_string(),
            })
        } else {
            tracing::info!(postcode, "Postcode is outside the service area");
            Ok(PostcodeCheck {
                is_valid: false,
                message: "Sorry, we are not serving in your area yet. 😔".to_string(),
            })
        }
    }
}
