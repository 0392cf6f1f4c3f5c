//! Service catalogue and order placement, listing and updates.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::Value;

use super::{envelope_failure, transport_failure};
use crate::api::envelope::{
    first_non_empty_array, first_present, first_present_str, is_envelope_success, top_level_keys,
    value_to_plain_string,
};
use crate::api::{ApiRequest, Transport};
use crate::config::{Endpoints, UpdateAttempt};
use crate::error::{ServiceError, TransportError};
use crate::models::order::ORDER_ID_KEYS;
use crate::models::{OrderRecord, OrderRequest, OrderUpdateRequest, ServiceRecord};

/// Envelope keys that may hold the service catalogue, in priority order.
pub const SERVICE_LIST_KEYS: &[&str] = &[
    "data", "data1", "services", "result", "items", "list", "data2", "data3", "data4",
];

/// Envelope keys that may hold a customer's orders, in priority order.
pub const ORDER_LIST_KEYS: &[&str] = &["data", "data1", "orders", "result", "items", "list"];

/// A newly placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCreated {
    pub message: String,
    pub order_id: Option<String>,
}

/// A successful order update and the attempt that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderUpdated {
    pub message: String,
    pub endpoint_used: String,
}

/// Verdict on one update attempt.
#[derive(Debug)]
enum AttemptOutcome {
    /// Stop here with this result.
    Qualified(Result<OrderUpdated, ServiceError>),
    /// The endpoint/verb does not exist; try the next attempt.
    Retry,
}

pub struct OrderService {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    update_attempts: Vec<UpdateAttempt>,
}

impl OrderService {
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: &Endpoints,
        update_attempts: Vec<UpdateAttempt>,
    ) -> Self {
        Self {
            transport,
            endpoints: endpoints.clone(),
            update_attempts,
        }
    }

    /// Fetch the service catalogue.
    pub async fn list_services(&self) -> Result<Vec<ServiceRecord>, ServiceError> {
        let request = ApiRequest::get(&self.endpoints.get_all_services);
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| transport_failure("Unable to fetch services", &e))?;

        if !is_envelope_success(&response) {
            return Err(envelope_failure(
                "Unable to fetch services",
                &response,
                "API returned unsuccessful response",
            ));
        }

        match first_non_empty_array(&response, SERVICE_LIST_KEYS) {
            Some(items) => {
                tracing::debug!(count = items.len(), "Loaded service catalogue");
                Ok(items.into_iter().map(ServiceRecord).collect())
            }
            None => {
                let keys = top_level_keys(&response);
                tracing::warn!(keys = ?keys, "No service list found in response");
                Err(ServiceError::new("No services data found in API response")
                    .with_detail(format!("Response structure: {keys:?}")))
            }
        }
    }

    /// Place a new order.
    pub async fn create_order(
        &self,
        order: &OrderRequest,
        token: &SecretString,
    ) -> Result<OrderCreated, ServiceError> {
        let body = serde_json::to_value(order)
            .map_err(|e| ServiceError::new("Order creation failed").with_detail(e.to_string()))?;
        let request = ApiRequest::post(&self.endpoints.insert_order)
            .with_json(body)
            .with_bearer(token);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| transport_failure("Unable to create order", &e))?;

        if !is_envelope_success(&response) {
            return Err(envelope_failure(
                "Unable to create order",
                &response,
                "Order creation failed",
            ));
        }

        let data = response.get("data").cloned().unwrap_or(Value::Null);
        let order_id = first_present_str(&data, ORDER_ID_KEYS);
        tracing::info!(order_id = ?order_id, "Order created");
        Ok(OrderCreated {
            message: "Order placed successfully! 🎉".to_string(),
            order_id,
        })
    }

    /// Update an order, walking the configured (verb, path) attempts until one
    /// gives a usable answer.
    ///
    /// An attempt is skipped when the transport answers 404 or the backend's
    /// failure message says "not found"; any success, or any other failure,
    /// ends the walk.
    pub async fn update_order(
        &self,
        update: &OrderUpdateRequest,
        token: &SecretString,
    ) -> Result<OrderUpdated, ServiceError> {
        let body = serde_json::to_value(update)
            .map_err(|e| ServiceError::new("Order update failed").with_detail(e.to_string()))?;

        for attempt in &self.update_attempts {
            tracing::debug!(attempt = %attempt, order_id = update.id, "Trying order update");
            let request = ApiRequest::new(attempt.verb, &attempt.path)
                .with_json(body.clone())
                .with_bearer(token);
            let response = self.transport.send(request).await;

            match judge_update_attempt(attempt, response) {
                AttemptOutcome::Qualified(result) => return result,
                AttemptOutcome::Retry => {
                    tracing::debug!(attempt = %attempt, "Update attempt not found, trying next");
                }
            }
        }

        let tried = self
            .update_attempts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        tracing::warn!(tried = %tried, "Every order update attempt was exhausted");
        Err(ServiceError::new("Unable to update order - no valid endpoint found")
            .with_detail(format!("All attempted endpoints failed. Tried: {tried}")))
    }

    /// Fetch a customer's orders.
    pub async fn get_order_detail(
        &self,
        customer_id: i64,
        token: &SecretString,
    ) -> Result<Vec<OrderRecord>, ServiceError> {
        let request = ApiRequest::get(&self.endpoints.get_order_detail)
            .with_query("customerId", customer_id.to_string())
            .with_bearer(token);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| transport_failure("Unable to fetch order details", &e))?;

        if !is_envelope_success(&response) {
            return Err(envelope_failure(
                "Unable to fetch order details",
                &response,
                "No orders found",
            ));
        }

        let orders = first_non_empty_array(&response, ORDER_LIST_KEYS).unwrap_or_default();
        tracing::debug!(customer_id, count = orders.len(), "Loaded orders");
        Ok(orders.into_iter().map(OrderRecord).collect())
    }

    /// Confirm an order belongs to the customer and can still be changed.
    pub async fn validate_order_for_update(
        &self,
        order_id: &str,
        customer_id: i64,
        token: &SecretString,
    ) -> Result<OrderRecord, ServiceError> {
        let orders = self
            .get_order_detail(customer_id, token)
            .await
            .map_err(|e| {
                ServiceError::new("Unable to fetch orders for validation")
                    .with_detail(e.detail_or_message().to_string())
            })?;

        let order = orders
            .into_iter()
            .find(|o| o.id().as_deref() == Some(order_id))
            .ok_or_else(|| {
                ServiceError::new(format!("Order with ID {order_id} not found"))
                    .with_detail("Order not found")
            })?;

        check_updatable(&order)?;
        Ok(order)
    }
}

/// Reject orders whose status is completed, cancelled or delivered.
pub fn check_updatable(order: &OrderRecord) -> Result<(), ServiceError> {
    if order.is_final() {
        let status = order.status().unwrap_or_default().to_lowercase();
        return Err(
            ServiceError::new(format!("Cannot update order with status: {status}"))
                .with_detail(format!("Order status is {status}")),
        );
    }
    Ok(())
}

fn judge_update_attempt(
    attempt: &UpdateAttempt,
    response: Result<Value, TransportError>,
) -> AttemptOutcome {
    let failure_detail = match response {
        Err(e) if e.is_not_found() => return AttemptOutcome::Retry,
        Err(e) => e.message().to_string(),
        Ok(body) if is_update_success(&body) => {
            tracing::info!(attempt = %attempt, "Order update succeeded");
            return AttemptOutcome::Qualified(Ok(OrderUpdated {
                message: "Order updated successfully! ✅".to_string(),
                endpoint_used: attempt.to_string(),
            }));
        }
        Ok(body) => describe_update_failure(&body),
    };

    if failure_detail.to_lowercase().contains("not found") {
        return AttemptOutcome::Retry;
    }
    tracing::warn!(attempt = %attempt, detail = %failure_detail, "Order update rejected");
    AttemptOutcome::Qualified(Err(
        ServiceError::new("Unable to update order").with_detail(failure_detail)
    ))
}

/// Any one of the known success shapes is enough.
fn is_update_success(body: &Value) -> bool {
    body.get("isSuccess").and_then(Value::as_bool) == Some(true)
        || body.get("success").and_then(Value::as_bool) == Some(true)
        || body.get("statusCode").and_then(Value::as_i64) == Some(1)
        || body.get("status").and_then(Value::as_str) == Some("success")
        || body.get("code").and_then(Value::as_i64) == Some(200)
}

fn describe_update_failure(body: &Value) -> String {
    let message = first_present_str(body, &["message", "error", "errorMessage"])
        .unwrap_or_else(|| "Order update failed - no specific error message".to_string());
    let status = first_present(body, &["statusCode", "status_code"])
        .map(value_to_plain_string)
        .unwrap_or_else(|| "unknown".to_string());
    format!("Status: {status}, Error: {message}")
}
