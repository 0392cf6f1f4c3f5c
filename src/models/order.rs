//! Order models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::envelope::{first_present, first_present_str, value_to_plain_string};

/// Field aliases for an order's identifier, in priority order.
pub const ORDER_ID_KEYS: &[&str] = &["id", "ID", "orderId"];
/// Field aliases for an order's status, in priority order.
pub const ORDER_STATUS_KEYS: &[&str] = &["orderStatus", "status"];
/// Statuses that freeze an order.
pub const FINAL_ORDER_STATUSES: &[&str] = &["completed", "cancelled", "delivered"];

/// Delivery address nested inside a new order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddress {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub contact_no: String,
    pub post_code: String,
    pub address_line1: String,
    pub address_line2: String,
}

/// Payload for `InsertOrder`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_id: i64,
    pub pickup_date: String,
    pub pickup_time: String,
    pub drop_off_date: String,
    pub drop_off_time: String,
    /// Comma-joined service ids.
    #[serde(rename = "Services")]
    pub services: String,
    #[serde(rename = "SubServices")]
    pub sub_services: String,
    pub collection_option: String,
    pub delivery_option: String,
    pub order_address: OrderAddress,
    pub offer_code: String,
}

/// Payload for `UpdateOrder`: every mutable field, not just the changed one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdateRequest {
    pub id: i64,
    pub customer_id: i64,
    pub pickup_date: String,
    pub pickup_time: String,
    pub collection_option: String,
    pub drop_off_date: String,
    pub drop_off_time: String,
    pub delivery_option: String,
}

/// An order as returned by `GetOrderDetail`.
///
/// Kept as raw JSON because the backend's field names are not stable; the
/// accessors probe the known aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRecord(pub Value);

impl OrderRecord {
    pub fn id(&self) -> Option<String> {
        first_present_str(&self.0, ORDER_ID_KEYS)
    }

    /// The id as the integer the update endpoint expects.
    pub fn numeric_id(&self) -> Option<i64> {
        match first_present(&self.0, ORDER_ID_KEYS)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<String> {
        first_present_str(&self.0, ORDER_STATUS_KEYS)
    }

    /// Whether the order has reached a status that forbids changes.
    pub fn is_final(&self) -> bool {
        self.status()
            .map(|s| s.to_lowercase())
            .is_some_and(|s| FINAL_ORDER_STATUSES.contains(&s.as_str()))
    }

    /// String value of `key`, or empty when absent.
    pub fn field(&self, key: &str) -> String {
        self.0.get(key).map(value_to_plain_string).unwrap_or_default()
    }

    pub fn pickup_date(&self) -> String {
        self.field("pickupDate")
    }

    pub fn pickup_time(&self) -> String {
        self.field("pickupTime")
    }

    pub fn drop_off_date(&self) -> String {
        self.field("dropOffDate")
    }

    pub fn drop_off_time(&self) -> String {
        self.field("dropOffTime")
    }

    pub fn collection_option(&self) -> String {
        self.field("collectionOption")
    }

    pub fn delivery_option(&self) -> String {
        self.field("deliveryOption")
    }

    pub fn total_amount(&self) -> Option<String> {
        first_present_str(&self.0, &["totalAmount"])
    }

    pub fn created_at(&self) -> Option<String> {
        first_present_str(&self.0, &["createdAt"])
    }

    /// Seed an update request with the order's current values.
    pub fn to_update_request(&self, id: i64, customer_id: i64) -> OrderUpdateRequest {
        OrderUpdateRequest {
            id,
            customer_id,
            pickup_date: self.pickup_date(),
            pickup_time: self.pickup_time(),
            collection_option: self.collection_option(),
            drop_off_date: self.drop_off_date(),
            drop_off_time: self.drop_off_time(),
            delivery_option: self.delivery_option(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn order_request_uses_backend_names() {
        let request = OrderRequest {
            customer_id: 7,
            pickup_date: "2030-01-02".into(),
            pickup_time: "09:00 AM - 11:00 AM".into(),
            drop_off_date: "2030-01-04".into(),
            drop_off_time: "03:00 PM - 05:00 PM".into(),
            services: "1,2".into(),
            sub_services: "3".into(),
            collection_option: "Driver collects from you".into(),
            delivery_option: "Collect from store".into(),
            order_address: OrderAddress {
                firstname: "Jane".into(),
                lastname: "Smith".into(),
                email: "jane@example.com".into(),
                contact_no: "9876543210".into(),
                post_code: "BR20XZ".into(),
                address_line1: "123 Main Street".into(),
                address_line2: String::new(),
            },
            offer_code: String::new(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["customerId"], 7);
        assert_eq!(value["dropOffDate"], "2030-01-04");
        assert_eq!(value["Services"], "1,2");
        assert_eq!(value["SubServices"], "3");
        assert_eq!(value["orderAddress"]["contactNo"], "9876543210");
        assert_eq!(value["orderAddress"]["addressLine1"], "123 Main Street");
        assert_eq!(value["offerCode"], "");
    }

    #[test]
    fn record_id_aliases() {
        assert_eq!(OrderRecord(json!({"orderId": "55"})).numeric_id(), Some(55));
        assert_eq!(OrderRecord(json!({"ID": 9, "orderId": 10})).numeric_id(), Some(9));
        assert_eq!(OrderRecord(json!({"id": 3})).id().as_deref(), Some("3"));
        assert_eq!(OrderRecord(json!({"id": "abc"})).numeric_id(), None);
        assert_eq!(OrderRecord(json!({})).id(), None);
    }

    #[test]
    fn final_statuses_are_case_insensitive() {
        assert!(OrderRecord(json!({"status": "Delivered"})).is_final());
        assert!(OrderRecord(json!({"orderStatus": "CANCELLED", "status": "pending"})).is_final());
        assert!(!OrderRecord(json!({"status": "Pending"})).is_final());
        assert!(!OrderRecord(json!({})).is_final());
    }

    #[test]
    fn update_request_is_seeded_from_record() {
        let record = OrderRecord(json!({
            "id": 5,
            "pickupDate": "2030-01-02",
            "pickupTime": "09:00 AM - 11:00 AM",
            "dropOffDate": "2030-01-04",
            "deliveryOption": "Collect from store"
        }));
        let update = record.to_update_request(5, 42);
        assert_eq!(update.customer_id, 42);
        assert_eq!(update.pickup_date, "2030-01-02");
        assert_eq!(update.drop_off_time, "");
        assert_eq!(update.delivery_option, "Collect from store");

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["dropOffDate"], "2030-01-04");
        assert_eq!(value["customerId"], 42);
    }
}
