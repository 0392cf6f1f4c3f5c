//! Service catalogue records.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::envelope::first_present_str;

pub const SERVICE_ID_KEYS: &[&str] = &["id", "ID", "serviceId"];
pub const SERVICE_NAME_KEYS: &[&str] = &["name", "serviceName", "title"];
pub const SERVICE_DESCRIPTION_KEYS: &[&str] = &["description", "desc", "details"];
pub const SERVICE_PRICE_KEYS: &[&str] = &["price", "cost", "amount"];

/// A service from `GetAllServices`, kept as raw JSON with alias accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceRecord(pub Value);

impl ServiceRecord {
    /// Id as text, so `7` and `"7"` compare equal to user input.
    pub fn id(&self) -> Option<String> {
        first_present_str(&self.0, SERVICE_ID_KEYS)
    }

    pub fn name(&self) -> Option<String> {
        first_present_str(&self.0, SERVICE_NAME_KEYS)
    }

    pub fn description(&self) -> Option<String> {
        first_present_str(&self.0, SERVICE_DESCRIPTION_KEYS)
    }

    /// Price exactly as the backend sent it.
    pub fn price(&self) -> Option<String> {
        first_present_str(&self.0, SERVICE_PRICE_KEYS)
    }

    /// Price as a decimal, when it parses.
    pub fn price_decimal(&self) -> Option<Decimal> {
        let raw = self.price()?;
        Decimal::from_str(raw.trim())
            .or_else(|_| Decimal::from_scientific(raw.trim()))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn aliased_fields() {
        let service = ServiceRecord(json!({
            "serviceId": 12,
            "serviceName": "Dry Cleaning",
            "details": "Suits and dresses",
            "cost": "4.50"
        }));
        assert_eq!(service.id().as_deref(), Some("12"));
        assert_eq!(service.name().as_deref(), Some("Dry Cleaning"));
        assert_eq!(service.description().as_deref(), Some("Suits and dresses"));
        assert_eq!(service.price_decimal(), Some(dec!(4.50)));
    }

    #[test]
    fn numeric_price_and_missing_fields() {
        let service = ServiceRecord(json!({"id": 1, "price": 10.25}));
        assert_eq!(service.price_decimal(), Some(dec!(10.25)));
        assert_eq!(service.name(), None);

        let service = ServiceRecord(json!({"id": 1, "price": "ask us"}));
        assert_eq!(service.price().as_deref(), Some("ask us"));
        assert_eq!(service.price_decimal(), None);
    }
}
