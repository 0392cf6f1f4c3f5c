//! Customer registration and login models.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::api::envelope::value_to_plain_string;

/// Credentials nested inside a registration request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginDetails {
    pub username: String,
    pub password: String,
}

/// Registration payload for `InsertCustomer`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub firstname: String,
    pub lastname: String,
    pub mobile_no: String,
    pub email: String,
    pub login_details: LoginDetails,
}

impl Customer {
    /// Build a customer whose username is their email address.
    pub fn new(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        mobile_no: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let email = email.into();
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
            mobile_no: mobile_no.into(),
            login_details: LoginDetails {
                username: email.clone(),
                password: password.into(),
            },
            email,
        }
    }

    /// The login request that authenticates this customer.
    pub fn login_request(&self) -> LoginRequest {
        LoginRequest {
            username: self.login_details.username.clone(),
            password: self.login_details.password.clone(),
        }
    }
}

/// Payload for `Login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Customer profile returned by the backend in the login envelope's `data2`.
///
/// Only `id` is required; everything else tolerates absence. Numbers sent as
/// strings (`"id": "42"`) are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerProfile {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub firstname: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lastname: String,
    pub displayname: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub mobile_no: String,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub post_code: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub total_order: i64,
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(0);
    }
    let text = value_to_plain_string(&value);
    text.trim()
        .parse()
        .map_err(|_| D::Error::custom(format!("expected an integer, got {text}")))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn customer_serializes_with_backend_names() {
        let customer = Customer::new("John", "Doe", "1234567890", "john@example.com", "pw");
        let value = serde_json::to_value(&customer).unwrap();
        assert_eq!(
            value,
            json!({
                "firstname": "John",
                "lastname": "Doe",
                "mobileNo": "1234567890",
                "email": "john@example.com",
                "loginDetails": {"username": "john@example.com", "password": "pw"}
            })
        );
        assert_eq!(customer.login_request().username, "john@example.com");
    }

    #[test]
    fn profile_parses_sparse_payload() {
        let profile: CustomerProfile = serde_json::from_value(json!({
            "id": 42,
            "firstname": "John",
            "mobileNo": "1234567890",
            "lastname": null,
            "postCode": null,
            "totalOrder": 3,
            "secondaryEmail": "ignored"
        }))
        .unwrap();
        assert_eq!(profile.id, 42);
        assert_eq!(profile.mobile_no, "1234567890");
        assert_eq!(profile.lastname, "");
        assert_eq!(profile.total_order, 3);
        assert_eq!(profile.post_code, None);
    }

    #[test]
    fn profile_accepts_numeric_strings() {
        let profile: CustomerProfile = serde_json::from_value(json!({
            "id": "42",
            "firstname": "John",
            "totalOrder": " 5 "
        }))
        .unwrap();
        assert_eq!(profile.id, 42);
        assert_eq!(profile.total_order, 5);

        let bad = serde_json::from_value::<CustomerProfile>(json!({"id": "forty-two"}));
        assert!(bad.is_err());
    }
}
