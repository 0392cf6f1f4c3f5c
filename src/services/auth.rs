//! Customer registration and login.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::Value;

use crate::api::envelope::{envelope_message, is_envelope_success};
use crate::api::{ApiRequest, Transport};
use crate::config::Endpoints;
use crate::error::ServiceError;
use crate::models::{Customer, CustomerProfile, LoginRequest};

/// An authenticated customer.
#[derive(Debug)]
pub struct LoginSuccess {
    pub token: SecretString,
    pub customer_id: i64,
    pub profile: CustomerProfile,
}

pub struct AuthService {
    transport: Arc<dyn Transport>,
    register_path: String,
    login_path: String,
}

impl AuthService {
    pub fn new(transport: Arc<dyn Transport>, endpoints: &Endpoints) -> Self {
        Self {
            transport,
            register_path: endpoints.insert_customer.clone(),
            login_path: endpoints.login.clone(),
        }
    }

    /// Register a new customer.
    ///
    /// Only a transport failure fails registration. An envelope that reports a
    /// domain failure (typically an already-registered email) is logged and
    /// left for the follow-up login to decide.
    pub async fn register(&self, customer: &Customer) -> Result<Value, ServiceError> {
        let body = serde_json::to_value(customer).map_err(|e| {
            ServiceError::new("Registration failed").with_detail(e.to_string())
        })?;
        let request = ApiRequest::post(&self.register_path).with_json(body);

        match self.transport.send(request).await {
            Ok(response) => {
                if !is_envelope_success(&response) {
                    tracing::warn!(
                        message = ?envelope_message(&response),
                        "Registration envelope reported failure; deferring to login"
                    );
                }
                Ok(response)
            }
            Err(e) => Err(ServiceError::new(e.message()).with_detail(e.to_string())),
        }
    }

    /// Log in and extract the bearer token (`data1`) and profile (`data2`).
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginSuccess, ServiceError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| ServiceError::new("Login failed").with_detail(e.to_string()))?;
        let request = ApiRequest::post(&self.login_path).with_json(body);

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ServiceError::new(e.message()).with_detail(e.to_string()))?;

        if !is_envelope_success(&response) {
            let message = envelope_message(&response).unwrap_or_else(|| "Login failed".to_string());
            return Err(ServiceError::new(message).with_detail("Invalid credentials"));
        }

        parse_login(&response)
    }

    /// Log in with the credentials just used to register.
    pub async fn auto_login(&self, customer: &Customer) -> Result<LoginSuccess, ServiceError> {
        self.login(&customer.login_request()).await
    }
}

fn parse_login(response: &Value) -> Result<LoginSuccess, ServiceError> {
    let malformed = |detail: &str| ServiceError::new("Login failed").with_detail(detail);

    let token = response
        .get("data1")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| malformed("Login response has no token"))?;

    let profile_value = response
        .get("data2")
        .filter(|v| v.is_object())
        .ok_or_else(|| malformed("Login response has no customer profile"))?;
    if profile_value.get("id").is_none_or(Value::is_null) {
        return Err(malformed("Login response has no customer id"));
    }
    let profile: CustomerProfile = serde_json::from_value(profile_value.clone())
        .map_err(|e| malformed(&format!("Unreadable customer profile: {e}")))?;

    Ok(LoginSuccess {
        token: SecretString::from(token),
        customer_id: profile.id,
        profile,
    })
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;
    use crate::api::stub::StubTransport;
    use crate::api::Verb;
    use crate::error::TransportError;

    fn login_ok() -> Value {
        json!({
            "message": "Login successful",
            "statusCode": 1,
            "isSuccess": true,
            "data1": "tok-123",
            "data2": {"id": 42, "firstname": "John", "lastname": "Doe",
                      "email": "john@example.com", "mobileNo": "1234567890"},
            "data3": "refresh"
        })
    }

    fn service(stub: StubTransport) -> (Arc<StubTransport>, AuthService) {
        let stub = Arc::new(stub);
        let auth = AuthService::new(stub.clone(), &Endpoints::default());
        (stub, auth)
    }

    fn customer() -> Customer {
        Customer::new("John", "Doe", "1234567890", "john@example.com", "Secret1!")
    }

    #[tokio::test]
    async fn login_extracts_token_and_profile() {
        let (stub, auth) = service(StubTransport::new(|_| Ok(login_ok())));
        let login = auth.auto_login(&customer()).await.unwrap();
        assert_eq!(login.token.expose_secret(), "tok-123");
        assert_eq!(login.customer_id, 42);
        assert_eq!(login.profile.firstname, "John");

        let requests = stub.requests();
        assert_eq!(requests[0].method, Verb::Post);
        assert_eq!(requests[0].path, "/Authentication/Login");
        assert_eq!(
            requests[0].body,
            Some(json!({"username": "john@example.com", "password": "Secret1!"}))
        );
    }

    #[tokio::test]
    async fn login_accepts_string_customer_id() {
        let (_, auth) = service(StubTransport::new(|_| {
            let mut response = login_ok();
            response["data2"]["id"] = json!("42");
            Ok(response)
        }));
        let login = auth.auto_login(&customer()).await.unwrap();
        assert_eq!(login.customer_id, 42);
    }

    #[tokio::test]
    async fn login_requires_both_envelope_flags() {
        let (_, auth) = service(StubTransport::new(|_| {
            Ok(json!({"message": "Wrong password", "statusCode": 0, "isSuccess": true}))
        }));
        let err = auth.auto_login(&customer()).await.unwrap_err();
        assert_eq!(err.message, "Wrong password");
        assert_eq!(err.detail.as_deref(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn login_without_token_is_a_domain_failure() {
        let (_, auth) = service(StubTransport::new(|_| {
            Ok(json!({"statusCode": 1, "isSuccess": true, "data2": {"id": 1}}))
        }));
        let err = auth.auto_login(&customer()).await.unwrap_err();
        assert_eq!(err.message, "Login failed");
    }

    #[tokio::test]
    async fn login_transport_failure_surfaces_message() {
        let (_, auth) = service(StubTransport::new(|_| {
            Err(TransportError::Request {
                message: "connection refused".into(),
            })
        }));
        let err = auth.auto_login(&customer()).await.unwrap_err();
        assert_eq!(err.message, "connection refused");
    }

    #[tokio::test]
    async fn register_posts_customer_and_tolerates_domain_failure() {
        let (stub, auth) = service(StubTransport::new(|_| {
            Ok(json!({"message": "Email already exists", "statusCode": 0, "isSuccess": false}))
        }));
        assert!(auth.register(&customer()).await.is_ok());
        let request = &stub.requests()[0];
        assert_eq!(request.path, "/Authentication/InsertCustomer");
        assert_eq!(request.body.as_ref().unwrap()["loginDetails"]["username"], "john@example.com");
        assert!(request.bearer.is_none());
    }

    #[tokio::test]
    async fn register_transport_failure_is_an_error() {
        let (_, auth) = service(StubTransport::new(|_| {
            Err(TransportError::Status {
                status: 500,
                message: "Internal Server Error".into(),
            })
        }));
        let err = auth.register(&customer()).await.unwrap_err();
        assert_eq!(err.message, "Internal Server Error");
    }
}
