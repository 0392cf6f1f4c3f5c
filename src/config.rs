//! Configuration types.

use std::time::Duration;

use crate::api::Verb;
use crate::error::ConfigError;

pub const DEFAULT_API_BASE_URL: &str = "https://admin.iclothgenie.com/api";

/// Backend endpoint paths, relative to [`ApiConfig::base_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub insert_customer: String,
    pub login: String,
    pub insert_order: String,
    pub update_order: String,
    pub get_order_detail: String,
    pub get_all_services: String,
    pub validate_postcode: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            insert_customer: "/Authentication/InsertCustomer".to_string(),
            login: "/Authentication/Login".to_string(),
            insert_order: "/Order/InsertOrder".to_string(),
            update_order: "/Order/UpdateOrder".to_string(),
            get_order_detail: "/Order/GetOrderDetail".to_string(),
            get_all_services: "/Services/GetAllServices".to_string(),
            validate_postcode: "/Postcode/IsValidPostcode".to_string(),
        }
    }
}

/// One (verb, path) pair tried when updating an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAttempt {
    pub verb: Verb,
    pub path: String,
}

impl UpdateAttempt {
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
        }
    }
}

impl std::fmt::Display for UpdateAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.verb, self.path)
    }
}

impl std::str::FromStr for UpdateAttempt {
    type Err = ConfigError;

    /// Parse `"PUT /Order/UpdateOrder"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(verb), Some(path), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ConfigError::ParseError(format!(
                "expected '<VERB> <path>', got '{s}'"
            )));
        };
        let verb = verb.parse::<Verb>()?;
        Ok(Self::new(verb, path))
    }
}

/// Connection settings for the laundry backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub endpoints: Endpoints,
    /// Tried in order by the order-update call until one qualifies.
    pub update_attempts: Vec<UpdateAttempt>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let endpoints = Endpoints::default();
        let update_attempts = default_update_attempts(&endpoints.update_order);
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            endpoints,
            update_attempts,
        }
    }
}

fn default_update_attempts(path: &str) -> Vec<UpdateAttempt> {
    vec![
        UpdateAttempt::new(Verb::Put, path),
        UpdateAttempt::new(Verb::Post, path),
        UpdateAttempt::new(Verb::Patch, path),
    ]
}

impl ApiConfig {
    /// Read `API_BASE_URL`, `API_TIMEOUT` and `UPDATE_ORDER_ATTEMPTS` from the
    /// process environment, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("API_BASE_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if url.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "API_BASE_URL".into(),
                    message: "must not be empty".into(),
                });
            }
            config.base_url = url;
        }

        if let Some(secs) = lookup("API_TIMEOUT") {
            let secs: u64 = secs.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "API_TIMEOUT".into(),
                message: format!("{e}"),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("UPDATE_ORDER_ATTEMPTS") {
            let attempts = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<UpdateAttempt>)
                .collect::<Result<Vec<_>, _>>()?;
            if attempts.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "UPDATE_ORDER_ATTEMPTS".into(),
                    message: "at least one attempt is required".into(),
                });
            }
            config.update_attempts = attempts;
        }

        Ok(config)
    }
}

/// Backend and HTTP adapter settings from the process environment.
pub fn load_from_env() -> crate::error::Result<(ApiConfig, Option<ServerConfig>)> {
    Ok((ApiConfig::from_env()?, ServerConfig::from_env()?))
}

/// Fixed catalogue values the conversation offers and validates against.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub time_slots: Vec<String>,
    pub collection_options: Vec<String>,
    pub delivery_options: Vec<String>,
    /// Sub-service sent with every new order.
    pub default_sub_service: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            time_slots: [
                "09:00 AM - 11:00 AM",
                "11:00 AM - 01:00 PM",
                "01:00 PM - 03:00 PM",
                "03:00 PM - 05:00 PM",
                "05:00 PM - 07:00 PM",
                "07:00 PM - 09:00 PM",
            ]
            .map(String::from)
            .to_vec(),
            collection_options: vec![
                "Driver collects from you".to_string(),
                "Drop off at store".to_string(),
            ],
            delivery_options: vec![
                "Driver delivers to you".to_string(),
                "Collect from store".to_string(),
            ],
            default_sub_service: "3".to_string(),
        }
    }
}

/// Idle time after which an HTTP chat session is dropped.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(3600);

/// Settings for the optional HTTP chat adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub session_timeout: Duration,
}

impl ServerConfig {
    /// `None` when `CHAT_HTTP_PORT` is unset (the CLI adapter is used instead).
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(port) = lookup("CHAT_HTTP_PORT") else {
            return Ok(None);
        };
        let port: u16 = port.trim().parse().map_err(|e| ConfigError::InvalidValue {
            key: "CHAT_HTTP_PORT".into(),
            message: format!("{e}"),
        })?;
        let host = lookup("CHAT_HTTP_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let session_timeout = match lookup("SESSION_TIMEOUT") {
            Some(secs) => {
                let secs: u64 = secs.trim().parse().map_err(|e| ConfigError::InvalidValue {
                    key: "SESSION_TIMEOUT".into(),
                    message: format!("{e}"),
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_SESSION_TIMEOUT,
        };
        Ok(Some(Self {
            host,
            port,
            session_timeout,
        }))
    }
}
