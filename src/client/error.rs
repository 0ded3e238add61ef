use std::fmt;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::domain::ValidationError;

/// Structured detail payload attached to an error.
pub type Details = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Discriminant of [`BriqError`], useful for matching without destructuring.
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    RateLimit,
    Network,
    Server,
    Timeout,
    Configuration,
}

impl ErrorKind {
    /// Machine-readable error code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Authentication => "AUTHENTICATION_ERROR",
            Self::Authorization => "AUTHORIZATION_ERROR",
            Self::NotFound => "NOT_FOUND_ERROR",
            Self::RateLimit => "RATE_LIMIT_ERROR",
            Self::Network => "NETWORK_ERROR",
            Self::Server => "SERVER_ERROR",
            Self::Timeout => "TIMEOUT_ERROR",
            Self::Configuration => "CONFIGURATION_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
/// Errors returned by [`BriqClient`](crate::BriqClient).
///
/// The set is closed: transport failures, HTTP error statuses, malformed responses,
/// input validation and configuration problems all end up as exactly one of these
/// variants.
pub enum BriqError {
    /// The request was rejected as invalid (HTTP 400) or failed local validation.
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<Details>,
    },

    /// The API key was missing or rejected (HTTP 401).
    #[error("{message}")]
    Authentication {
        message: String,
        details: Option<Details>,
    },

    /// The API key is valid but lacks permission (HTTP 403).
    #[error("{message}")]
    Authorization {
        message: String,
        details: Option<Details>,
    },

    /// The addressed resource does not exist (HTTP 404).
    #[error("{}", not_found_message(.resource, .id))]
    NotFound { resource: String, id: Option<String> },

    /// Too many requests (HTTP 429). `retry_after` is the `Retry-After` header in seconds.
    #[error("{message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// The request never produced an HTTP response (DNS, connect, reset, TLS, ...).
    #[error("{message}")]
    Network {
        message: String,
        details: Option<Details>,
    },

    /// 5xx or any unmapped status, or a response body that could not be understood.
    #[error("{message}")]
    Server {
        message: String,
        status: u16,
        details: Option<Details>,
    },

    /// A single attempt did not complete within the configured timeout.
    #[error("{}", timeout_message(.timeout))]
    Timeout { timeout: Duration },

    /// Client configuration was rejected while building the client.
    #[error("{message}")]
    Configuration {
        message: String,
        details: Option<Details>,
    },
}

fn not_found_message(resource: &str, id: &Option<String>) -> String {
    match id {
        Some(id) => format!("{resource} with ID '{id}' not found"),
        None => format!("{resource} not found"),
    }
}

fn timeout_message(timeout: &Duration) -> String {
    format!("Request timed out after {}ms", timeout.as_millis())
}

impl BriqError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    /// Network failure carrying the underlying cause under `originalError`.
    pub fn network(message: impl Into<String>, cause: &dyn fmt::Display) -> Self {
        let mut details = Details::new();
        details.insert("originalError".to_owned(), Value::String(cause.to_string()));
        Self::Network {
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Network { .. } => ErrorKind::Network,
            Self::Server { .. } => ErrorKind::Server,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    /// Machine-readable error code, e.g. `"RATE_LIMIT_ERROR"`.
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// HTTP status associated with the error, if any.
    ///
    /// Timeouts report `408`; network and configuration errors carry none.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Validation { .. } => Some(400),
            Self::Authentication { .. } => Some(401),
            Self::Authorization { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RateLimit { .. } => Some(429),
            Self::Server { status, .. } => Some(*status),
            Self::Timeout { .. } => Some(408),
            Self::Network { .. } | Self::Configuration { .. } => None,
        }
    }

    /// Structured details. Variants with dedicated fields expose them here as well
    /// (`resource`/`id`, `retryAfter`, `timeout` in milliseconds).
    pub fn details(&self) -> Option<Details> {
        match self {
            Self::Validation { details, .. }
            | Self::Authentication { details, .. }
            | Self::Authorization { details, .. }
            | Self::Network { details, .. }
            | Self::Server { details, .. }
            | Self::Configuration { details, .. } => details.clone(),
            Self::NotFound { resource, id } => {
                let mut details = Details::new();
                details.insert("resource".to_owned(), Value::String(resource.clone()));
                details.insert(
                    "id".to_owned(),
                    id.clone().map_or(Value::Null, Value::String),
                );
                Some(details)
            }
            Self::RateLimit { retry_after, .. } => {
                let mut details = Details::new();
                details.insert(
                    "retryAfter".to_owned(),
                    retry_after.map_or(Value::Null, Value::from),
                );
                Some(details)
            }
            Self::Timeout { timeout } => {
                let mut details = Details::new();
                let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                details.insert("timeout".to_owned(), Value::from(millis));
                Some(details)
            }
        }
    }

    /// Whether re-issuing the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        super::retry::is_retryable(self)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Server-provided wait hint for [`BriqError::RateLimit`].
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit {
                retry_after: Some(seconds),
                ..
            } => Some(Duration::from_secs(*seconds)),
            _ => None,
        }
    }
}

impl From<ValidationError> for BriqError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_statuses_follow_kind() {
        let cases = [
            (BriqError::validation("bad"), "VALIDATION_ERROR", Some(400)),
            (
                BriqError::Authentication {
                    message: "no".to_owned(),
                    details: None,
                },
                "AUTHENTICATION_ERROR",
                Some(401),
            ),
            (
                BriqError::Authorization {
                    message: "no".to_owned(),
                    details: None,
                },
                "AUTHORIZATION_ERROR",
                Some(403),
            ),
            (
                BriqError::not_found("Resource", None),
                "NOT_FOUND_ERROR",
                Some(404),
            ),
            (
                BriqError::RateLimit {
                    message: "slow down".to_owned(),
                    retry_after: None,
                },
                "RATE_LIMIT_ERROR",
                Some(429),
            ),
            (
                BriqError::network("Network request failed", &"reset"),
                "NETWORK_ERROR",
                None,
            ),
            (
                BriqError::Server {
                    message: "boom".to_owned(),
                    status: 502,
                    details: None,
                },
                "SERVER_ERROR",
                Some(502),
            ),
            (
                BriqError::Timeout {
                    timeout: Duration::from_millis(5000),
                },
                "TIMEOUT_ERROR",
                Some(408),
            ),
            (
                BriqError::configuration("bad config"),
                "CONFIGURATION_ERROR",
                None,
            ),
        ];

        for (err, code, status) in cases {
            assert_eq!(err.code(), code, "{err:?}");
            assert_eq!(err.status_code(), status, "{err:?}");
        }
    }

    #[test]
    fn not_found_message_mentions_resource_and_id() {
        let err = BriqError::not_found("Workspace", Some("abc".to_owned()));
        assert_eq!(err.to_string(), "Workspace with ID 'abc' not found");
        let details = err.details().unwrap();
        assert_eq!(details["resource"], "Workspace");
        assert_eq!(details["id"], "abc");

        let err = BriqError::not_found("Resource", None);
        assert_eq!(err.to_string(), "Resource not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn timeout_message_and_details_carry_configured_value() {
        let err = BriqError::Timeout {
            timeout: Duration::from_millis(2500),
        };
        assert_eq!(err.to_string(), "Request timed out after 2500ms");
        assert_eq!(err.details().unwrap()["timeout"], 2500);
    }

    #[test]
    fn network_error_keeps_original_cause() {
        let err = BriqError::network("Network request failed", &"connection refused");
        assert_eq!(err.to_string(), "Network request failed");
        assert_eq!(
            err.details().unwrap()["originalError"],
            "connection refused"
        );
    }

    #[test]
    fn rate_limit_exposes_retry_after() {
        let err = BriqError::RateLimit {
            message: "slow down".to_owned(),
            retry_after: Some(30),
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(30)));
        assert_eq!(err.details().unwrap()["retryAfter"], 30);
    }

    #[test]
    fn validation_errors_convert_into_validation_kind() {
        let err: BriqError = ValidationError::EmptyUpdate.into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "update request cannot be empty");
    }
}
