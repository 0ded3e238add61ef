use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::error::{BriqError, Details};
use super::http::HttpResponse;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
/// Normalized success envelope.
///
/// Bodies that already carry a `success` field are used as-is; any other successful body
/// is wrapped as `{ "success": true, "data": <body> }`. A non-boolean `success` is read
/// by truthiness: `null`, `0`, `""` and `"false"` read as `false`.
pub struct ApiResponse<T = Value> {
    #[serde(deserialize_with = "lenient_success")]
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Remaining top-level fields of the envelope (e.g. `pagination`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> ApiResponse<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
            error: self.error,
            timestamp: self.timestamp,
            extra: self.extra,
        }
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

fn lenient_success<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Value::deserialize(deserializer).map(|value| truthy(&value))
}

/// `null`, `0`, `""` and `"false"` (any case) are false; every other value is true.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => {
            let text = text.trim();
            !(text.is_empty() || text == "0" || text.eq_ignore_ascii_case("false"))
        }
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Turn a raw response into either a typed envelope or a [`BriqError`].
pub(crate) fn interpret<T: DeserializeOwned>(
    response: HttpResponse,
) -> Result<ApiResponse<T>, BriqError> {
    let status = response.status;
    let body = parse_body(&response.body).ok_or_else(|| BriqError::Server {
        message: "Invalid JSON response from server".to_owned(),
        status,
        details: Some(status_details(status, Value::String(response.body.clone()))),
    })?;

    if !(200..300).contains(&status) {
        return Err(error_from_response(&response, body));
    }

    let envelope = match body {
        Value::Object(map) if map.contains_key("success") => Value::Object(map),
        other => {
            let mut map = Map::new();
            map.insert("success".to_owned(), Value::Bool(true));
            map.insert("data".to_owned(), other);
            Value::Object(map)
        }
    };

    serde_json::from_value(envelope).map_err(|err| BriqError::Server {
        message: format!("Unexpected response payload: {err}"),
        status,
        details: None,
    })
}

fn parse_body(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return Some(Value::Object(Map::new()));
    }
    serde_json::from_str(body).ok()
}

fn error_from_response(response: &HttpResponse, body: Value) -> BriqError {
    let status = response.status;
    let message = body_text(&body, "message")
        .or_else(|| body_text(&body, "error"))
        .unwrap_or_else(|| format!("HTTP {status} error"));
    let details = Some(status_details(status, body));

    match status {
        400 => BriqError::Validation { message, details },
        401 => BriqError::Authentication { message, details },
        403 => BriqError::Authorization { message, details },
        404 => BriqError::not_found("Resource", None),
        429 => BriqError::RateLimit {
            message,
            retry_after: response.header("retry-after").and_then(parse_retry_after),
        },
        _ => BriqError::Server {
            message,
            status,
            details,
        },
    }
}

fn body_text(body: &Value, field: &str) -> Option<String> {
    body.get(field)?.as_str().map(str::to_owned)
}

fn status_details(status: u16, response: Value) -> Details {
    let status_text = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or_default();

    let mut details = Details::new();
    details.insert("statusCode".to_owned(), Value::from(status));
    details.insert("statusText".to_owned(), Value::String(status_text.to_owned()));
    details.insert("response".to_owned(), response);
    details
}

/// Integer seconds from the leading digits of a `Retry-After` value.
fn parse_retry_after(value: &str) -> Option<u64> {
    let value = value.trim();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().ok()
}
