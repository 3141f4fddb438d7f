//! canary-cd API client
//!
//! Builds request URLs from the configured base URL, attaches the bearer
//! token and turns error responses into [`ApiError`]s carrying the
//! service's `detail` message.

use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::infrastructure::traits::{ApiRequest, ApiResponse, Body, HttpTransport, Method};

/// Errors returned by the canary-cd API or while talking to it.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("cannot reach canary-cd at {url}: {message}")]
    Transport { url: String, message: String },

    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    // field messages are reported separately, see `CliError::details`
    #[error("validation failed ({status})")]
    Validation { status: u16, errors: Vec<String> },

    #[error("unexpected response ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("cannot decode response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("invalid API URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

/// Client for the canary-cd HTTP API.
pub struct ApiClient {
    base_url: String,
    api_key: String,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            api_key: api_key.into(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join `path` onto the base URL and append percent-encoded query pairs.
    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Body>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path, query)?;
        debug!("{} {}", method, url);

        let request = ApiRequest {
            method,
            url,
            bearer: self.api_key.clone(),
            body,
        };
        let response = self
            .transport
            .send(&request)
            .map_err(|message| ApiError::Transport {
                url: self.base_url.clone(),
                message,
            })?;

        if response.status >= 400 {
            return Err(classify_error(response));
        }
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// `GET path` returning raw JSON.
    pub fn get_value(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::Get, path, &[], None)
    }

    /// `GET path` deserialized into `T`.
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode(path, self.get_value(path)?)
    }

    /// `GET path?query` for list endpoints. A `null` body is an empty list.
    pub fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, ApiError> {
        match self.request(Method::Get, path, query, None)? {
            Value::Null => Ok(Vec::new()),
            value => decode(path, value),
        }
    }

    /// `POST path` with a JSON body.
    pub fn create<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.request(Method::Post, path, &[], Some(Body::Json(to_json(path, body)?)))
    }

    /// `PUT path` with a JSON body.
    pub fn update<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        self.request(Method::Put, path, &[], Some(Body::Json(to_json(path, body)?)))
    }

    /// `DELETE path`.
    pub fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::Delete, path, &[], None)
    }

    /// `POST path` with raw bytes as the body.
    pub fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<Value, ApiError> {
        self.request(Method::Post, path, &[], Some(Body::Raw(bytes)))
    }
}

/// Deserialize a JSON value into `T`, reporting the endpoint on failure.
pub fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn to_json<B: Serialize>(path: &str, body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: format!("encode request: {e}"),
    })
}

/// `detail` message of a successful response, if the service sent one.
pub fn detail_of(value: &Value) -> Option<&str> {
    value.get("detail").and_then(Value::as_str)
}

/// Map an error response onto an [`ApiError`].
///
/// FastAPI-style bodies carry `detail` either as a message string or as a
/// list of `{loc, msg}` validation entries.
fn classify_error(response: ApiResponse) -> ApiError {
    let status = response.status;
    let parsed: Option<Value> = serde_json::from_str(&response.body).ok();

    match parsed.as_ref().and_then(|v| v.get("detail")) {
        Some(Value::String(detail)) => ApiError::Rejected {
            status,
            detail: detail.clone(),
        },
        Some(Value::Array(entries)) if !entries.is_empty() => ApiError::Validation {
            status,
            errors: entries.iter().map(validation_message).collect(),
        },
        _ => ApiError::Status {
            status,
            body: response.body,
        },
    }
}

fn validation_message(entry: &Value) -> String {
    let msg = entry
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or("invalid value");
    let loc = entry.get("loc").and_then(Value::as_array);
    // loc is ["body", "<field>", ...]; the field is what the user typed
    let field = loc
        .and_then(|l| l.get(1).or_else(|| l.last()))
        .map(|f| match f {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
    match field {
        Some(field) => format!("{field}: {msg}"),
        None => msg.to_string(),
    }
}
