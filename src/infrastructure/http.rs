//! Blocking HTTP transport backed by reqwest

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, trace};

use crate::infrastructure::traits::{ApiRequest, ApiResponse, Body, HttpTransport, Method};
use crate::infrastructure::{InfraError, InfraResult};

/// Real transport: one reqwest blocking client per process.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> InfraResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ccd/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InfraError::Http {
                message: format!("build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, String> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let bearer = HeaderValue::from_str(&format!("Bearer {}", request.bearer))
            .map_err(|e| format!("invalid API key: {e}"))?;

        let mut builder = self
            .client
            .request(method, request.url.clone())
            .header(AUTHORIZATION, bearer)
            .header(ACCEPT, "application/json");

        builder = match &request.body {
            Some(Body::Json(value)) => builder.json(value),
            Some(Body::Raw(bytes)) => builder
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(bytes.clone()),
            None => builder,
        };

        let response = builder.send().map_err(describe_send_error)?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| format!("read response body: {e}"))?;

        debug!("{} {} -> {}", request.method, request.url, status);
        // bodies carry secret values and deploy tokens
        trace!("response body: {} bytes", body.len());
        Ok(ApiResponse { status, body })
    }
}

fn describe_send_error(e: reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}
