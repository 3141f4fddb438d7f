//! Host redirects (`ccd redirect`)

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::application::{ApiClient, ApplicationResult};
use crate::domain::Redirect;

#[derive(Debug, Serialize)]
pub(crate) struct NewRedirect<'a> {
    pub source: &'a str,
    pub destination: &'a str,
}

#[derive(Debug, Serialize)]
struct RedirectTarget<'a> {
    destination: &'a str,
}

/// Service for source → destination host redirects.
pub struct RedirectService {
    api: Arc<ApiClient>,
}

impl RedirectService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub fn list(&self) -> ApplicationResult<Vec<Redirect>> {
        Ok(self.api.list("redirect", &[])?)
    }

    pub fn create(&self, source: &str, destination: &str) -> ApplicationResult<Value> {
        Ok(self
            .api
            .create("redirect", &NewRedirect { source, destination })?)
    }

    pub fn update(&self, source: &str, destination: &str) -> ApplicationResult<Value> {
        Ok(self
            .api
            .update(&format!("redirect/{source}"), &RedirectTarget { destination })?)
    }

    pub fn delete(&self, source: &str) -> ApplicationResult<Value> {
        Ok(self.api.delete(&format!("redirect/{source}"))?)
    }
}
