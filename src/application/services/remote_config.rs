//! Server-side configuration (`ccd config`)

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::application::{ApiClient, ApplicationResult};
use crate::domain::ConfigEntry;

/// Keys the service is known to understand, offered as completion hints.
pub const KNOWN_CONFIG_KEYS: &[&str] = &["DISCORD_WEBHOOK"];

#[derive(Debug, Serialize)]
struct ConfigUpdate<'a> {
    key: &'a str,
    value: &'a str,
}

/// Service for the canary-cd global configuration store.
pub struct RemoteConfigService {
    api: Arc<ApiClient>,
}

impl RemoteConfigService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub fn list(&self) -> ApplicationResult<Vec<ConfigEntry>> {
        Ok(self.api.list("config", &[])?)
    }

    pub fn set(&self, key: &str, value: &str) -> ApplicationResult<Value> {
        debug!("set config key={}", key);
        Ok(self.api.update("config", &ConfigUpdate { key, value })?)
    }

    pub fn unset(&self, key: &str) -> ApplicationResult<Value> {
        debug!("unset config key={}", key);
        Ok(self.api.delete(&format!("config/{key}"))?)
    }
}
