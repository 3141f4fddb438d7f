//! Git authentication keys (`ccd auth`)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::application::{ApiClient, ApplicationResult, IoResultExt};
use crate::domain::{normalize_key_name, AuthKey, AuthType, NewAuthKey};
use crate::infrastructure::traits::FileSystem;

/// Where the key material for a new auth key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Import an existing SSH private key from a file
    Import(PathBuf),
    /// Let the service generate an SSH key pair
    GenerateSsh,
    /// Personal access token
    Pat(String),
}

/// Service for git authentication keys.
pub struct AuthService {
    api: Arc<ApiClient>,
    fs: Arc<dyn FileSystem>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, fs: Arc<dyn FileSystem>) -> Self {
        Self { api, fs }
    }

    pub fn list(&self, filter: &str) -> ApplicationResult<Vec<AuthKey>> {
        Ok(self.api.list("auth", &[("filter_by", filter)])?)
    }

    pub fn names(&self) -> ApplicationResult<Vec<String>> {
        Ok(self.list("")?.into_iter().map(|k| k.name).collect())
    }

    pub fn view(&self, name: &str) -> ApplicationResult<Value> {
        Ok(self.api.get_value(&format!("auth/{name}"))?)
    }

    /// Build the creation request.
    ///
    /// Imported keys are named after their file unless a name is given.
    pub fn prepare(&self, name: Option<&str>, source: KeySource) -> ApplicationResult<NewAuthKey> {
        let (auth_type, auth_key, default_name) = match source {
            KeySource::Import(path) => {
                let content = self
                    .fs
                    .read_to_string(&path)
                    .with_path_context("read key file", &path)?;
                (AuthType::Ssh, Some(content), file_name(&path))
            }
            KeySource::GenerateSsh => (AuthType::Ssh, None, None),
            KeySource::Pat(token) => (AuthType::Pat, Some(token), None),
        };

        Ok(NewAuthKey {
            name: name
                .map(str::to_string)
                .or(default_name)
                .map(|n| normalize_key_name(&n)),
            auth_type,
            auth_key,
        })
    }

    pub fn create(&self, key: &NewAuthKey) -> ApplicationResult<Value> {
        debug!("create auth key name={:?} type={}", key.name, key.auth_type);
        Ok(self.api.create("auth", key)?)
    }

    pub fn delete(&self, name: &str) -> ApplicationResult<Value> {
        Ok(self.api.delete(&format!("auth/{name}"))?)
    }
}

/// Public half of a generated SSH key, if the response carries one.
pub fn public_key_of(created: &Value) -> Option<&str> {
    created
        .get("public_key")
        .and_then(Value::as_str)
        .filter(|k| !k.is_empty())
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
