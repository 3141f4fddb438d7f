//! Domain entities: wire shapes of the canary-cd resources
//!
//! The service owns these records; the client only reads the fields it
//! renders or needs for follow-up requests. Unknown fields are ignored.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Server-side configuration entry (`ccd config`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Kind of git authentication key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// SSH deploy key (generated by the service or imported)
    Ssh,
    /// Personal access token
    Pat,
}

impl AuthType {
    pub const ALL: [AuthType; 2] = [AuthType::Ssh, AuthType::Pat];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Ssh => "ssh",
            AuthType::Pat => "pat",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Git authentication key stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthKey {
    pub name: String,
    #[serde(default)]
    pub auth_type: Option<String>,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Request body for creating an auth key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAuthKey {
    pub name: Option<String>,
    pub auth_type: AuthType,
    pub auth_key: Option<String>,
}

/// Deployable project (a git remote plus branch and optional key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub remote: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Request body for creating or updating a project.
///
/// `None` fields are omitted so an update only touches what was given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.remote.is_none() && self.branch.is_none() && self.key.is_none()
    }
}

/// Project secret (environment variable injected at deploy time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Static page served under an FQDN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub fqdn: String,
    #[serde(default)]
    pub cors_hosts: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Host redirect (source FQDN to destination FQDN).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Container row of a deployment status (docker-style capitalised fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Image", default)]
    pub image: Option<String>,
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
}

/// Deployment status or action result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployStatus {
    #[serde(default)]
    pub ps: Option<Vec<Container>>,
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl DeployStatus {
    /// Log output split into lines.
    pub fn log_lines(&self) -> Vec<&str> {
        self.logs
            .as_deref()
            .map(|l| l.split('\n').collect())
            .unwrap_or_default()
    }
}

/// Freshly generated deploy token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// `KEY=VALUE` secret assignment from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretAssignment {
    pub key: String,
    pub value: String,
}

impl SecretAssignment {
    /// Parse `KEY=VALUE`, splitting on the first `=`. The key is upper-cased.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidAssignment(raw.to_string()))?;
        if key.trim().is_empty() {
            return Err(DomainError::InvalidAssignment(raw.to_string()));
        }
        Ok(Self {
            key: key.trim().to_uppercase(),
            value: value.to_string(),
        })
    }
}

/// Normalize a project name: `.` means the current directory's name and
/// path separators become dashes.
pub fn normalize_project_name(raw: &str, cwd: &Path) -> String {
    let name = if raw == "." {
        cwd.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| raw.to_string())
    } else {
        raw.to_string()
    };
    name.replace('/', "-")
}

/// Normalize an auth key name: spaces become underscores.
pub fn normalize_key_name(raw: &str) -> String {
    raw.replace(' ', "_")
}
