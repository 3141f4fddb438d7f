//! Projects, their secrets and deployments (`ccd project`)

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::application::{ApiClient, ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    origin_url_from_git_config, parse_remote, DeployStatus, DomainError, DotEnv, Project,
    ProjectChanges, ResolvedRemote, Secret, TokenResponse,
};
use crate::infrastructure::traits::FileSystem;

/// Deployment lifecycle actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployAction {
    Start,
    Stop,
    Status,
}

impl DeployAction {
    fn path_segment(&self) -> &'static str {
        match self {
            DeployAction::Start => "start",
            DeployAction::Stop => "stop",
            DeployAction::Status => "status",
        }
    }
}

#[derive(Debug, Serialize)]
struct SecretUpdate<'a> {
    key: &'a str,
    value: &'a str,
}

/// Service for projects and everything hanging off them.
pub struct ProjectService {
    api: Arc<ApiClient>,
    fs: Arc<dyn FileSystem>,
}

impl ProjectService {
    pub fn new(api: Arc<ApiClient>, fs: Arc<dyn FileSystem>) -> Self {
        Self { api, fs }
    }

    pub fn list(&self, filter: &str) -> ApplicationResult<Vec<Project>> {
        Ok(self.api.list("project", &[("filter_by", filter)])?)
    }

    pub fn names(&self) -> ApplicationResult<Vec<String>> {
        Ok(self.list("")?.into_iter().map(|p| p.name).collect())
    }

    pub fn view(&self, name: &str) -> ApplicationResult<Value> {
        Ok(self.api.get_value(&format!("project/{name}"))?)
    }

    pub fn secrets(&self, name: &str) -> ApplicationResult<Vec<Secret>> {
        Ok(self.api.list(&format!("secret/{name}"), &[])?)
    }

    /// Resolve a user-supplied remote.
    ///
    /// A local directory is replaced by its `origin` URL; anything else
    /// goes through shorthand expansion.
    pub fn resolve_remote(
        &self,
        remote: &str,
        branch: Option<&str>,
    ) -> ApplicationResult<ResolvedRemote> {
        if remote.trim().is_empty() {
            return Err(DomainError::MissingRemote.into());
        }

        let dir = Path::new(remote);
        if !self.fs.is_dir(dir) {
            return Ok(parse_remote(remote, branch));
        }

        let git_config = dir.join(".git").join("config");
        if !self.fs.is_file(&git_config) {
            return Err(DomainError::NoOriginRemote(git_config).into());
        }
        let content = self
            .fs
            .read_to_string(&git_config)
            .with_path_context("read git config", &git_config)?;
        let url = origin_url_from_git_config(&content)
            .ok_or_else(|| DomainError::NoOriginRemote(git_config.clone()))?;
        debug!("found remote origin: {}", url);

        Ok(ResolvedRemote {
            remote: url,
            branch: branch.map(str::to_string),
        })
    }

    pub fn create(&self, project: &ProjectChanges) -> ApplicationResult<Value> {
        debug!("create project {:?}", project);
        Ok(self.api.create("project", project)?)
    }

    pub fn update(&self, name: &str, changes: &ProjectChanges) -> ApplicationResult<Value> {
        if changes.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "nothing to update".to_string(),
            ));
        }
        Ok(self.api.update(&format!("project/{name}"), changes)?)
    }

    pub fn delete(&self, name: &str) -> ApplicationResult<Value> {
        Ok(self.api.delete(&format!("project/{name}"))?)
    }

    /// Create or replace one secret. The key is sent as given.
    pub fn set_secret(&self, project: &str, key: &str, value: &str) -> ApplicationResult<Secret> {
        let path = format!("secret/{project}");
        let response = self.api.update(&path, &SecretUpdate { key, value })?;
        Ok(crate::application::api::decode(&path, response)?)
    }

    pub fn unset_secret(&self, project: &str, key: &str) -> ApplicationResult<Value> {
        Ok(self.api.delete(&format!("secret/{project}/{key}"))?)
    }

    /// Read and parse a dotenv file for secret import.
    pub fn read_env_file(&self, path: &Path) -> ApplicationResult<DotEnv> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read env file", path)?;
        Ok(DotEnv::parse(&content, path)?)
    }

    pub fn deploy(&self, name: &str, action: DeployAction) -> ApplicationResult<DeployStatus> {
        debug!("deploy {} {:?}", name, action);
        Ok(self
            .api
            .get(&format!("deploy/{name}/{}", action.path_segment()))?)
    }

    pub fn status(&self, name: &str) -> ApplicationResult<DeployStatus> {
        Ok(self.api.get(&format!("project/{name}/status"))?)
    }

    pub fn refresh_token(&self, name: &str) -> ApplicationResult<TokenResponse> {
        Ok(self.api.get(&format!("project/{name}/refresh-token"))?)
    }

    /// Webhook that triggers a deployment with the given token.
    pub fn webhook_url(&self, token: &str) -> String {
        format!("{}/webhook/project/{}", self.api.base_url(), token)
    }
}
