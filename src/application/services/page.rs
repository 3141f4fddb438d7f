//! Static pages (`ccd page`)

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::application::services::redirect::NewRedirect;
use crate::application::{ApiClient, ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Page, TokenResponse};
use crate::infrastructure::traits::FileSystem;

#[derive(Debug, Serialize)]
struct NewPage<'a> {
    fqdn: &'a str,
    cors_hosts: Option<String>,
}

/// Service for static pages served by canary-cd.
pub struct PageService {
    api: Arc<ApiClient>,
    fs: Arc<dyn FileSystem>,
}

impl PageService {
    pub fn new(api: Arc<ApiClient>, fs: Arc<dyn FileSystem>) -> Self {
        Self { api, fs }
    }

    pub fn list(&self) -> ApplicationResult<Vec<Page>> {
        Ok(self.api.list("page", &[])?)
    }

    pub fn names(&self) -> ApplicationResult<Vec<String>> {
        Ok(self.list()?.into_iter().map(|p| p.fqdn).collect())
    }

    /// Create a page. CORS hosts are sent comma-joined, or `null` if none.
    pub fn create(&self, fqdn: &str, cors_hosts: &[String]) -> ApplicationResult<Value> {
        let cors_hosts = (!cors_hosts.is_empty()).then(|| cors_hosts.join(","));
        Ok(self.api.create("page", &NewPage { fqdn, cors_hosts })?)
    }

    /// Redirect `source` to the page.
    pub fn add_redirect(&self, fqdn: &str, source: &str) -> ApplicationResult<Value> {
        Ok(self.api.create(
            "redirect",
            &NewRedirect {
                source,
                destination: fqdn,
            },
        )?)
    }

    pub fn delete(&self, fqdn: &str) -> ApplicationResult<Value> {
        Ok(self.api.delete(&format!("page/{fqdn}"))?)
    }

    pub fn refresh_token(&self, fqdn: &str) -> ApplicationResult<TokenResponse> {
        Ok(self.api.get(&format!("page/{fqdn}/refresh-token"))?)
    }

    /// Upload a page archive. Directories must be archived first.
    pub fn deploy(&self, fqdn: &str, archive: &Path) -> ApplicationResult<Value> {
        if self.fs.is_dir(archive) {
            return Err(ApplicationError::InvalidInput(format!(
                "{} is a directory; archive it first (tar cvf payload.tar {})",
                archive.display(),
                archive.display()
            )));
        }
        let bytes = self
            .fs
            .read(archive)
            .with_path_context("read page archive", archive)?;
        debug!("uploading {} bytes for {}", bytes.len(), fqdn);
        Ok(self.api.upload(&format!("upload/{fqdn}"), bytes)?)
    }

    pub fn page_url(&self, fqdn: &str) -> String {
        format!("https://{fqdn}/")
    }
}
