//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{
    AuthService, PageService, ProjectService, RedirectService, RemoteConfigService,
};
use crate::application::ApiClient;
use crate::config::Settings;
use crate::infrastructure::traits::{
    DialoguerInput, FileSystem, HttpTransport, Launcher, RealFileSystem, Selector, SkimSelector,
    SystemLauncher, TextInput,
};
use crate::infrastructure::{InfraResult, ReqwestTransport};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Shared API client
    pub api: Arc<ApiClient>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Interactive list selection
    pub selector: Arc<dyn Selector>,

    /// Free-text prompts
    pub input: Arc<dyn TextInput>,

    /// Browser launcher
    pub launcher: Arc<dyn Launcher>,

    pub config: RemoteConfigService,
    pub auth: AuthService,
    pub projects: ProjectService,
    pub pages: PageService,
    pub redirects: RedirectService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let transport = ReqwestTransport::new(settings.timeout)?;
        Ok(Self::with_deps(
            settings,
            Arc::new(transport),
            Arc::new(RealFileSystem),
            Arc::new(SkimSelector),
            Arc::new(DialoguerInput),
            Arc::new(SystemLauncher),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        transport: Arc<dyn HttpTransport>,
        fs: Arc<dyn FileSystem>,
        selector: Arc<dyn Selector>,
        input: Arc<dyn TextInput>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        let settings = Arc::new(settings);
        let api = Arc::new(ApiClient::new(
            settings.api_url.clone(),
            settings.api_key.clone(),
            transport,
        ));

        Self {
            config: RemoteConfigService::new(api.clone()),
            auth: AuthService::new(api.clone(), fs.clone()),
            projects: ProjectService::new(api.clone(), fs.clone()),
            pages: PageService::new(api.clone(), fs.clone()),
            redirects: RedirectService::new(api.clone()),
            settings,
            api,
            fs,
            selector,
            input,
            launcher,
        }
    }
}
