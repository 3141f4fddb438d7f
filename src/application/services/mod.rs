//! Application services
//!
//! One service per canary-cd resource group. Services depend on the
//! shared [`ApiClient`](crate::application::ApiClient) and on I/O boundary
//! traits, but are themselves concrete structs, not traits.

mod auth;
mod completion;
mod page;
mod project;
mod redirect;
mod remote_config;

pub use auth::{public_key_of, AuthService, KeySource};
pub use completion::{detect_shell, CompletionInstall, CompletionService};
pub use page::PageService;
pub use project::{DeployAction, ProjectService};
pub use redirect::RedirectService;
pub use remote_config::{RemoteConfigService, KNOWN_CONFIG_KEYS};
