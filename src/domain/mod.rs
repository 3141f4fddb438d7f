//! Domain layer: entities and pure transformations
//!
//! This layer is independent of external concerns (no I/O, no HTTP, no config loading).

pub mod entities;
pub mod envfile;
pub mod error;
pub mod humanize;
pub mod remote;

pub use entities::*;
pub use envfile::{expand_path, DotEnv};
pub use error::DomainError;
pub use humanize::{natural_time, parse_timestamp, time_since};
pub use remote::{display_remote, origin_url_from_git_config, parse_remote, ResolvedRemote};
