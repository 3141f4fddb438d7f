//! Application layer: API client and per-resource services
//!
//! This layer turns command intents into canary-cd API calls and depends
//! on I/O boundary traits rather than concrete transports.

pub mod api;
pub mod error;
pub mod error_ext;
pub mod services;

pub use api::{detail_of, ApiClient, ApiError};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
