//! Apiframe API client library
//!
//! Modules:
//! - `apiframe`: Thin async client, one method per Apiframe endpoint.
//! - `task`: Typed request bodies with documented defaults, plus the local
//!   validation rules every request passes before it is sent.
//! - `utils`: Accessors over the pass-through JSON responses.
//! - `config`: API key, base URL and verbosity, from code or the environment.
//! - `error`: Common error type and alias.
//!
//! Re-exports are provided for common types: `Config`, `ApiframeClient`,
//! `AppError` and the request structs.
pub mod apiframe;
pub mod task;
pub mod utils;
pub mod config;
pub mod error;

pub use config::Config;
pub use apiframe::client::ApiframeClient;
pub use error::{AppError, AppResult, ErrorKind};
pub use task::requests::*;
