//! Secret Sidecar - serves preloaded secrets over a local HTTP interface.
//!
//! Secrets are loaded once at startup from a single backend (env file or
//! AWS SSM Parameter Store) into an immutable in-memory store, then served
//! one per `GET /{key}` request.

pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod server;
pub mod store;

pub use config::{BackendConfig, SecretsSource};
pub use error::{FetchError, LoadError};
pub use loader::{load, LoadReport};
pub use server::SidecarServer;
pub use store::SecretStore;
