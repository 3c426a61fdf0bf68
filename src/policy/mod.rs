//! Settings and the credential boundary.
//!
//! Submodules:
//! - `config`: output location and fact stamping, from defaults, TOML and environment
//! - `credentials`: whitelist of arguments copied into undo tasks

pub mod config;
pub mod credentials;

pub use config::Settings;
pub use credentials::CredentialPolicy;
