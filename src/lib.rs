//! This crate implements a small backend service for tracking blockchain validator keys.
//! It records validator public keys with their blockchain, network and client metadata
//! and a free-form lifecycle status, persists them in SQLite and exposes them over HTTP.

pub mod types; // Validator entity, list filter and error types.
pub mod validation; // Syntactic checks on validator pubkeys.
pub mod registry; // SQL persistence behind the ValidatorRepository trait.
pub mod service; // Business rules on top of the registry.
pub mod api; // HTTP router and server.
pub mod config; // Defines and loads system configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use service::ValidatorService;
