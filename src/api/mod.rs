//! API Module
//! 
//! This module exposes the validator service over HTTP.
//! It wires the axum router, maps service errors to status codes,
//! and provides the health check used by deployments.

mod error;
mod handlers;
mod server;

#[cfg(test)]
mod tests;

pub use error::ApiError;
pub use server::{router, AppState, Server};
