//! Validator Registry Module
//! 
//! This module persists validators in a relational store.
//! The service layer talks to storage only through the `ValidatorRepository` trait,
//! so the SQLite implementation can be swapped for a mock in tests.

mod database;
mod schema;


use crate::{Validator, ValidatorError, ValidatorFilter};
use async_trait::async_trait;

pub use database::SqliteValidatorRepository;
pub use schema::{connect, init_schema, is_in_memory, ping};

/// Storage capability for validators
///
/// Every method maps to exactly one SQL statement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValidatorRepository: Send + Sync {
    /// Insert a validator
    ///
    /// Storage assigns `id`, `created_at` and `updated_at` and writes them back
    /// into `validator`. Fails with `ConstraintViolation` if the pubkey exists.
    async fn create(&self, validator: &mut Validator) -> Result<(), ValidatorError>;

    /// Fetch the validator with exactly this pubkey, or `NotFound`
    async fn get_by_pubkey(&self, pubkey: &str) -> Result<Validator, ValidatorError>;

    /// List validators matching every predicate present in `filter`
    async fn list(&self, filter: &ValidatorFilter) -> Result<Vec<Validator>, ValidatorError>;

    /// Overwrite the status and refresh `updated_at`, or `NotFound` if no row matched
    async fn update_status(&self, pubkey: &str, status: &str) -> Result<(), ValidatorError>;
}
