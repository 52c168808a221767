use crate::{registry::ValidatorRepository, Validator, ValidatorError, ValidatorFilter};
use std::sync::Arc;

/// Orchestrates validator operations over a repository
///
/// Holds no mutable state of its own; clones share the repository.
#[derive(Clone)]
pub struct ValidatorService {
    repo: Arc<dyn ValidatorRepository>,
}

impl ValidatorService {
    pub fn new(repo: Arc<dyn ValidatorRepository>) -> Self {
        Self { repo }
    }

    /// Store a new validator; id and timestamps are written back into `validator`
    pub async fn create_validator(&self, validator: &mut Validator) -> Result<(), ValidatorError> {
        self.repo.create(validator).await
    }

    pub async fn get_validator_by_pubkey(&self, pubkey: &str) -> Result<Validator, ValidatorError> {
        self.repo.get_by_pubkey(pubkey).await
    }

    pub async fn list_validators(
        &self,
        filter: &ValidatorFilter,
    ) -> Result<Vec<Validator>, ValidatorError> {
        self.repo.list(filter).await
    }

    pub async fn update_validator_status(
        &self,
        pubkey: &str,
        status: &str,
    ) -> Result<(), ValidatorError> {
        self.repo.update_status(pubkey, status).await
    }

    /// Check that no validator with `pubkey` exists yet
    ///
    /// Advisory only: a concurrent insert can still win the race, in which case
    /// `create_validator` fails with `ConstraintViolation`.
    pub async fn check_duplicate(&self, pubkey: &str) -> Result<(), ValidatorError> {
        match self.repo.get_by_pubkey(pubkey).await {
            Ok(_) => Err(ValidatorError::Duplicate {
                pubkey: pubkey.to_string(),
            }),
            Err(ValidatorError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
