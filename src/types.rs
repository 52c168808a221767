use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A validator key and its chain metadata, as persisted in the `validators` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Validator {
    pub id: i64,
    pub pubkey: String,
    pub blockchain: String,
    pub blockchain_network: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields of a validator that has not been stored yet
#[derive(Debug, Clone, Deserialize)]
pub struct NewValidator {
    pub pubkey: String,
    pub blockchain: String,
    pub blockchain_network: String,
    pub status: String,
    #[serde(default)]
    pub client: Option<String>,
}

impl From<NewValidator> for Validator {
    fn from(new: NewValidator) -> Self {
        Validator {
            pubkey: new.pubkey,
            blockchain: new.blockchain,
            blockchain_network: new.blockchain_network,
            status: new.status,
            client: new.client.filter(|c| !c.is_empty()),
            ..Default::default()
        }
    }
}

/// Optional equality predicates for listing validators
///
/// A field that is `None` or empty is ignored. Present fields are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ValidatorFilter {
    pub blockchain: Option<String>,
    pub blockchain_network: Option<String>,
    pub status: Option<String>,
    pub client: Option<String>,
}

impl ValidatorFilter {
    /// Column/value pairs of the predicates that actually apply
    pub fn predicates(&self) -> Vec<(&'static str, &str)> {
        [
            ("blockchain", &self.blockchain),
            ("blockchain_network", &self.blockchain_network),
            ("status", &self.status),
            ("client", &self.client),
        ]
        .into_iter()
        .filter_map(|(column, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((column, v)),
            _ => None,
        })
        .collect()
    }
}

/// Pubkey format errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("pubkey must start with 0x")]
    MissingPrefix,
    #[error("pubkey must be 48 bytes (96 hex characters) long, got {0} characters")]
    WrongLength(usize),
    #[error("invalid hex character in pubkey: {0}")]
    InvalidHexChar(char),
}

/// Errors returned by the repository and service layers
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("validator {pubkey} not found")]
    NotFound { pubkey: String },

    /// The storage unique constraint rejected an insert
    #[error("validator {pubkey} violates a storage constraint")]
    ConstraintViolation { pubkey: String },

    /// The service-level duplicate check found an existing row
    #[error("pubkey {pubkey} already exists")]
    Duplicate { pubkey: String },

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl ValidatorError {
    pub(crate) fn storage(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| ValidatorError::Storage { context, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ValidatorError::NotFound { .. })
    }
}
