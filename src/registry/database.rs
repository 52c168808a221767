//! SQLite-backed validator repository

use super::ValidatorRepository;
use crate::{Validator, ValidatorError, ValidatorFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

const SELECT_COLUMNS: &str = "SELECT id, pubkey, blockchain, blockchain_network, status, client, \
                              created_at, updated_at FROM validators";

/// Validator repository over a sqlx SQLite pool
///
/// Cloning is cheap; clones share the same pool.
#[derive(Clone)]
pub struct SqliteValidatorRepository {
    pool: SqlitePool,
}

impl SqliteValidatorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ValidatorRepository for SqliteValidatorRepository {
    async fn create(&self, validator: &mut Validator) -> Result<(), ValidatorError> {
        let now = Utc::now();

        let (id, created_at, updated_at): (i64, DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO validators
                (pubkey, blockchain, blockchain_network, status, client, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING id, created_at, updated_at",
        )
        .bind(&validator.pubkey)
        .bind(&validator.blockchain)
        .bind(&validator.blockchain_network)
        .bind(&validator.status)
        .bind(&validator.client)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                ValidatorError::ConstraintViolation {
                    pubkey: validator.pubkey.clone(),
                }
            }
            other => ValidatorError::Storage {
                context: "failed to create validator",
                source: other,
            },
        })?;

        validator.id = id;
        validator.created_at = created_at;
        validator.updated_at = updated_at;

        debug!("Created validator {} with id {}", validator.pubkey, id);
        Ok(())
    }

    async fn get_by_pubkey(&self, pubkey: &str) -> Result<Validator, ValidatorError> {
        let query = format!("{SELECT_COLUMNS} WHERE pubkey = ?");

        sqlx::query_as::<_, Validator>(&query)
            .bind(pubkey)
            .fetch_optional(&self.pool)
            .await
            .map_err(ValidatorError::storage("failed to get validator"))?
            .ok_or_else(|| ValidatorError::NotFound {
                pubkey: pubkey.to_string(),
            })
    }

    async fn list(&self, filter: &ValidatorFilter) -> Result<Vec<Validator>, ValidatorError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_COLUMNS);
        builder.push(" WHERE 1=1");

        for (column, value) in filter.predicates() {
            // Column names come from a fixed list, values are always bound
            builder.push(format!(" AND {column} = ")).push_bind(value);
        }

        let validators = builder
            .build_query_as::<Validator>()
            .fetch_all(&self.pool)
            .await
            .map_err(ValidatorError::storage("failed to list validators"))?;

        debug!("Listed {} validators", validators.len());
        Ok(validators)
    }

    async fn update_status(&self, pubkey: &str, status: &str) -> Result<(), ValidatorError> {
        let result =
            sqlx::query("UPDATE validators SET status = ?, updated_at = ? WHERE pubkey = ?")
                .bind(status)
                .bind(Utc::now())
                .bind(pubkey)
                .execute(&self.pool)
                .await
                .map_err(ValidatorError::storage("failed to update validator status"))?;

        if result.rows_affected() == 0 {
            return Err(ValidatorError::NotFound {
                pubkey: pubkey.to_string(),
            });
        }

        debug!("Updated status of validator {} to {}", pubkey, status);
        Ok(())
    }
}
