//! Request handlers
//! 
//! Each handler decodes its input, calls the validator service under the
//! configured request timeout, and serializes the result.

use super::{server::AppState, ApiError};
use crate::{validation::validate_format, NewValidator, Validator, ValidatorFilter};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::future::Future;
use tracing::info;

/// Body of a status update request
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Run a service call, giving up after the configured timeout
async fn bounded<T, E>(
    state: &AppState,
    call: impl Future<Output = Result<T, E>>,
) -> Result<T, ApiError>
where
    ApiError: From<E>,
{
    match tokio::time::timeout(state.request_timeout, call).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => Err(ApiError::Timeout),
    }
}

pub async fn root() -> &'static str {
    "Validator Key Manager Service"
}

/// Health check: 200 if the database answers, 500 otherwise
pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    match crate::registry::ping(&state.pool).await {
        Ok(()) => (StatusCode::OK, "ok".to_string()),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Database connection error: {e}"),
        ),
    }
}

/// Validate, check for duplicates, then store a new validator
pub async fn create_validator(
    State(state): State<AppState>,
    payload: Result<Json<NewValidator>, JsonRejection>,
) -> Result<(StatusCode, Json<Validator>), ApiError> {
    let Json(payload) = payload?;
    info!("Creating validator {}", payload.pubkey);

    validate_format(&payload.pubkey)?;
    bounded(&state, state.service.check_duplicate(&payload.pubkey)).await?;

    let mut validator = Validator::from(payload);
    bounded(&state, state.service.create_validator(&mut validator)).await?;

    info!("Validator {} created with id {}", validator.pubkey, validator.id);
    Ok((StatusCode::CREATED, Json(validator)))
}

pub async fn get_validator(
    State(state): State<AppState>,
    Path(pubkey): Path<String>,
) -> Result<Json<Validator>, ApiError> {
    let validator = bounded(&state, state.service.get_validator_by_pubkey(&pubkey)).await?;
    Ok(Json(validator))
}

pub async fn list_validators(
    State(state): State<AppState>,
    Query(filter): Query<ValidatorFilter>,
) -> Result<Json<Vec<Validator>>, ApiError> {
    let validators = bounded(&state, state.service.list_validators(&filter)).await?;
    Ok(Json(validators))
}

pub async fn update_validator_status(
    State(state): State<AppState>,
    Path(pubkey): Path<String>,
    update: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(update) = update?;
    info!("Setting status of {} to {}", pubkey, update.status);

    bounded(
        &state,
        state.service.update_validator_status(&pubkey, &update.status),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
