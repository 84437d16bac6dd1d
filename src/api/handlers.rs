//! Route handlers
//!
//! Handlers parse the request, call the coordinator and wrap the outcome in
//! the response envelope. They never change transfer state themselves.

use super::params::{TransferQuery, TransferRequest};
use super::response::{
    ApiError, ServiceResponse, MSG_CANCELLED, MSG_CREATED, MSG_EXECUTED, MSG_NOT_CANCELLED,
    MSG_NOT_EXECUTED, MSG_RETRIEVED,
};
use super::state::AppState;
use crate::core::TransferCoordinator;
use crate::types::{FilterParams, Transfer, TransferError, TransferStatus};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

type Transition = fn(&TransferCoordinator, &str) -> Result<TransferStatus, TransferError>;

/// `POST /transfer`
pub async fn create_transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ServiceResponse>), ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::not_created(rejection.body_text()))?;

    let transfer = request
        .into_transfer_data()
        .and_then(|data| state.coordinator.create_transfer(data))
        .map_err(|err| match err {
            TransferError::Validation { message } => ApiError::not_created(message),
            other => ApiError::from(other),
        })?;

    let body = ServiceResponse::for_transfer(&transfer, MSG_CREATED)?;
    Ok((StatusCode::CREATED, Json(body)))
}

/// `GET /transfer`
pub async fn list_transfers(
    State(state): State<AppState>,
    query: Result<Query<TransferQuery>, QueryRejection>,
) -> Result<Json<Vec<Transfer>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let params = FilterParams::try_from(query)?;
    Ok(Json(state.coordinator.get_transfers(&params)))
}

/// `GET /transfer/{id}`
pub async fn get_transfer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceResponse>, ApiError> {
    let transfer = state
        .coordinator
        .get_transfer_details(&id)
        .ok_or_else(ApiError::not_found)?;
    Ok(Json(ServiceResponse::for_transfer(&transfer, MSG_RETRIEVED)?))
}

/// `PUT /transfer/{id}`
pub async fn execute_transfer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceResponse>, ApiError> {
    transition(
        &state,
        &id,
        TransferCoordinator::execute_transfer,
        MSG_EXECUTED,
        MSG_NOT_EXECUTED,
    )
}

/// `DELETE /transfer/{id}`
pub async fn cancel_transfer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceResponse>, ApiError> {
    transition(
        &state,
        &id,
        TransferCoordinator::cancel_transfer,
        MSG_CANCELLED,
        MSG_NOT_CANCELLED,
    )
}

/// `DELETE /deleteAllTransfers`
pub async fn delete_all_transfers(State(state): State<AppState>) -> StatusCode {
    state.coordinator.cleanup();
    StatusCode::OK
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run a state transition and report the transfer as it is afterwards
///
/// `ERROR` from the coordinator becomes a 409 carrying the unchanged transfer.
fn transition(
    state: &AppState,
    id: &str,
    operation: Transition,
    success: &str,
    failure: &str,
) -> Result<Json<ServiceResponse>, ApiError> {
    let coordinator = state.coordinator.as_ref();
    let outcome = operation(coordinator, id)?;
    let transfer = coordinator
        .get_transfer_details(id)
        .ok_or_else(ApiError::not_found)?;

    if outcome == TransferStatus::Error {
        return Err(ApiError::conflict(failure, &transfer)?);
    }
    Ok(Json(ServiceResponse::for_transfer(&transfer, success)?))
}
