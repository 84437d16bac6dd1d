//! Response envelope and HTTP error mapping
//!
//! Every endpoint except the listing and the bulk delete answers with a
//! [`ServiceResponse`]:
//!
//! ```json
//! { "status": "PENDING", "message": "Transfer successfully created", "data": { ... } }
//! ```
//!
//! Failures carry `"status": "ERROR"`. [`ApiError`] pairs such an envelope
//! with its HTTP status code and is what handlers return on the error path.

use crate::types::{Transfer, TransferError, TransferStatus};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

pub const MSG_CREATED: &str = "Transfer successfully created";
pub const MSG_NOT_CREATED: &str = "Error occurred. Transfer not created.";
pub const MSG_RETRIEVED: &str = "Transfer details successfully retrieved";
pub const MSG_NOT_FOUND: &str = "No transfer with such id found";
pub const MSG_EXECUTED: &str = "Transfer executed";
pub const MSG_NOT_EXECUTED: &str = "Transfer execution not possible";
pub const MSG_CANCELLED: &str = "Transfer cancelled";
pub const MSG_NOT_CANCELLED: &str = "Transfer cancellation not possible";
const MSG_INTERNAL: &str = "Internal server error";

/// JSON envelope `{status, message, data}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub status: TransferStatus,
    pub message: String,
    pub data: serde_json::Value,
}

impl ServiceResponse {
    pub fn new(status: TransferStatus, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            status,
            message: message.into(),
            data,
        }
    }

    /// Envelope carrying a transfer, with the transfer's own status
    ///
    /// # Errors
    ///
    /// Returns `TransferError::Internal` if the transfer cannot be serialized.
    pub fn for_transfer(transfer: &Transfer, message: &str) -> Result<Self, TransferError> {
        Ok(Self::new(transfer.status, message, serde_json::to_value(transfer)?))
    }

    /// `ERROR` envelope with no data
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(TransferStatus::Error, message, serde_json::Value::Null)
    }
}

/// Error response: an `ERROR` envelope plus its HTTP status
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ServiceResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, body: ServiceResponse) -> Self {
        Self { status, body }
    }

    /// 400 with the validation message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ServiceResponse::error(message))
    }

    /// 404 for an unknown transfer id
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, ServiceResponse::error(MSG_NOT_FOUND))
    }

    /// 409 carrying the unchanged transfer
    pub fn conflict(message: &str, transfer: &Transfer) -> Result<Self, TransferError> {
        let data = serde_json::to_value(transfer)?;
        Ok(Self::new(
            StatusCode::CONFLICT,
            ServiceResponse::new(TransferStatus::Error, message, data),
        ))
    }

    /// 400 for a rejected creation, the cause goes in `data`
    pub fn not_created(cause: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ServiceResponse::new(
                TransferStatus::Error,
                MSG_NOT_CREATED,
                serde_json::Value::String(cause.into()),
            ),
        )
    }

    /// 500 with a generic message
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ServiceResponse::error(MSG_INTERNAL),
        )
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Validation { message } => {
                warn!(%message, "Request rejected");
                ApiError::bad_request(message)
            }
            TransferError::NotFound { id } => {
                warn!(transfer_id = %id, "Transfer not found");
                ApiError::not_found()
            }
            conflict @ TransferError::Conflict { .. } => {
                let message = conflict.to_string();
                warn!(%message, "State conflict");
                ApiError::new(StatusCode::CONFLICT, ServiceResponse::error(message))
            }
            TransferError::Internal { message } => {
                error!(%message, "Internal error while handling request");
                ApiError::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
