use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use model::ValidationErrors;
use persistence::PersistenceError;

use crate::dto::{ErrorDto, FieldErrorDto};
use crate::service::ServiceError;

/// Failure of a request, already classified for HTTP.
/// Storage details are kept out of the response body and only logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<PersistenceError> for ApiError {
    fn from(e: PersistenceError) -> Self {
        match e {
            PersistenceError::NotFound(id) => Self::NotFound(format!("Customer {id} not found")),
            PersistenceError::Conflict { expected, actual, .. } => Self::Conflict(format!(
                "Customer was modified concurrently: expected version {expected}, current version is {actual}"
            )),
            PersistenceError::DuplicateKey(_) => Self::Conflict("A customer with this mail already exists".into()),
            PersistenceError::StorageUnavailable(detail) => Self::Unavailable(detail),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(v) => Self::Validation(v),
            ServiceError::Persistence(p) => p.into(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = ErrorDto { description: String::new(), time: Utc::now(), field_errors: Vec::new(), correlation_id: None };
        match self {
            Self::Validation(v) => {
                body.description = "Validation failed".into();
                body.field_errors = v.into_violations().into_iter().map(FieldErrorDto::from).collect();
            }
            Self::BadRequest(msg) | Self::NotFound(msg) | Self::Conflict(msg) => body.description = msg,
            Self::Unavailable(detail) => {
                let cid = Uuid::new_v4();
                warn!(correlation_id = %cid, error = %detail, "storage unavailable");
                body.description = "Storage is temporarily unavailable".into();
                body.correlation_id = Some(cid);
            }
            Self::Internal(detail) => {
                let cid = Uuid::new_v4();
                error!(correlation_id = %cid, error = %detail, "unhandled error");
                body.description = "An unexpected error occurred".into();
                body.correlation_id = Some(cid);
            }
        }
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage initialisation failed: {0}")]
    Storage(#[from] PersistenceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
