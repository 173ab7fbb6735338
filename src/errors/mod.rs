//! Unified error handling with consistent API response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error detail in the API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            error: None,
        })
    }

    /// Wrap an error in the envelope.
    pub fn error(code: &str, message: &str) -> Json<Self> {
        Json(Self {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        })
    }
}

/// Broad failure class used in refresh status reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Connection,
    DataShape,
    Database,
    Other,
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Dashboard unavailable: {0}")]
    Unavailable(String),

    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    #[error("Malformed data: {0}")]
    DataShape(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if the backing store could not be reached.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::ConnectionFailure(_))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectionFailure(_) => ErrorKind::Connection,
            Self::DataShape(_) => ErrorKind::DataShape,
            Self::Database(_) => ErrorKind::Database,
            _ => ErrorKind::Other,
        }
    }
}

/// SQLSTATE classes that mean the server could not be used at all:
/// connection exceptions (08), authorization (28), and resource or operator
/// intervention (53, 57).
const CONNECTION_STATE_CLASSES: [&str; 4] = ["08", "28", "53", "57"];

/// SQLSTATE codes for a table or column that does not match the model.
const SHAPE_STATE_CODES: [&str; 3] = ["42P01", "42703", "42804"];

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Configuration(_) => AppError::ConnectionFailure(err.to_string()),
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. } => AppError::DataShape(err.to_string()),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
                if CONNECTION_STATE_CLASSES.iter().any(|class| code.starts_with(class)) {
                    AppError::ConnectionFailure(err.to_string())
                } else if SHAPE_STATE_CODES.contains(&code.as_str()) {
                    AppError::DataShape(err.to_string())
                } else {
                    AppError::Database(err)
                }
            }
            _ => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "DASHBOARD_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::ConnectionFailure(msg) => {
                tracing::warn!(error = %msg, "Sightings store unreachable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "CONNECTION_FAILURE",
                    "The sightings database is unreachable".to_string(),
                )
            }
            AppError::DataShape(msg) => {
                tracing::error!(error = %msg, "Malformed sightings data");
                (StatusCode::INTERNAL_SERVER_ERROR, "DATA_SHAPE", msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Configuration(msg) | AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()> {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message,
            }),
        };

        (status, Json(body)).into_response()
    }
}
