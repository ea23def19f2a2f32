//! Error types shared by the engine, the booking store and the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::services::allocation::Violation;

/// Expected, user-facing outcomes of the allocation engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// The candidate is structurally invalid.
    #[error("invalid booking: {}", join_violations(.0))]
    Validation(Vec<Violation>),

    /// The requested printer is already busy during the requested window.
    #[error("printer {printer} is already booked by ticket '{ticket}' from {start} to {end}")]
    Conflict {
        printer: String,
        ticket: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// Every printer of the class is busy during the requested window.
    #[error("no printer of class {class} is free from {start} to {end}")]
    NoCapacity {
        class: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// No booking with this ticket is stored under the given day.
    #[error("ticket '{ticket}' not found on {date}")]
    NotFound { ticket: String, date: NaiveDate },
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failures of the persistence collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("corrupt record in {path}: {reason}")]
    CorruptRecord { path: PathBuf, reason: String },

    #[error("failed to acquire storage lock: {0}")]
    Lock(String),
}

impl StorageError {
    /// Storage failures are transient from the caller's point of view.
    pub fn is_retryable(&self) -> bool {
        true
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
    #[serde(default)]
    pub retryable: bool,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            violations: Vec::new(),
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Allocation(AllocationError::Validation(violations)) => {
                let mut error = ApiError::new("VALIDATION_FAILED", "Booking request is invalid");
                error.violations = violations;
                (StatusCode::UNPROCESSABLE_ENTITY, error)
            }
            AppError::Allocation(e @ AllocationError::Conflict { .. }) => {
                (StatusCode::CONFLICT, ApiError::new("CONFLICT", e.to_string()))
            }
            AppError::Allocation(e @ AllocationError::NoCapacity { .. }) => {
                (StatusCode::CONFLICT, ApiError::new("NO_CAPACITY", e.to_string()))
            }
            AppError::Allocation(e @ AllocationError::NotFound { .. }) => (
                StatusCode::NOT_FOUND,
                ApiError::new("NOT_FOUND", e.to_string()).with_details(
                    "Jobs running past midnight are stored under the day they started; check the previous day",
                ),
            ),
            AppError::Storage(e) => {
                let mut error = ApiError::new("STORAGE_UNAVAILABLE", e.to_string());
                error.retryable = e.is_retryable();
                (StatusCode::SERVICE_UNAVAILABLE, error)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}
