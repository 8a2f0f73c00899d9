//! Error handling for the plant care backend
//!
//! Every error carries a stable machine code so the CLI can print a
//! consistent JSON error report.

use serde::Serialize;
use shared::{CareError, CareSheetError, SeasonError};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    // Domain errors
    #[error(transparent)]
    Season(#[from] SeasonError),

    #[error(transparent)]
    Care(#[from] CareError),

    #[error(transparent)]
    CareSheet(#[from] CareSheetError),

    #[error("AI usage limit reached: {0}")]
    UsageLimitReached(String),

    // Infrastructure errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error report structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } | AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::PermissionDenied(_) => "PERMISSION_DENIED",
            AppError::Season(SeasonError::InvalidSeason(_)) => "INVALID_SEASON",
            AppError::Season(SeasonError::DateOutOfRange { .. }) => "DATE_OUT_OF_RANGE",
            AppError::Care(CareError::MissingSeasonAssignment { .. }) => "MISSING_SEASON_ASSIGNMENT",
            AppError::Care(CareError::NotApplicable { .. }) => "CARE_NOT_APPLICABLE",
            AppError::Care(CareError::MissingWaterFrequency { .. }) => "MISSING_WATER_FREQUENCY",
            AppError::Care(CareError::Season(_)) => "INVALID_SEASON",
            AppError::CareSheet(CareSheetError::UnknownPlant) => "UNKNOWN_PLANT",
            AppError::CareSheet(CareSheetError::NotSuccessful(_))
            | AppError::CareSheet(CareSheetError::InvalidTransition { .. }) => {
                "INVALID_STATE_TRANSITION"
            }
            AppError::CareSheet(_) => "INVALID_CARE_SHEET",
            AppError::UsageLimitReached(_) => "USAGE_LIMIT_REACHED",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::StorageError(_) => "STORAGE_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let field = match self {
            AppError::Validation { field, .. } => Some(field.clone()),
            AppError::CareSheet(CareSheetError::InvalidField { field, .. }) => Some(field.clone()),
            _ => None,
        };
        ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                field,
            },
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(shared::describe_validation_errors(&errors).join("; "))
    }
}

/// Result type alias for services
pub type AppResult<T> = Result<T, AppError>;
