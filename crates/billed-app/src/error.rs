//! # Application Error Type
//!
//! Unified error type surfaced by the pipelines to the presentation layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Billed                                 │
//! │                                                                         │
//! │  Store rejection ─── StoreError::NotFound ("Erreur 404") ──┐            │
//! │                                                            │            │
//! │  Bad receipt ─────── CoreError::InvalidFile ───────────────┤            │
//! │                                                            ▼            │
//! │  Bad form ────────── CoreError::Form(FormErrors) ──────► AppError ────► │
//! │                                                            ▲   view     │
//! │  Bad config ──────── ConfigError ──────────────────────────┘            │
//! │                                                                         │
//! │  The message of a store error is the literal text shown on the page.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use billed_core::CoreError;
use billed_store::StoreError;

use crate::config::ConfigError;

/// Error surfaced by a pipeline operation.
///
/// ## Serialization
/// ```json
/// {
///   "code": "SERVER_ERROR",
///   "message": "Erreur 500"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Message for display
    pub message: String,
}

/// Error codes for [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Store answered 404
    NotFound,

    /// Store answered 500
    ServerError,

    /// Any other store rejection
    StoreError,

    /// One or more form fields are invalid
    ValidationError,

    /// The selected receipt is not an accepted image
    InvalidFile,

    /// Submit without a selected receipt
    NoFileSelected,

    /// Submit after the form already went through
    AlreadySubmitted,

    /// No usable signed-in user
    SessionError,

    /// Configuration could not be loaded
    ConfigError,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn no_file_selected() -> Self {
        AppError::new(ErrorCode::NoFileSelected, "No receipt file selected")
    }

    pub fn already_submitted() -> Self {
        AppError::new(ErrorCode::AlreadySubmitted, "This bill was already submitted")
    }
}

/// Converts store errors, keeping their page message.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::NotFound => ErrorCode::NotFound,
            StoreError::Server => ErrorCode::ServerError,
            StoreError::Session(_) => ErrorCode::SessionError,
            StoreError::Other(_) | StoreError::MalformedRecord { .. } => ErrorCode::StoreError,
        };
        AppError::new(code, err.display_message())
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidFile { .. } => AppError::new(ErrorCode::InvalidFile, err.to_string()),
            CoreError::Form(errors) => AppError::new(ErrorCode::ValidationError, errors.to_string()),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

/// Result type for pipeline operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use billed_core::{FormErrors, ValidationError};

    #[test]
    fn test_store_errors_keep_page_message() {
        let err: AppError = StoreError::NotFound.into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Erreur 404");

        let err: AppError = StoreError::from_message("Erreur 500").into();
        assert_eq!(err.code, ErrorCode::ServerError);
        assert_eq!(err.message, "Erreur 500");
    }

    #[test]
    fn test_form_errors_become_validation_error() {
        let errors = FormErrors::from(ValidationError::Required {
            field: "date".to_string(),
        });
        let err: AppError = CoreError::Form(errors).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "date is required");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(AppError::no_file_selected()).unwrap();
        assert_eq!(json["code"], "NO_FILE_SELECTED");
    }
}
