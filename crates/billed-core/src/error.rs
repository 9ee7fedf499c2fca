//! # Error Types
//!
//! Domain-specific error types for billed-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billed-core errors (this file)                                        │
//! │  ├── CoreError        - Domain errors (invalid receipt file, ...)      │
//! │  ├── ValidationError  - A single invalid form field                    │
//! │  └── FormErrors       - Every invalid field of one submission          │
//! │                                                                         │
//! │  billed-store errors (separate crate)                                  │
//! │  └── StoreError       - Store Gateway rejections (404, 500, ...)       │
//! │                                                                         │
//! │  billed-app errors                                                     │
//! │  └── AppError         - What the presentation layer renders            │
//! │                                                                         │
//! │  Flow: ValidationError → FormErrors → CoreError → AppError → View      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Record decoding never produces an error: malformed records are kept and
//! carry a [`crate::decode::DecodeDiagnostic`] instead.

use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The selected receipt file is not an accepted image.
    ///
    /// ## When This Occurs
    /// - Extension outside the allow-list (`.pdf`, `.gif`, no extension)
    /// - MIME type outside the allow-list (`application/pdf`)
    #[error("Invalid receipt file '{file_name}': {reason}")]
    InvalidFile { file_name: String, reason: String },

    /// One or more form fields failed validation.
    #[error("{0}")]
    Form(#[from] FormErrors),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (non-numeric amount, malformed date, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Name of the offending field, used to flag it in the view.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustNotBeNegative { field }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Form Errors
// =============================================================================

/// Every validation failure collected while reading one form submission.
///
/// The form view flags all invalid fields at once rather than one per
/// attempt, so validation keeps going after the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<ValidationError>);

impl FormErrors {
    pub fn new() -> Self {
        FormErrors(Vec::new())
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Returns true if `field` has at least one error.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    /// Converts into `Ok(value)` when nothing failed.
    pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FormErrors {}

impl From<ValidationError> for FormErrors {
    fn from(err: ValidationError) -> Self {
        FormErrors(vec![err])
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount is required");

        let err = ValidationError::OutOfRange {
            field: "pct".to_string(),
            min: 0,
            max: 100,
        };
        assert_eq!(err.to_string(), "pct must be between 0 and 100");
    }

    #[test]
    fn test_form_errors_collects_fields() {
        let mut errors = FormErrors::new();
        assert!(errors.is_empty());

        errors.push(ValidationError::Required {
            field: "date".to_string(),
        });
        errors.push(ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: "not a number".to_string(),
        });

        assert_eq!(errors.len(), 2);
        assert!(errors.has_field("date"));
        assert!(errors.has_field("amount"));
        assert!(!errors.has_field("vat"));
        assert_eq!(
            errors.to_string(),
            "date is required; amount has invalid format: not a number"
        );
        assert!(errors.into_result(()).is_err());
    }

    #[test]
    fn test_form_errors_convert_to_core_error() {
        let form: FormErrors = ValidationError::Required {
            field: "date".to_string(),
        }
        .into();
        let core_err: CoreError = form.into();
        assert!(matches!(core_err, CoreError::Form(_)));
    }
}
