//! # Validation Module
//!
//! Input validation for the new bill form.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: File selection (synchronous, on change)                      │
//! │  ├── validate_receipt_file: extension + MIME allow-lists               │
//! │  └── Drives the file-error indicator                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submission (THIS MODULE: build_request)                      │
//! │  ├── Expense type in the fixed category set                            │
//! │  ├── Date parses as YYYY-MM-DD                                         │
//! │  ├── amount / vat / pct coerced to numbers                             │
//! │  └── Every failure collected into FormErrors                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store Gateway                                                │
//! │  └── Whatever the remote service enforces                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billed_core::types::ReceiptFile;
//! use billed_core::validation::{validate_receipt_file, FileRules};
//!
//! let rules = FileRules::default();
//! let jpg = ReceiptFile::new("test-file.jpg", "image/jpeg", vec![]);
//! let pdf = ReceiptFile::new("test-file.pdf", "application/pdf", vec![]);
//!
//! assert!(validate_receipt_file(&jpg, &rules).is_ok());
//! assert!(validate_receipt_file(&pdf, &rules).is_err());
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, FormErrors, ValidationError};
use crate::money::{Money, ParseMoneyError};
use crate::types::{ExpenseType, NewBillRequest, ReceiptFile, DATE_FORMAT};
use crate::DEFAULT_PCT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Receipt File Rules
// =============================================================================

/// Allow-lists for receipt uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRules {
    /// Lowercase extensions without the dot.
    pub allowed_extensions: Vec<String>,

    /// Accepted MIME types. An empty MIME type on the file defers to the
    /// extension check.
    pub allowed_mime_types: Vec<String>,
}

impl Default for FileRules {
    fn default() -> Self {
        FileRules {
            allowed_extensions: ["jpg", "jpeg", "png"].map(String::from).to_vec(),
            allowed_mime_types: ["image/jpeg", "image/png"].map(String::from).to_vec(),
        }
    }
}

/// Validates a selected receipt file against the allow-lists.
///
/// ## Rules
/// - The extension (after the last `.`, case-insensitive) must be allowed
/// - A non-empty MIME type must be allowed too
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  New bill form: file input changed                                      │
/// │                                                                         │
/// │  test-file.jpg (image/jpeg)  ──► Ok   ──► error indicator hidden        │
/// │  test-file.pdf (application/pdf) ──► Err ──► error indicator shown      │
/// │                                                                         │
/// │  The selection itself is left untouched either way.                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_receipt_file(file: &ReceiptFile, rules: &FileRules) -> CoreResult<()> {
    let invalid = |reason: String| CoreError::InvalidFile {
        file_name: file.file_name.clone(),
        reason,
    };

    let extension = file
        .extension()
        .ok_or_else(|| invalid("file has no extension".to_string()))?;

    if !rules
        .allowed_extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
    {
        return Err(invalid(format!(
            "extension .{} is not allowed (expected one of: {})",
            extension,
            rules.allowed_extensions.join(", ")
        )));
    }

    let mime = file.mime_type.trim();
    if !mime.is_empty()
        && !rules
            .allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime))
    {
        return Err(invalid(format!("type {} is not allowed", mime)));
    }

    Ok(())
}

// =============================================================================
// Form Values
// =============================================================================

/// Raw values of the new bill form fields, exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

/// Tunables for form validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormRules {
    /// VAT rate used when the pct field is left empty.
    pub default_pct: u32,
}

impl Default for FormRules {
    fn default() -> Self {
        FormRules {
            default_pct: DEFAULT_PCT,
        }
    }
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates the expense category.
pub fn validate_expense_type(input: &str) -> ValidationResult<ExpenseType> {
    if input.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "type".to_string(),
        });
    }
    input.parse()
}

/// Validates a `YYYY-MM-DD` date.
pub fn validate_date(input: &str) -> ValidationResult<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "date".to_string(),
        });
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: format!("'{}' is not a valid YYYY-MM-DD date", input),
    })
}

/// Validates a non-negative monetary field.
///
/// ## Rules
/// - Empty: `Required` when `required`, otherwise zero
/// - Non-numeric: `InvalidFormat` (never silently zero)
/// - Negative: `MustNotBeNegative`
///
/// ## Example
/// ```rust
/// use billed_core::validation::validate_money;
///
/// assert_eq!(validate_money("amount", "400", true).unwrap().cents(), 40000);
/// assert!(validate_money("amount", "", true).is_err());
/// assert!(validate_money("vat", "", false).unwrap().is_zero());
/// assert!(validate_money("vat", "abc", false).is_err());
/// ```
pub fn validate_money(field: &str, input: &str, required: bool) -> ValidationResult<Money> {
    let money = match Money::parse_input(input) {
        Ok(money) => money,
        Err(ParseMoneyError::Empty) if !required => return Ok(Money::zero()),
        Err(ParseMoneyError::Empty) => {
            return Err(ValidationError::Required {
                field: field.to_string(),
            })
        }
        Err(e) => {
            return Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: e.to_string(),
            })
        }
    };

    if money.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(money)
}

/// Validates the VAT rate percentage.
///
/// ## Rules
/// - Empty: the configured default
/// - Must be a whole number between 0 and 100
pub fn validate_pct(input: &str, default_pct: u32) -> ValidationResult<u32> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(default_pct);
    }

    let pct: i64 = input.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "pct".to_string(),
        reason: format!("'{}' is not a whole number", input),
    })?;

    if !(0..=100).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "pct".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(pct as u32)
}

// =============================================================================
// Request Assembly
// =============================================================================

/// Builds a [`NewBillRequest`] from the form, collecting every field error.
///
/// The receipt file is expected to have passed [`validate_receipt_file`]
/// already.
pub fn build_request(
    values: &FormValues,
    email: &str,
    file: ReceiptFile,
    rules: &FormRules,
) -> Result<NewBillRequest, FormErrors> {
    let mut errors = FormErrors::new();

    let expense_type = validate_expense_type(&values.expense_type)
        .map_err(|e| errors.push(e))
        .ok();
    let date = validate_date(&values.date).map_err(|e| errors.push(e)).ok();
    let amount = validate_money("amount", &values.amount, true)
        .map_err(|e| errors.push(e))
        .ok();
    let vat = validate_money("vat", &values.vat, false)
        .map_err(|e| errors.push(e))
        .ok();
    let pct = validate_pct(&values.pct, rules.default_pct)
        .map_err(|e| errors.push(e))
        .ok();

    match (expense_type, date, amount, vat, pct) {
        (Some(expense_type), Some(date), Some(amount), Some(vat), Some(pct)) => {
            errors.into_result(NewBillRequest {
                email: email.to_string(),
                expense_type,
                name: values.name.trim().to_string(),
                date,
                amount,
                vat,
                pct,
                commentary: values.commentary.trim().to_string(),
                file,
            })
        }
        _ => Err(errors),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> FormValues {
        FormValues {
            expense_type: "Hôtel et logement".to_string(),
            name: "Sample test".to_string(),
            date: "2022-12-03".to_string(),
            amount: "400".to_string(),
            vat: "80".to_string(),
            pct: "20".to_string(),
            commentary: "séminaire billed".to_string(),
        }
    }

    fn jpg() -> ReceiptFile {
        ReceiptFile::new("test-file.jpg", "image/jpeg", b"test-file.jpg".to_vec())
    }

    #[test]
    fn test_receipt_file_accepts_images() {
        let rules = FileRules::default();
        assert!(validate_receipt_file(&jpg(), &rules).is_ok());
        assert!(validate_receipt_file(&ReceiptFile::new("a.jpeg", "image/jpeg", vec![]), &rules).is_ok());
        assert!(validate_receipt_file(&ReceiptFile::new("a.PNG", "image/png", vec![]), &rules).is_ok());
        assert!(validate_receipt_file(&ReceiptFile::new("a.png", "", vec![]), &rules).is_ok());
    }

    #[test]
    fn test_receipt_file_rejects_pdf() {
        let rules = FileRules::default();
        let pdf = ReceiptFile::new("test-file.pdf", "application/pdf", vec![]);
        let err = validate_receipt_file(&pdf, &rules).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFile { ref file_name, .. } if file_name == "test-file.pdf"));
    }

    #[test]
    fn test_receipt_file_rejects_mismatched_mime() {
        let rules = FileRules::default();
        let renamed = ReceiptFile::new("invoice.jpg", "application/pdf", vec![]);
        assert!(validate_receipt_file(&renamed, &rules).is_err());
        assert!(validate_receipt_file(&ReceiptFile::new("noext", "image/png", vec![]), &rules).is_err());
    }

    #[test]
    fn test_validate_pct() {
        assert_eq!(validate_pct("", 20).unwrap(), 20);
        assert_eq!(validate_pct(" 10 ", 20).unwrap(), 10);
        assert!(validate_pct("abc", 20).is_err());
        assert!(validate_pct("5.5", 20).is_err());
        assert!(validate_pct("101", 20).is_err());
        assert!(validate_pct("-1", 20).is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2022-12-03").is_ok());
        assert!(matches!(validate_date(""), Err(ValidationError::Required { .. })));
        assert!(matches!(
            validate_date("2022-13-01"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_money_rejects_negative() {
        assert!(matches!(
            validate_money("amount", "-5", true),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
    }

    #[test]
    fn test_build_request_from_filled_form() {
        let request = build_request(&filled_form(), "a@a", jpg(), &FormRules::default()).unwrap();

        assert_eq!(request.email, "a@a");
        assert_eq!(request.expense_type, ExpenseType::Hotel);
        assert_eq!(request.amount, Money::from_units(400));
        assert_eq!(request.vat, Money::from_units(80));
        assert_eq!(request.pct, 20);
        assert_eq!(request.file.file_name, "test-file.jpg");
    }

    #[test]
    fn test_build_request_uses_default_pct() {
        let mut form = filled_form();
        form.pct = String::new();
        let rules = FormRules { default_pct: 20 };

        let request = build_request(&form, "a@a", jpg(), &rules).unwrap();
        assert_eq!(request.pct, 20);
    }

    #[test]
    fn test_build_request_collects_all_errors() {
        let form = FormValues {
            expense_type: "Voyage".to_string(),
            amount: "quatre cents".to_string(),
            vat: "x".to_string(),
            ..FormValues::default()
        };

        let errors = build_request(&form, "a@a", jpg(), &FormRules::default()).unwrap_err();

        assert!(errors.has_field("type"));
        assert!(errors.has_field("date"));
        assert!(errors.has_field("amount"));
        assert!(errors.has_field("vat"));
        assert!(!errors.has_field("pct"));
        assert_eq!(errors.len(), 4);
    }
}
