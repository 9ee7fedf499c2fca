//! # billed-core: Pure Domain Logic for Billed
//!
//! Everything about bills that does not need a Store Gateway: decoding raw
//! records, ordering and formatting the bills table, and validating the new
//! bill form.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Billed Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (view + navigation)                │   │
//! │  │        bills table ──► receipt modal ──► new bill form          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                billed-app (Bills / NewBill pipelines)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ billed-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐  │   │
//! │  │   │  types  │ │  money  │ │ decode  │ │ listing │ │validation│  │   │
//! │  │   │  Bill   │ │  Money  │ │ records │ │ ordering│ │ file/form│  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORE • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            billed-store (Store Gateway + Session Store)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Bill, User, ReceiptFile, NewBillRequest)
//! - [`money`] - Money type in integer cents
//! - [`decode`] - Stored record → Bill, keeping malformed records
//! - [`listing`] - Ordering and display rows for the bills table
//! - [`format`] - French date, status and amount rendering
//! - [`validation`] - Receipt file and form validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use billed_core::decode::decode_record;
//! use billed_core::listing::{prepare_listing, DisplayOptions};
//! use serde_json::json;
//!
//! let records = vec![
//!     decode_record("a", &json!({ "date": "2001-01-01", "amount": 10 })),
//!     decode_record("b", &json!({ "date": "2022-12-03", "amount": 400 })),
//! ];
//! let listing = prepare_listing(records, &DisplayOptions::default());
//!
//! assert_eq!(listing.rows[0].display_date, "3 Déc. 22");
//! assert_eq!(listing.rows[0].display_amount, "400 €");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod decode;
pub mod error;
pub mod format;
pub mod listing;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use decode::{decode_record, DecodeDiagnostic, DecodedBill};
pub use error::{CoreError, CoreResult, FormErrors, ValidationError};
pub use format::DateStyle;
pub use listing::{prepare_listing, BillListing, BillRow, DisplayOptions};
pub use money::Money;
pub use types::*;
pub use validation::{FileRules, FormRules, FormValues};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Name of the Store Gateway collection holding bills.
pub const BILLS_COLLECTION: &str = "bills";

/// VAT rate applied when the form's pct field is left empty.
pub const DEFAULT_PCT: u32 = 20;

/// Share of the receipt modal's width given to the preview image.
pub const RECEIPT_PREVIEW_RATIO: f64 = 0.5;
