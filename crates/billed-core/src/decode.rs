//! # Record Decoding
//!
//! Turns an opaque stored record into a typed [`Bill`].
//!
//! ## Keep-With-Diagnostic
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stored record payload                                                  │
//! │        │                                                                │
//! │        ├── not an object ──► placeholder Bill + UnreadableRecord        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  field by field                                                         │
//! │        ├── date not YYYY-MM-DD ──► raw text kept + UnformattedDate      │
//! │        ├── amount/vat/pct bad  ──► zero + InvalidField                  │
//! │        └── everything else     ──► defaults ("" / Unknown status)       │
//! │                                                                         │
//! │  A record is never dropped and decoding never fails the whole list.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::money::{Money, ParseMoneyError};
use crate::types::{Bill, BillDate, BillStatus};

// =============================================================================
// Diagnostics
// =============================================================================

/// Non-fatal marker attached to a record that only partly decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DecodeDiagnostic {
    /// `date` is not `YYYY-MM-DD`; the raw text is kept as the date.
    UnformattedDate { raw: String },

    /// A numeric field could not be read and was replaced by zero.
    InvalidField { field: String, reason: String },

    /// The payload is not a record at all.
    UnreadableRecord { reason: String },
}

impl fmt::Display for DecodeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeDiagnostic::UnformattedDate { raw } => {
                write!(f, "unformatted date: '{}'", raw)
            }
            DecodeDiagnostic::InvalidField { field, reason } => {
                write!(f, "invalid {}: {}", field, reason)
            }
            DecodeDiagnostic::UnreadableRecord { reason } => {
                write!(f, "unreadable record: {}", reason)
            }
        }
    }
}

/// Outcome of decoding one record.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBill {
    Decoded {
        bill: Bill,
    },
    Degraded {
        bill: Bill,
        diagnostics: Vec<DecodeDiagnostic>,
    },
}

impl DecodedBill {
    pub fn bill(&self) -> &Bill {
        match self {
            DecodedBill::Decoded { bill } | DecodedBill::Degraded { bill, .. } => bill,
        }
    }

    pub fn diagnostics(&self) -> &[DecodeDiagnostic] {
        match self {
            DecodedBill::Decoded { .. } => &[],
            DecodedBill::Degraded { diagnostics, .. } => diagnostics,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, DecodedBill::Degraded { .. })
    }

    pub fn into_parts(self) -> (Bill, Vec<DecodeDiagnostic>) {
        match self {
            DecodedBill::Decoded { bill } => (bill, Vec::new()),
            DecodedBill::Degraded { bill, diagnostics } => (bill, diagnostics),
        }
    }

    fn from_parts(bill: Bill, diagnostics: Vec<DecodeDiagnostic>) -> Self {
        if diagnostics.is_empty() {
            DecodedBill::Decoded { bill }
        } else {
            DecodedBill::Degraded { bill, diagnostics }
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decodes a stored payload.
pub fn decode_record(id: &str, payload: &Value) -> DecodedBill {
    match payload.as_object() {
        Some(fields) => decode_fields(id, fields),
        None => unreadable(id, format!("expected an object, got {}", kind_of(payload))),
    }
}

/// Placeholder for a record whose fields cannot be read at all.
pub fn unreadable(id: &str, reason: impl Into<String>) -> DecodedBill {
    DecodedBill::Degraded {
        bill: Bill::placeholder(id),
        diagnostics: vec![DecodeDiagnostic::UnreadableRecord {
            reason: reason.into(),
        }],
    }
}

/// Decodes the fields of an object payload.
pub fn decode_fields(id: &str, fields: &Map<String, Value>) -> DecodedBill {
    let mut diagnostics = Vec::new();

    let raw_date = text(fields, "date");
    let date = BillDate::parse(&raw_date);
    if !date.is_parsed() {
        diagnostics.push(DecodeDiagnostic::UnformattedDate { raw: raw_date });
    }

    let amount = money(fields, "amount", &mut diagnostics);
    let vat = money(fields, "vat", &mut diagnostics);
    let pct = percent(fields, &mut diagnostics);

    let status = match fields.get("status") {
        Some(Value::String(raw)) => BillStatus::from_wire(raw),
        _ => BillStatus::default(),
    };

    let bill = Bill {
        id: id.to_string(),
        expense_type: text(fields, "type"),
        name: text(fields, "name"),
        date,
        amount,
        vat,
        pct,
        commentary: text(fields, "commentary"),
        file_url: text(fields, "fileUrl"),
        file_name: text(fields, "fileName"),
        status,
    };

    DecodedBill::from_parts(bill, diagnostics)
}

fn text(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn money(fields: &Map<String, Value>, key: &str, diagnostics: &mut Vec<DecodeDiagnostic>) -> Money {
    let Some(value) = fields.get(key) else {
        return Money::zero();
    };

    match Money::from_json(value) {
        Ok(money) => money,
        Err(ParseMoneyError::Empty) => Money::zero(),
        Err(e) => {
            diagnostics.push(DecodeDiagnostic::InvalidField {
                field: key.to_string(),
                reason: e.to_string(),
            });
            Money::zero()
        }
    }
}

fn percent(fields: &Map<String, Value>, diagnostics: &mut Vec<DecodeDiagnostic>) -> u32 {
    let parsed = match fields.get("pct") {
        None | Some(Value::Null) => return 0,
        Some(Value::String(s)) if s.trim().is_empty() => return 0,
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        Some(_) => None,
    };

    parsed.unwrap_or_else(|| {
        diagnostics.push(DecodeDiagnostic::InvalidField {
            field: "pct".to_string(),
            reason: format!("{} is not a whole percentage", fields["pct"]),
        });
        0
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
