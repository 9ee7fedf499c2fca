//! # Domain Types
//!
//! Core domain types used throughout Billed.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Bill       │   │ NewBillRequest  │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (store)     │   │  email          │   │  email          │       │
//! │  │  type, name     │   │  type, name     │   │  role           │       │
//! │  │  date           │   │  date (parsed)  │   └─────────────────┘       │
//! │  │  amount, vat    │   │  amount, vat    │                             │
//! │  │  status         │   │  file (blob)    │   ┌─────────────────┐       │
//! │  └─────────────────┘   └─────────────────┘   │  ReceiptFile    │       │
//! │                                              │  name, mime     │       │
//! │  ┌─────────────────┐   ┌─────────────────┐   │  bytes          │       │
//! │  │    BillDate     │   │   BillStatus    │   └─────────────────┘       │
//! │  │  Parsed(date)   │   │  Pending        │                             │
//! │  │  Raw(String)    │   │  Accepted       │                             │
//! │  └─────────────────┘   │  Refused        │                             │
//! │                        │  Unknown(raw)   │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The Store Gateway is the sole writer of canonical bill state. A `Bill`
//! here is a read-once snapshot; `id` and `status` are never set locally.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

/// Canonical wire format of a bill date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Bill Date
// =============================================================================

/// The `date` of a stored bill.
///
/// A record whose date does not parse keeps its raw text so it can still be
/// shown; see [`crate::decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillDate {
    Parsed(NaiveDate),
    Raw(String),
}

impl BillDate {
    /// Parses `YYYY-MM-DD`, falling back to the raw text.
    pub fn parse(raw: &str) -> Self {
        match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
            Ok(date) => BillDate::Parsed(date),
            Err(_) => BillDate::Raw(raw.to_string()),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            BillDate::Parsed(date) => Some(*date),
            BillDate::Raw(_) => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, BillDate::Parsed(_))
    }

    /// Wire form: `YYYY-MM-DD` or the untouched raw text.
    pub fn to_wire(&self) -> String {
        match self {
            BillDate::Parsed(date) => date.format(DATE_FORMAT).to_string(),
            BillDate::Raw(raw) => raw.clone(),
        }
    }
}

impl Serialize for BillDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for BillDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(BillDate::parse(&raw))
    }
}

// =============================================================================
// Bill Status
// =============================================================================

/// Lifecycle marker assigned by the Store Gateway.
///
/// Unknown words from the store are preserved rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
    Unknown(String),
}

impl BillStatus {
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pending" => BillStatus::Pending,
            "accepted" => BillStatus::Accepted,
            "refused" => BillStatus::Refused,
            _ => BillStatus::Unknown(raw.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
            BillStatus::Unknown(raw) => raw,
        }
    }
}

impl Default for BillStatus {
    fn default() -> Self {
        BillStatus::Unknown(String::new())
    }
}

impl Serialize for BillStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for BillStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(BillStatus::from_wire(&raw))
    }
}

// =============================================================================
// Expense Type
// =============================================================================

/// The expense categories offered by the new bill form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ExpenseType {
    #[serde(rename = "Transports")]
    Transports,
    #[serde(rename = "Restaurants et bars")]
    Restaurants,
    #[serde(rename = "Hôtel et logement")]
    Hotel,
    #[serde(rename = "Services en ligne")]
    OnlineServices,
    #[serde(rename = "IT et électronique")]
    Electronics,
    #[serde(rename = "Equipement et matériel")]
    Equipment,
    #[serde(rename = "Fournitures de bureau")]
    OfficeSupplies,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 7] = [
        ExpenseType::Transports,
        ExpenseType::Restaurants,
        ExpenseType::Hotel,
        ExpenseType::OnlineServices,
        ExpenseType::Electronics,
        ExpenseType::Equipment,
        ExpenseType::OfficeSupplies,
    ];

    /// Label as stored and shown in the form's select.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseType::Transports => "Transports",
            ExpenseType::Restaurants => "Restaurants et bars",
            ExpenseType::Hotel => "Hôtel et logement",
            ExpenseType::OnlineServices => "Services en ligne",
            ExpenseType::Electronics => "IT et électronique",
            ExpenseType::Equipment => "Equipement et matériel",
            ExpenseType::OfficeSupplies => "Fournitures de bureau",
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpenseType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ExpenseType::ALL
            .iter()
            .copied()
            .find(|t| t.label() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: ExpenseType::ALL.iter().map(|t| t.label().to_string()).collect(),
            })
    }
}

// =============================================================================
// Bill
// =============================================================================

/// One expense report line item, as read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    /// Opaque identifier assigned by the Store Gateway.
    pub id: String,

    /// Category label. Free-form on read: legacy labels are kept as stored.
    #[serde(rename = "type")]
    pub expense_type: String,

    pub name: String,

    #[ts(type = "string")]
    pub date: BillDate,

    #[ts(type = "number")]
    pub amount: Money,

    /// Absolute VAT amount.
    #[ts(type = "number")]
    pub vat: Money,

    /// VAT rate in percent.
    pub pct: u32,

    pub commentary: String,

    pub file_url: String,

    pub file_name: String,

    #[ts(type = "string")]
    pub status: BillStatus,
}

impl Bill {
    /// A bill holding nothing but its id, used when a record is unreadable.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Bill {
            id: id.into(),
            expense_type: String::new(),
            name: String::new(),
            date: BillDate::Raw(String::new()),
            amount: Money::zero(),
            vat: Money::zero(),
            pct: 0,
            commentary: String::new(),
            file_url: String::new(),
            file_name: String::new(),
            status: BillStatus::default(),
        }
    }
}

// =============================================================================
// Session User
// =============================================================================

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum UserRole {
    Employee,
    Admin,
}

/// The signed-in user, as kept by the session store under `"user"`.
///
/// ```json
/// { "type": "Employee", "email": "a@a" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    #[serde(rename = "type")]
    pub role: UserRole,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn employee(email: impl Into<String>) -> Self {
        User {
            role: UserRole::Employee,
            email: Some(email.into()),
        }
    }
}

// =============================================================================
// Receipt File
// =============================================================================

/// A file picked in the new bill form's file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ReceiptFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        ReceiptFile {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Lowercased text after the last `.`, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }
}

// =============================================================================
// New Bill Request
// =============================================================================

/// The payload assembled from the new bill form.
///
/// All bill fields except `id` and `status`, the receipt blob, and the
/// submitting user's email.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBillRequest {
    pub email: String,
    pub expense_type: ExpenseType,
    pub name: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub vat: Money,
    pub pct: u32,
    pub commentary: String,
    pub file: ReceiptFile,
}

impl NewBillRequest {
    /// JSON fields sent as the create payload. The blob travels separately.
    pub fn fields(&self) -> Value {
        json!({
            "email": self.email,
            "type": self.expense_type.label(),
            "name": self.name,
            "date": self.date.format(DATE_FORMAT).to_string(),
            "amount": self.amount.to_json(),
            "vat": self.vat.to_json(),
            "pct": self.pct,
            "commentary": self.commentary,
            "fileName": self.file.file_name,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_date_parse() {
        let date = BillDate::parse("2022-12-03");
        assert_eq!(date.as_date(), NaiveDate::from_ymd_opt(2022, 12, 3));
        assert_eq!(date.to_wire(), "2022-12-03");

        assert_eq!(BillDate::parse(""), BillDate::Raw(String::new()));
        assert_eq!(
            BillDate::parse("2022-02-30"),
            BillDate::Raw("2022-02-30".to_string())
        );
        assert!(!BillDate::parse("03/12/2022").is_parsed());
    }

    #[test]
    fn test_bill_status_wire() {
        assert_eq!(BillStatus::from_wire("pending"), BillStatus::Pending);
        assert_eq!(BillStatus::from_wire("Accepted"), BillStatus::Accepted);
        assert_eq!(
            BillStatus::from_wire("archived"),
            BillStatus::Unknown("archived".to_string())
        );
        assert_eq!(BillStatus::Refused.as_wire(), "refused");
    }

    #[test]
    fn test_expense_type_labels_round_trip() {
        for t in ExpenseType::ALL {
            assert_eq!(t.label().parse::<ExpenseType>().unwrap(), t);
        }
        assert!("Voyage".parse::<ExpenseType>().is_err());
    }

    #[test]
    fn test_user_json_shape() {
        let user: User = serde_json::from_str(r#"{"type":"Employee","email":"a@a"}"#).unwrap();
        assert_eq!(user, User::employee("a@a"));

        let no_email: User = serde_json::from_str(r#"{"type":"Admin"}"#).unwrap();
        assert_eq!(no_email.role, UserRole::Admin);
        assert_eq!(no_email.email, None);
    }

    #[test]
    fn test_receipt_extension() {
        let file = ReceiptFile::new("Scan.JPG", "image/jpeg", vec![]);
        assert_eq!(file.extension().as_deref(), Some("jpg"));
        assert_eq!(ReceiptFile::new("receipt", "", vec![]).extension(), None);
        assert_eq!(ReceiptFile::new(".png", "", vec![]).extension(), None);
        assert_eq!(
            ReceiptFile::new("a.tar.pdf", "", vec![]).extension().as_deref(),
            Some("pdf")
        );
    }

    #[test]
    fn test_new_bill_request_fields() {
        let request = NewBillRequest {
            email: "a@a".to_string(),
            expense_type: ExpenseType::Hotel,
            name: "Sample test".to_string(),
            date: NaiveDate::from_ymd_opt(2022, 12, 3).unwrap(),
            amount: Money::from_units(400),
            vat: Money::from_units(80),
            pct: 20,
            commentary: "séminaire billed".to_string(),
            file: ReceiptFile::new("facture.jpg", "image/jpeg", vec![1, 2, 3]),
        };

        let fields = request.fields();
        assert_eq!(fields["type"], "Hôtel et logement");
        assert_eq!(fields["date"], "2022-12-03");
        assert_eq!(fields["amount"], 400);
        assert_eq!(fields["vat"], 80);
        assert_eq!(fields["pct"], 20);
        assert_eq!(fields["fileName"], "facture.jpg");
        assert!(fields.get("id").is_none());
        assert!(fields.get("status").is_none());
    }
}
