//! # Bill Listing
//!
//! Builds the rows of the bills table from decoded records.
//!
//! ## Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  input (collection order)      output                                   │
//! │  ────────────────────────      ──────────────────────────────           │
//! │  a  2001-01-01                 c  2003-03-03   ┐ parsed dates,          │
//! │  b  "hier"                     a  2001-01-01   │ newest first,          │
//! │  c  2003-03-03                 e  2001-01-01   ┘ stable on ties         │
//! │  d  ""                         b  "hier"       ┐ raw dates,             │
//! │  e  2001-01-01                 d  ""           ┘ collection order       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::decode::{DecodeDiagnostic, DecodedBill};
use crate::format::{format_amount, format_date, format_status, DateStyle};
use crate::types::{Bill, BillDate};

/// Presentation settings for the bills table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayOptions {
    pub date_style: DateStyle,
    pub currency_symbol: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            date_style: DateStyle::Short,
            currency_symbol: "€".to_string(),
        }
    }
}

/// One line of the bills table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRow {
    pub bill: Bill,
    /// Formatted date, or the raw text when it did not parse.
    pub display_date: String,
    pub display_status: String,
    pub display_amount: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<DecodeDiagnostic>,
}

impl BillRow {
    fn new(bill: Bill, diagnostics: Vec<DecodeDiagnostic>, options: &DisplayOptions) -> Self {
        let display_date = match &bill.date {
            BillDate::Parsed(date) => format_date(*date, options.date_style),
            BillDate::Raw(raw) => raw.clone(),
        };

        BillRow {
            display_status: format_status(&bill.status),
            display_amount: format_amount(bill.amount, &options.currency_symbol),
            display_date,
            bill,
            diagnostics,
        }
    }
}

/// A diagnostic tied to the record it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDiagnostic {
    pub bill_id: String,
    pub diagnostic: DecodeDiagnostic,
}

/// The prepared bills table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BillListing {
    pub rows: Vec<BillRow>,
    pub diagnostics: Vec<RecordDiagnostic>,
}

impl BillListing {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Orders decoded records and formats them for display.
pub fn prepare_listing<I>(records: I, options: &DisplayOptions) -> BillListing
where
    I: IntoIterator<Item = DecodedBill>,
{
    let mut dated = Vec::new();
    let mut undated = Vec::new();
    let mut all_diagnostics = Vec::new();

    for record in records {
        let (bill, diagnostics) = record.into_parts();

        all_diagnostics.extend(diagnostics.iter().cloned().map(|diagnostic| RecordDiagnostic {
            bill_id: bill.id.clone(),
            diagnostic,
        }));

        let row = BillRow::new(bill, diagnostics, options);
        match row.bill.date.as_date() {
            Some(date) => dated.push((date, row)),
            None => undated.push(row),
        }
    }

    // sort_by is stable: equal dates keep collection order
    dated.sort_by(|(a, _), (b, _)| b.cmp(a));

    BillListing {
        rows: dated.into_iter().map(|(_, row)| row).chain(undated).collect(),
        diagnostics: all_diagnostics,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_record;
    use serde_json::json;

    fn record(id: &str, date: &str) -> DecodedBill {
        decode_record(
            id,
            &json!({ "date": date, "amount": 100, "status": "accepted", "name": id }),
        )
    }

    fn ids(listing: &BillListing) -> Vec<&str> {
        listing.rows.iter().map(|r| r.bill.id.as_str()).collect()
    }

    #[test]
    fn test_sorted_newest_first() {
        let listing = prepare_listing(
            vec![
                record("a", "2001-01-01"),
                record("b", "2004-04-04"),
                record("c", "2003-03-03"),
                record("d", "2002-02-02"),
            ],
            &DisplayOptions::default(),
        );

        assert_eq!(ids(&listing), vec!["b", "c", "d", "a"]);
    }

    #[test]
    fn test_stable_on_ties_and_raw_dates_last() {
        let listing = prepare_listing(
            vec![
                record("a", "2001-01-01"),
                record("b", "hier"),
                record("c", "2003-03-03"),
                record("d", ""),
                record("e", "2001-01-01"),
            ],
            &DisplayOptions::default(),
        );

        assert_eq!(ids(&listing), vec!["c", "a", "e", "b", "d"]);
        assert_eq!(listing.diagnostics.len(), 2);
        assert_eq!(listing.diagnostics[0].bill_id, "b");
    }

    #[test]
    fn test_row_display_fields() {
        let listing = prepare_listing(
            vec![record("a", "2022-12-03"), record("b", "03/12/2022")],
            &DisplayOptions::default(),
        );

        let row = &listing.rows[0];
        assert_eq!(row.display_date, "3 Déc. 22");
        assert_eq!(row.display_status, "Accepté");
        assert_eq!(row.display_amount, "100 €");
        assert!(row.diagnostics.is_empty());

        let raw = &listing.rows[1];
        assert_eq!(raw.display_date, "03/12/2022");
        assert_eq!(raw.diagnostics.len(), 1);
    }

    #[test]
    fn test_iso_style() {
        let options = DisplayOptions {
            date_style: DateStyle::Iso,
            currency_symbol: "EUR".to_string(),
        };
        let listing = prepare_listing(vec![record("a", "2022-12-03")], &options);

        assert_eq!(listing.rows[0].display_date, "2022-12-03");
        assert_eq!(listing.rows[0].display_amount, "100 EUR");
    }

    #[test]
    fn test_empty_input() {
        let listing = prepare_listing(Vec::new(), &DisplayOptions::default());
        assert!(listing.is_empty());
        assert!(listing.diagnostics.is_empty());
    }
}
