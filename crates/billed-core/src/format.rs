//! # Display Formatting
//!
//! Turns bill fields into the strings shown in the bills table.
//!
//! ```text
//! 2022-12-03  ──► "3 Déc. 22"    (DateStyle::Short)
//!             ──► "2022-12-03"   (DateStyle::Iso)
//! pending     ──► "En attente"
//! 400.00      ──► "400 €"
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{BillStatus, DATE_FORMAT};

const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

// =============================================================================
// Date Style
// =============================================================================

/// How parsed bill dates are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// French short form: `3 Déc. 22`.
    #[default]
    Short,
    /// `2022-12-03`.
    Iso,
}

impl fmt::Display for DateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateStyle::Short => f.write_str("short"),
            DateStyle::Iso => f.write_str("iso"),
        }
    }
}

impl FromStr for DateStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(DateStyle::Short),
            "iso" => Ok(DateStyle::Iso),
            other => Err(format!("unknown date style '{}' (expected short or iso)", other)),
        }
    }
}

// =============================================================================
// Formatters
// =============================================================================

/// Renders a parsed bill date.
///
/// The short form takes the first three letters of the French month name,
/// capitalised and followed by a dot. June and July both become `Jui.`.
///
/// ## Example
/// ```rust
/// use billed_core::format::{format_date, DateStyle};
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2022, 12, 3).unwrap();
/// assert_eq!(format_date(date, DateStyle::Short), "3 Déc. 22");
/// assert_eq!(format_date(date, DateStyle::Iso), "2022-12-03");
/// ```
pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    match style {
        DateStyle::Iso => date.format(DATE_FORMAT).to_string(),
        DateStyle::Short => {
            let month = FRENCH_MONTHS[date.month0() as usize];
            format!(
                "{} {}. {:02}",
                date.day(),
                short_month(month),
                date.year().rem_euclid(100)
            )
        }
    }
}

fn short_month(month: &str) -> String {
    let mut chars = month.chars().take(3);
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// French label of a bill status. Unknown words are shown as stored.
pub fn format_status(status: &BillStatus) -> String {
    match status {
        BillStatus::Pending => "En attente".to_string(),
        BillStatus::Accepted => "Accepté".to_string(),
        BillStatus::Refused => "Refusé".to_string(),
        BillStatus::Unknown(raw) => raw.clone(),
    }
}

/// `400 €`, `12.50 €`.
pub fn format_amount(amount: Money, currency_symbol: &str) -> String {
    format!("{} {}", amount, currency_symbol)
}

// =============================================================================
// Unit Tests
// =============================================================================
