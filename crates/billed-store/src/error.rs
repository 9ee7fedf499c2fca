//! # Store Error Types
//!
//! Error types for Store Gateway and Session Store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Adapter rejection ("Erreur 404", "HTTP 500", "timeout", ...)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← classified by from_message                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppError (billed-app) ← serialized for the presentation layer         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Error page shows the literal message                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Store Gateway and Session Store errors.
///
/// The `Display` text of the transport variants is exactly what the error
/// page renders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The collection or document does not exist.
    #[error("Erreur 404")]
    NotFound,

    /// The remote service failed.
    #[error("Erreur 500")]
    Server,

    /// Any other rejection, shown as-is.
    #[error("{0}")]
    Other(String),

    /// A record's payload cannot be read as fields.
    ///
    /// ## When This Occurs
    /// - `data()` on a record whose payload is not a JSON object
    #[error("Malformed record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },

    /// The session store holds no usable user entry.
    #[error("Session error: {0}")]
    Session(String),
}

impl StoreError {
    /// Classifies a rejection message from an adapter.
    ///
    /// ```text
    /// "Erreur 404"          → NotFound
    /// "HTTP 500 from store" → Server
    /// "timeout"             → Other("timeout")
    /// "after 5000ms"        → Other("after 5000ms")
    /// ```
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if has_status(&message, "404") {
            StoreError::NotFound
        } else if has_status(&message, "500") {
            StoreError::Server
        } else {
            StoreError::Other(message)
        }
    }

    /// HTTP-like status of the transport variants.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            StoreError::NotFound => Some(404),
            StoreError::Server => Some(500),
            _ => None,
        }
    }

    /// Message rendered by the error page.
    pub fn display_message(&self) -> String {
        self.to_string()
    }

    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::MalformedRecord {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// True when `status` appears as a whole run of digits in `message`.
fn has_status(message: &str, status: &str) -> bool {
    message
        .split(|c: char| !c.is_ascii_digit())
        .any(|digits| digits == status)
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_message_classifies() {
        assert_eq!(StoreError::from_message("Erreur 404"), StoreError::NotFound);
        assert_eq!(StoreError::from_message("Erreur 500"), StoreError::Server);
        assert_eq!(
            StoreError::from_message("connection reset"),
            StoreError::Other("connection reset".to_string())
        );
    }

    #[test]
    fn test_from_message_ignores_longer_numbers() {
        assert_eq!(
            StoreError::from_message("request timed out after 5000ms"),
            StoreError::Other("request timed out after 5000ms".to_string())
        );
        assert_eq!(
            StoreError::from_message("request id 14045"),
            StoreError::Other("request id 14045".to_string())
        );
        assert_eq!(StoreError::from_message("HTTP/1.1 404 Not Found"), StoreError::NotFound);
        assert_eq!(StoreError::from_message("status=500;"), StoreError::Server);
    }

    #[test]
    fn test_display_is_the_page_message() {
        assert_eq!(StoreError::NotFound.display_message(), "Erreur 404");
        assert_eq!(StoreError::Server.to_string(), "Erreur 500");
        assert_eq!(StoreError::Other("boom".into()).to_string(), "boom");
        assert_eq!(StoreError::NotFound.status_code(), Some(404));
        assert_eq!(StoreError::Other("boom".into()).status_code(), None);
    }
}
