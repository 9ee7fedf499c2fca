//! # View Contract
//!
//! The stable hooks the presentation layer exposes and the capability the
//! NewBill pipeline drives.
//!
//! ```text
//! Bills page                           NewBill page
//! ┌──────────────────────────────┐     ┌──────────────────────────────┐
//! │ [btn-new-bill]               │     │ form-new-bill                │
//! │ tbody                        │     │   ...fields...               │
//! │   row ... [icon-eye]         │     │   [file]                     │
//! │   row ... [icon-eye]         │     │   file-error-message (hidden)│
//! │ bill-modal                   │     │   [submit-form]              │
//! └──────────────────────────────┘     └──────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use billed_core::FormErrors;

/// Addressable element of the views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewHook {
    BillsTableBody,
    ViewReceiptIcon,
    NewBillButton,
    BillModal,
    NewBillForm,
    FileInput,
    FileErrorMessage,
    SubmitButton,
}

impl ViewHook {
    pub fn id(&self) -> &'static str {
        match self {
            ViewHook::BillsTableBody => "tbody",
            ViewHook::ViewReceiptIcon => "icon-eye",
            ViewHook::NewBillButton => "btn-new-bill",
            ViewHook::BillModal => "bill-modal",
            ViewHook::NewBillForm => "form-new-bill",
            ViewHook::FileInput => "file",
            ViewHook::FileErrorMessage => "file-error-message",
            ViewHook::SubmitButton => "submit-form",
        }
    }
}

impl fmt::Display for ViewHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What the NewBill pipeline asks of the form view.
#[cfg_attr(test, mockall::automock)]
pub trait NewBillView: Send + Sync {
    /// Shows or hides [`ViewHook::FileErrorMessage`].
    fn set_file_error_visible(&self, visible: bool);

    /// Flags every invalid field at once.
    fn show_form_errors(&self, errors: &FormErrors);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_ids() {
        assert_eq!(ViewHook::BillsTableBody.id(), "tbody");
        assert_eq!(ViewHook::ViewReceiptIcon.id(), "icon-eye");
        assert_eq!(ViewHook::NewBillButton.id(), "btn-new-bill");
        assert_eq!(ViewHook::FileInput.id(), "file");
        assert_eq!(ViewHook::FileErrorMessage.to_string(), "file-error-message");
        assert_eq!(ViewHook::SubmitButton.id(), "submit-form");
    }
}
