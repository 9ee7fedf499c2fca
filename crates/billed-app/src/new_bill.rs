//! # New Bill Form
//!
//! Validates the selected receipt, assembles the bill from the form and
//! submits it through the Store Gateway.
//!
//! ## Form States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            valid file selected                                          │
//! │  ┌─────────┐ ─────────────────────► ┌─────────┐                         │
//! │  │ Editing │                        │  Ready  │                         │
//! │  └─────────┘ ◄───────────────────── └─────────┘                         │
//! │     ▲   ▲     invalid file / correct()   │ handle_submit                │
//! │     │   │                                ▼                              │
//! │     │   │     create() rejected     ┌────────────┐   ack   ┌─────────┐  │
//! │     │   └───────────────────────────│ Submitting │────────►│Submitted│  │
//! │     │         (values kept)         └────────────┘         └─────────┘  │
//! │     │                                                       navigate    │
//! │     └── form errors (no store call)                         to Bills    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Submission takes `&mut self`, so one form instance never has two
//! submissions in flight.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use billed_core::validation::{build_request, validate_receipt_file, FileRules, FormRules};
use billed_core::{CoreError, FormValues, ReceiptFile};
use billed_store::{Ack, Attachment, CreateRequest, Session, SessionStore, StoreGateway};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult, ErrorCode};
use crate::routes::{Navigator, Route};
use crate::view::NewBillView;

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormState {
    Editing,
    Ready,
    Submitting,
    Submitted,
}

/// The new bill form pipeline.
pub struct NewBill {
    gateway: Arc<dyn StoreGateway>,
    navigator: Arc<dyn Navigator>,
    view: Arc<dyn NewBillView>,
    email: String,
    collection: String,
    file_rules: FileRules,
    form_rules: FormRules,
    state: FormState,
    selected_file: Option<ReceiptFile>,
    values: Option<FormValues>,
    last_error: Option<AppError>,
}

impl NewBill {
    /// Builds the form for the signed-in user.
    ///
    /// Fails with `SESSION_ERROR` when no user with an email is signed in.
    pub fn new(
        gateway: Arc<dyn StoreGateway>,
        navigator: Arc<dyn Navigator>,
        view: Arc<dyn NewBillView>,
        session_store: &dyn SessionStore,
        config: &AppConfig,
    ) -> AppResult<Self> {
        let session = Session::load(session_store)?;
        let email = session.email().map(str::to_string).ok_or_else(|| {
            AppError::new(ErrorCode::SessionError, "Signed-in user has no email")
        })?;

        debug!(role = ?session.role(), email = %email, "New bill form opened");

        Ok(NewBill {
            gateway,
            navigator,
            view,
            email,
            collection: config.bills_collection().to_string(),
            file_rules: config.file_rules(),
            form_rules: config.form_rules(),
            state: FormState::Editing,
            selected_file: None,
            values: None,
            last_error: None,
        })
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn selected_file(&self) -> Option<&ReceiptFile> {
        self.selected_file.as_ref()
    }

    /// Values last handed to [`NewBill::handle_submit`].
    pub fn values(&self) -> Option<&FormValues> {
        self.values.as_ref()
    }

    pub fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    /// File input changed.
    ///
    /// Toggles the file error indicator. The selection is kept even when it
    /// is rejected; nothing is sent to the store.
    pub fn handle_change_file(&mut self, file: ReceiptFile) -> AppResult<()> {
        debug!(file_name = %file.file_name, mime_type = %file.mime_type, "handle_change_file");

        if self.state == FormState::Submitted {
            return Err(self.fail(AppError::already_submitted()));
        }

        let checked = validate_receipt_file(&file, &self.file_rules);
        self.selected_file = Some(file);

        match checked {
            Ok(()) => {
                self.view.set_file_error_visible(false);
                self.state = FormState::Ready;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Receipt file rejected");
                self.view.set_file_error_visible(true);
                self.state = FormState::Editing;
                Err(self.fail(e.into()))
            }
        }
    }

    /// Explicit correction: back to editing. The file indicator is untouched.
    pub fn correct(&mut self) {
        if matches!(self.state, FormState::Ready | FormState::Submitting) {
            debug!(from = ?self.state, "Form back to editing");
            self.state = FormState::Editing;
        }
    }

    /// Submit button.
    ///
    /// On success the bills list is shown, exactly once. On any failure the
    /// form stays put with `values` kept for a retry.
    pub async fn handle_submit(&mut self, values: FormValues) -> AppResult<Ack> {
        debug!(state = ?self.state, "handle_submit");

        if self.state == FormState::Submitted {
            return Err(self.fail(AppError::already_submitted()));
        }

        let Some(file) = self.selected_file.clone() else {
            return Err(self.fail(AppError::no_file_selected()));
        };

        if let Err(e) = validate_receipt_file(&file, &self.file_rules) {
            self.state = FormState::Editing;
            return Err(self.fail(e.into()));
        }

        self.values = Some(values.clone());

        let request = match build_request(&values, &self.email, file, &self.form_rules) {
            Ok(request) => request,
            Err(errors) => {
                warn!(errors = %errors, "New bill form rejected");
                self.view.show_form_errors(&errors);
                self.state = FormState::Editing;
                return Err(self.fail(CoreError::Form(errors).into()));
            }
        };

        self.state = FormState::Submitting;

        let create = CreateRequest {
            fields: request.fields(),
            attachment: Some(Attachment::from(request.file)),
        };

        match self.gateway.collection(&self.collection).create(create).await {
            Ok(ack) => {
                info!(bill_id = %ack.id, "Bill submitted");
                self.state = FormState::Submitted;
                self.last_error = None;
                self.navigator.navigate(Route::Bills);
                Ok(ack)
            }
            Err(e) => {
                error!(error = %e, "Submitting bill failed");
                self.state = FormState::Editing;
                Err(self.fail(e.into()))
            }
        }
    }

    fn fail(&mut self, err: AppError) -> AppError {
        self.last_error = Some(err.clone());
        err
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
