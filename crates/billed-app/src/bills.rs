//! # Bills Page
//!
//! Lists the signed-in employee's bills and handles the page's controls.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_bills()                                                            │
//! │                                                                         │
//! │  collection("bills").list() ──Err──► AppError ("Erreur 404" / "500")   │
//! │        │ Ok(records)                                                    │
//! │        ▼                                                                │
//! │  record.data() ──Err──► placeholder + UnreadableRecord                 │
//! │        │ Ok(fields)                                                     │
//! │        ▼                                                                │
//! │  decode_fields ──► DecodedBill (maybe Degraded)                        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  prepare_listing ──► BillListing (newest first, raw dates last)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use billed_core::decode::{decode_fields, unreadable};
use billed_core::{prepare_listing, BillListing, BillRow, DisplayOptions, RECEIPT_PREVIEW_RATIO};
use billed_store::{Session, SessionStore, StoreGateway};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::routes::{Navigator, Route};

/// What the bills page renders: the table, or an error state with no table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum BillsPage {
    Loaded(BillListing),
    Error { message: String },
}

impl BillsPage {
    pub fn rows(&self) -> &[BillRow] {
        match self {
            BillsPage::Loaded(listing) => &listing.rows,
            BillsPage::Error { .. } => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            BillsPage::Loaded(_) => None,
            BillsPage::Error { message } => Some(message.as_str()),
        }
    }
}

/// Content of the receipt modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptPreview {
    pub url: String,
    pub file_name: String,
    /// Image width in pixels.
    pub width: u32,
}

/// The bills page pipeline.
pub struct Bills {
    gateway: Arc<dyn StoreGateway>,
    navigator: Arc<dyn Navigator>,
    session: Option<Session>,
    collection: String,
    display: DisplayOptions,
}

impl Bills {
    /// Builds the pipeline. A missing session is logged, not fatal.
    pub fn new(
        gateway: Arc<dyn StoreGateway>,
        navigator: Arc<dyn Navigator>,
        session_store: &dyn SessionStore,
        config: &AppConfig,
    ) -> Self {
        let session = match Session::load(session_store) {
            Ok(session) => {
                debug!(role = ?session.role(), email = ?session.email(), "Bills page opened");
                Some(session)
            }
            Err(e) => {
                warn!(error = %e, "Bills page opened without a session user");
                None
            }
        };

        Bills {
            gateway,
            navigator,
            session,
            collection: config.bills_collection().to_string(),
            display: config.display_options(),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Fetches, decodes and orders the bills.
    pub async fn get_bills(&self) -> AppResult<BillListing> {
        debug!(collection = %self.collection, "get_bills");

        let records = self
            .gateway
            .collection(&self.collection)
            .list()
            .await
            .map_err(|e| {
                error!(collection = %self.collection, error = %e, "Listing bills failed");
                AppError::from(e)
            })?;

        let decoded = records.iter().map(|record| match record.data() {
            Ok(fields) => decode_fields(&record.id, fields),
            Err(e) => unreadable(&record.id, e.to_string()),
        });

        let listing = prepare_listing(decoded, &self.display);

        for entry in &listing.diagnostics {
            warn!(bill_id = %entry.bill_id, diagnostic = %entry.diagnostic, "Degraded bill record");
        }
        info!(
            count = listing.len(),
            degraded = listing.diagnostics.len(),
            "Bills loaded"
        );

        Ok(listing)
    }

    /// Loads the page: the table, or the store's message in place of it.
    pub async fn load_page(&self) -> BillsPage {
        match self.get_bills().await {
            Ok(listing) => BillsPage::Loaded(listing),
            Err(e) => BillsPage::Error { message: e.message },
        }
    }

    /// "New bill" button.
    pub fn handle_click_new_bill(&self) {
        debug!("handle_click_new_bill");
        self.navigator.navigate(Route::NewBill);
    }

    /// Eye icon of a row: the receipt to show in the modal.
    pub fn handle_click_icon_eye(&self, row: &BillRow, modal_width: u32) -> ReceiptPreview {
        let width = (f64::from(modal_width) * RECEIPT_PREVIEW_RATIO).floor() as u32;
        debug!(bill_id = %row.bill.id, width, "handle_click_icon_eye");

        ReceiptPreview {
            url: row.bill.file_url.clone(),
            file_name: row.bill.file_name.clone(),
            width,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::MockNavigator;
    use billed_core::{User, UserRole};
    use billed_store::{
        Collection, MemorySessionStore, MemoryStore, MockCollection, MockStoreGateway,
        Operation, StoreError,
    };
    use mockall::predicate::eq;

    const FIXTURE: &str = r#"{
        "bills": [
            { "id": "a", "name": "encore", "date": "2004-04-04", "amount": 400, "status": "pending",
              "fileUrl": "https://test.storage.tld/a.jpg", "fileName": "a.jpg" },
            { "id": "b", "name": "test1", "date": "2001-01-01", "amount": 100, "status": "refused" },
            { "id": "c", "name": "test3", "date": "2003-03-03", "amount": 300, "status": "accepted" },
            { "id": "d", "name": "test2", "date": "2002-02-02", "amount": 200, "status": "refused" }
        ]
    }"#;

    fn employee_session() -> MemorySessionStore {
        MemorySessionStore::signed_in(&User::employee("a@a")).unwrap()
    }

    fn idle_navigator() -> Arc<dyn Navigator> {
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().times(0);
        Arc::new(navigator)
    }

    fn bills_with(gateway: Arc<dyn StoreGateway>, navigator: Arc<dyn Navigator>) -> Bills {
        Bills::new(gateway, navigator, &employee_session(), &AppConfig::default())
    }

    fn failing_gateway(error: StoreError) -> Arc<dyn StoreGateway> {
        let mut collection = MockCollection::new();
        collection
            .expect_list()
            .times(1)
            .returning(move || Err(error.clone()));
        let collection: Arc<dyn Collection> = Arc::new(collection);

        let mut gateway = MockStoreGateway::new();
        gateway
            .expect_collection()
            .with(eq("bills"))
            .returning(move |_| Arc::clone(&collection));
        Arc::new(gateway)
    }

    fn ids(page: &BillsPage) -> Vec<&str> {
        page.rows().iter().map(|r| r.bill.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_bills_are_ordered_newest_first() {
        let store = MemoryStore::from_fixture(FIXTURE).unwrap();
        let bills = bills_with(Arc::new(store), idle_navigator());

        let page = bills.load_page().await;

        assert_eq!(ids(&page), vec!["a", "c", "d", "b"]);
        assert_eq!(page.rows()[0].display_date, "4 Avr. 04");
        assert_eq!(page.rows()[0].display_status, "En attente");
        assert_eq!(page.rows()[0].display_amount, "400 €");
    }

    #[tokio::test]
    async fn test_invalid_date_is_kept() {
        let store = MemoryStore::from_fixture(FIXTURE).unwrap();
        store
            .insert(
                "bills",
                billed_store::StoredRecord::new("e", serde_json::json!({ "date": "hier" })),
            )
            .await;
        store
            .insert("bills", billed_store::StoredRecord::new("f", serde_json::json!(42)))
            .await;
        let bills = bills_with(Arc::new(store), idle_navigator());

        let listing = bills.get_bills().await.unwrap();

        assert_eq!(listing.len(), 6);
        assert_eq!(listing.rows[4].bill.id, "e");
        assert_eq!(listing.rows[4].display_date, "hier");
        assert_eq!(listing.rows[5].bill.id, "f");
        assert_eq!(listing.diagnostics.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_collection_is_an_empty_list() {
        let bills = bills_with(Arc::new(MemoryStore::new()), idle_navigator());

        let page = bills.load_page().await;
        assert_eq!(page, BillsPage::Loaded(BillListing::default()));
    }

    #[tokio::test]
    async fn test_not_found_renders_error_page() {
        let bills = bills_with(failing_gateway(StoreError::from_message("Erreur 404")), idle_navigator());

        let page = bills.load_page().await;

        assert_eq!(page.error_message(), Some("Erreur 404"));
        assert!(page.rows().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_renders_error_page() {
        let bills = bills_with(failing_gateway(StoreError::from_message("Erreur 500")), idle_navigator());

        let page = bills.load_page().await;

        assert_eq!(page.error_message(), Some("Erreur 500"));
        assert!(page.rows().is_empty());
    }

    #[tokio::test]
    async fn test_injected_failure_then_recovery() {
        let store = MemoryStore::from_fixture(FIXTURE).unwrap();
        store
            .fail_next("bills", Operation::List, StoreError::Server)
            .await;
        let bills = bills_with(Arc::new(store), idle_navigator());

        assert_eq!(bills.load_page().await.error_message(), Some("Erreur 500"));
        assert_eq!(bills.load_page().await.rows().len(), 4);
    }

    #[tokio::test]
    async fn test_concurrent_loads_are_independent() {
        let store = MemoryStore::from_fixture(FIXTURE).unwrap();
        store
            .fail_next("bills", Operation::List, StoreError::NotFound)
            .await;
        let bills = bills_with(Arc::new(store), idle_navigator());

        let (first, second) = tokio::join!(bills.get_bills(), bills.get_bills());

        // The one-shot failure hits exactly one of the two calls.
        let (failed, loaded) = match (first, second) {
            (Err(e), Ok(listing)) | (Ok(listing), Err(e)) => (e, listing),
            other => panic!("expected one failure and one listing, got {:?}", other),
        };
        assert_eq!(failed.message, "Erreur 404");
        assert_eq!(loaded.len(), 4);

        let (first, second) = tokio::join!(bills.get_bills(), bills.get_bills());
        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn test_click_new_bill_navigates() {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .with(eq(Route::NewBill))
            .times(1)
            .return_const(());
        let bills = bills_with(Arc::new(MemoryStore::new()), Arc::new(navigator));

        bills.handle_click_new_bill();
    }

    #[tokio::test]
    async fn test_click_icon_eye_sizes_preview() {
        let store = MemoryStore::from_fixture(FIXTURE).unwrap();
        let bills = bills_with(Arc::new(store), idle_navigator());
        let listing = bills.get_bills().await.unwrap();

        let preview = bills.handle_click_icon_eye(&listing.rows[0], 501);

        assert_eq!(preview.url, "https://test.storage.tld/a.jpg");
        assert_eq!(preview.file_name, "a.jpg");
        assert_eq!(preview.width, 250);
    }

    #[test]
    fn test_admin_session_is_accepted() {
        let store = MemorySessionStore::new();
        store
            .set_item("user", r#"{"type":"Admin","email":"admin@test.tld"}"#)
            .unwrap();

        let bills = Bills::new(
            Arc::new(MemoryStore::new()),
            idle_navigator(),
            &store,
            &AppConfig::default(),
        );
        assert_eq!(bills.session().map(|s| s.role()), Some(UserRole::Admin));
    }

    #[test]
    fn test_missing_session_is_not_fatal() {
        let bills = Bills::new(
            Arc::new(MemoryStore::new()),
            idle_navigator(),
            &MemorySessionStore::new(),
            &AppConfig::default(),
        );
        assert!(bills.session().is_none());
    }
}
