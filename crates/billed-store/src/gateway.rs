//! # Store Gateway
//!
//! The seam between the pipelines and the remote persistence service.
//!
//! ```text
//! ┌──────────────┐  collection("bills")  ┌─────────────────────────────────┐
//! │  Pipelines   │──────────────────────►│  dyn Collection                 │
//! │  (billed-app)│                       │   list()   → Vec<StoredRecord>  │
//! │              │◄──────────────────────│   create() → Ack                │
//! └──────────────┘   StoreResult<..>     │   update() → Ack                │
//!                                        └─────────────────────────────────┘
//! ```
//!
//! Records come back opaque. Turning them into bills is the job of
//! `billed_core::decode`.

use std::sync::Arc;

use async_trait::async_trait;
use billed_core::ReceiptFile;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Records
// =============================================================================

/// One record as returned by `list()`: an id and an opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub payload: Value,
}

impl StoredRecord {
    pub fn new(id: impl Into<String>, payload: Value) -> Self {
        StoredRecord {
            id: id.into(),
            payload,
        }
    }

    /// The record's raw fields.
    ///
    /// Fails with `MalformedRecord` when the payload is not an object.
    pub fn data(&self) -> StoreResult<&Map<String, Value>> {
        self.payload
            .as_object()
            .ok_or_else(|| StoreError::malformed(&self.id, "payload is not an object"))
    }
}

/// A binary blob sent alongside a create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl From<ReceiptFile> for Attachment {
    fn from(file: ReceiptFile) -> Self {
        Attachment {
            file_name: file.file_name,
            mime_type: file.mime_type,
            bytes: file.bytes,
        }
    }
}

/// Payload of `create()`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub fields: Value,
    pub attachment: Option<Attachment>,
}

/// Acknowledgement of a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub id: String,
    /// Where the attachment ended up, when one was stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

// =============================================================================
// Traits
// =============================================================================

/// One named collection of the Store Gateway.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Collection: Send + Sync {
    /// Every record in the collection, in collection order.
    async fn list(&self) -> StoreResult<Vec<StoredRecord>>;

    /// Creates a record. The store assigns `id` and `status`.
    async fn create(&self, request: CreateRequest) -> StoreResult<Ack>;

    /// Merges `fields` into the record identified by `selector`.
    async fn update(&self, selector: &str, fields: Value) -> StoreResult<Ack>;
}

/// Hands out collections by name.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait StoreGateway: Send + Sync {
    fn collection(&self, name: &str) -> Arc<dyn Collection>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_of_object_payload() {
        let record = StoredRecord::new("a", json!({ "name": "encore" }));
        assert_eq!(record.data().unwrap()["name"], "encore");
    }

    #[test]
    fn test_data_of_malformed_payload() {
        let record = StoredRecord::new("a", json!([1, 2, 3]));
        assert!(matches!(
            record.data(),
            Err(StoreError::MalformedRecord { ref id, .. }) if id == "a"
        ));
    }

    #[tokio::test]
    async fn test_mock_collection_is_usable_as_trait_object() {
        let mut mock = MockCollection::new();
        mock.expect_list()
            .times(1)
            .returning(|| Ok(vec![StoredRecord::new("a", json!({}))]));

        let collection: Arc<dyn Collection> = Arc::new(mock);
        let records = collection.list().await.unwrap();
        assert_eq!(records.len(), 1);
    }
}
