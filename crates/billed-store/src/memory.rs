//! # In-Memory Store Gateway
//!
//! A `StoreGateway` that keeps collections in process memory.
//!
//! ## Uses
//! - End-to-end pipeline tests without a remote service
//! - The CLI, seeded from a JSON fixture file
//!
//! ## Fixture Format
//! ```json
//! {
//!   "bills": [
//!     { "id": "47qAXb6fIm2zOKkLzMro", "name": "encore", "date": "2004-04-04", ... }
//!   ]
//! }
//! ```
//! Each top-level key is a collection. A record's `id` is lifted out of its
//! payload; records without one get a fresh UUID. Non-object entries are
//! kept verbatim so malformed data can be exercised.
//!
//! ## Failure Injection
//! ```text
//! store.fail_next("bills", Operation::List, StoreError::NotFound).await;
//!
//!   list() ──► Err(Erreur 404)   (consumed)
//!   list() ──► Ok(records)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::gateway::{Ack, Collection, CreateRequest, StoreGateway, StoredRecord};

/// Collection operation targeted by failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
}

#[derive(Debug, Default)]
struct Inner {
    collections: RwLock<HashMap<String, Vec<StoredRecord>>>,
    failures: RwLock<HashMap<(String, Operation), StoreError>>,
}

/// In-memory Store Gateway. Cloning shares the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Builds a store from fixture JSON.
    pub fn from_fixture(json: &str) -> StoreResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| StoreError::Other(format!("Invalid fixture: {}", e)))?;

        let Value::Object(collections) = value else {
            return Err(StoreError::Other(
                "Invalid fixture: expected an object of collections".to_string(),
            ));
        };

        let mut seeded = HashMap::new();
        for (name, records) in collections {
            let Value::Array(records) = records else {
                return Err(StoreError::Other(format!(
                    "Invalid fixture: collection '{}' is not an array",
                    name
                )));
            };
            let records: Vec<StoredRecord> = records.into_iter().map(fixture_record).collect();
            debug!(collection = %name, count = records.len(), "Seeded collection");
            seeded.insert(name, records);
        }

        Ok(MemoryStore {
            inner: Arc::new(Inner {
                collections: RwLock::new(seeded),
                failures: RwLock::default(),
            }),
        })
    }

    /// Appends a record to a collection.
    pub async fn insert(&self, collection: &str, record: StoredRecord) {
        self.inner
            .collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    /// Snapshot of a collection's records.
    pub async fn records(&self, collection: &str) -> Vec<StoredRecord> {
        self.inner
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Makes the next `operation` on `collection` fail with `error`.
    pub async fn fail_next(&self, collection: &str, operation: Operation, error: StoreError) {
        self.inner
            .failures
            .write()
            .await
            .insert((collection.to_string(), operation), error);
    }
}

fn fixture_record(entry: Value) -> StoredRecord {
    match entry {
        Value::Object(mut fields) => {
            let id = match fields.remove("id") {
                Some(Value::String(id)) => id,
                Some(other) => other.to_string(),
                None => Uuid::new_v4().to_string(),
            };
            StoredRecord::new(id, Value::Object(fields))
        }
        other => StoredRecord::new(Uuid::new_v4().to_string(), other),
    }
}

impl StoreGateway for MemoryStore {
    fn collection(&self, name: &str) -> Arc<dyn Collection> {
        Arc::new(MemoryCollection {
            name: name.to_string(),
            inner: Arc::clone(&self.inner),
        })
    }
}

// =============================================================================
// Collection
// =============================================================================

struct MemoryCollection {
    name: String,
    inner: Arc<Inner>,
}

impl MemoryCollection {
    async fn injected_failure(&self, operation: Operation) -> StoreResult<()> {
        let key = (self.name.clone(), operation);
        match self.inner.failures.write().await.remove(&key) {
            Some(error) => {
                debug!(collection = %self.name, ?operation, %error, "Injected failure");
                Err(error)
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn list(&self) -> StoreResult<Vec<StoredRecord>> {
        self.injected_failure(Operation::List).await?;

        let records = self
            .inner
            .collections
            .read()
            .await
            .get(&self.name)
            .cloned()
            .unwrap_or_default();

        debug!(collection = %self.name, count = records.len(), "Listed records");
        Ok(records)
    }

    async fn create(&self, request: CreateRequest) -> StoreResult<Ack> {
        self.injected_failure(Operation::Create).await?;

        let Value::Object(mut fields) = request.fields else {
            return Err(StoreError::Other(
                "create payload must be an object".to_string(),
            ));
        };

        let id = Uuid::new_v4().to_string();
        fields.insert("status".to_string(), Value::from("pending"));

        let file_url = request.attachment.map(|attachment| {
            let url = format!("memory://{}/{}/{}", self.name, id, attachment.file_name);
            fields.insert("fileUrl".to_string(), Value::from(url.clone()));
            fields.insert("fileName".to_string(), Value::from(attachment.file_name));
            url
        });

        self.inner
            .collections
            .write()
            .await
            .entry(self.name.clone())
            .or_default()
            .push(StoredRecord::new(id.clone(), Value::Object(fields)));

        info!(collection = %self.name, id = %id, "Created record");
        Ok(Ack { id, file_url })
    }

    async fn update(&self, selector: &str, fields: Value) -> StoreResult<Ack> {
        self.injected_failure(Operation::Update).await?;

        let Value::Object(changes) = fields else {
            return Err(StoreError::Other(
                "update payload must be an object".to_string(),
            ));
        };

        let mut collections = self.inner.collections.write().await;
        let record = collections
            .get_mut(&self.name)
            .and_then(|records| records.iter_mut().find(|r| r.id == selector))
            .ok_or(StoreError::NotFound)?;

        if !record.payload.is_object() {
            record.payload = Value::Object(Map::new());
        }
        if let Value::Object(existing) = &mut record.payload {
            existing.extend(changes);
        }

        info!(collection = %self.name, id = %selector, "Updated record");
        Ok(Ack {
            id: selector.to_string(),
            file_url: None,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Attachment;
    use serde_json::json;

    const FIXTURE: &str = r#"{
        "bills": [
            { "id": "a", "name": "encore", "date": "2004-04-04", "status": "pending" },
            { "name": "no id", "date": "2003-03-03" },
            "garbage"
        ]
    }"#;

    #[tokio::test]
    async fn test_fixture_seeds_collections() {
        let store = MemoryStore::from_fixture(FIXTURE).unwrap();
        let records = store.collection("bills").list().await.unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "a");
        assert!(records[0].payload.get("id").is_none());
        assert!(!records[1].id.is_empty());
        assert!(records[2].data().is_err());
    }

    #[tokio::test]
    async fn test_invalid_fixture() {
        assert!(MemoryStore::from_fixture("[]").is_err());
        assert!(MemoryStore::from_fixture(r#"{"bills": 3}"#).is_err());
        assert!(MemoryStore::from_fixture("not json").is_err());
    }

    #[tokio::test]
    async fn test_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.collection("bills").list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_id_status_and_file() {
        let store = MemoryStore::new();
        let bills = store.collection("bills");

        let ack = bills
            .create(CreateRequest {
                fields: json!({ "name": "encore", "amount": 400 }),
                attachment: Some(Attachment {
                    file_name: "facture.jpg".to_string(),
                    mime_type: "image/jpeg".to_string(),
                    bytes: vec![1, 2, 3],
                }),
            })
            .await
            .unwrap();

        let records = store.records("bills").await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, ack.id);
        assert_eq!(records[0].payload["status"], "pending");
        assert_eq!(records[0].payload["fileName"], "facture.jpg");
        assert_eq!(
            ack.file_url.as_deref(),
            records[0].payload["fileUrl"].as_str()
        );
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryStore::new();
        store
            .insert("bills", StoredRecord::new("a", json!({ "status": "pending", "name": "x" })))
            .await;

        store
            .collection("bills")
            .update("a", json!({ "status": "accepted" }))
            .await
            .unwrap();

        let records = store.records("bills").await;
        assert_eq!(records[0].payload["status"], "accepted");
        assert_eq!(records[0].payload["name"], "x");

        let missing = store.collection("bills").update("zz", json!({})).await;
        assert_eq!(missing.unwrap_err(), StoreError::NotFound);
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let store = MemoryStore::from_fixture(FIXTURE).unwrap();
        store
            .fail_next("bills", Operation::List, StoreError::from_message("Erreur 500"))
            .await;

        let bills = store.collection("bills");
        assert_eq!(bills.list().await.unwrap_err(), StoreError::Server);
        assert_eq!(bills.list().await.unwrap().len(), 3);
    }
}
