//! # billed-store: Store Gateway and Session Store for Billed
//!
//! The two external collaborators the pipelines depend on, expressed as
//! traits, plus in-memory implementations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  billed-app pipelines                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  billed-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │   │
//! │  │   │   gateway     │    │    memory     │    │   session    │    │   │
//! │  │   │ StoreGateway  │◄───│ MemoryStore   │    │ SessionStore │    │   │
//! │  │   │ Collection    │    │ (fixtures,    │    │ Session      │    │   │
//! │  │   │ StoredRecord  │    │  failures)    │    │ MemorySess.. │    │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Remote persistence service (adapter not part of this workspace)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use billed_store::{MemoryStore, StoreGateway};
//!
//! let store = MemoryStore::from_fixture(r#"{"bills": [{"id": "a", "date": "2004-04-04"}]}"#)?;
//! let records = store.collection("bills").list().await?;
//! assert_eq!(records[0].id, "a");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod gateway;
pub mod memory;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use gateway::{Ack, Attachment, Collection, CreateRequest, StoreGateway, StoredRecord};
pub use memory::{MemoryStore, Operation};
pub use session::{MemorySessionStore, Session, SessionStore, USER_KEY};

#[cfg(any(test, feature = "test-export-mocks"))]
pub use gateway::{MockCollection, MockStoreGateway};
