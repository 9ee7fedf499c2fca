//! # billed-app: Bills and NewBill Pipelines
//!
//! Connects the pure logic of billed-core to the collaborators of
//! billed-store and to the presentation layer.
//!
//! ## Module Organization
//! ```text
//! billed_app/
//! ├── lib.rs       ◄─── You are here
//! ├── bills.rs     ◄─── Bills page: list, error page, receipt modal
//! ├── new_bill.rs  ◄─── New bill form state machine
//! ├── routes.rs    ◄─── Route paths + Navigator capability
//! ├── view.rs      ◄─── View hooks + NewBillView capability
//! ├── config.rs    ◄─── TOML / env configuration
//! ├── logging.rs   ◄─── tracing-subscriber setup
//! └── error.rs     ◄─── AppError surfaced to the view
//! ```
//!
//! ## Collaborators
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐    │
//! │  │  StoreGateway    │ │   Navigator      │ │   NewBillView        │    │
//! │  │  (billed-store)  │ │                  │ │                      │    │
//! │  │  • list          │ │  • navigate      │ │  • file error toggle │    │
//! │  │  • create        │ │                  │ │  • form errors       │    │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘    │
//! │                                                                         │
//! │  All injected as Arc<dyn ...>; SessionStore is read once at startup.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod bills;
pub mod config;
pub mod error;
pub mod logging;
pub mod new_bill;
pub mod routes;
pub mod view;

pub use bills::{Bills, BillsPage, ReceiptPreview};
pub use config::{AppConfig, ConfigError};
pub use error::{AppError, AppResult, ErrorCode};
pub use logging::init_tracing;
pub use new_bill::{FormState, NewBill};
pub use routes::{Navigator, Route};
pub use view::{NewBillView, ViewHook};
