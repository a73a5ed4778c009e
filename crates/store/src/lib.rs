//! `quotedesk-store`
//!
//! **Responsibility:** the local ledger of one company.
//!
//! This crate provides:
//! - The [`LedgerStore`]: company profile, quotation history, the quotation
//!   number sequence and the session timestamp
//! - Lazy session expiry (see [`session`])
//! - Snapshot export/import of the whole ledger
//! - Pluggable key-value backends (in-memory and SQLite)
//!
//! There is no process-wide state: build one store at start-up and pass it
//! by reference.

pub mod backend;
pub mod clock;
pub mod error;
pub mod ledger;
pub mod session;
pub mod snapshot;

pub use backend::{KeyValueBackend, MemoryBackend, SqliteBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ImportError, StoreError, StoreResult};
pub use ledger::{LedgerStore, keys};
pub use session::{SessionPolicy, SessionState};
pub use snapshot::{ImportSummary, Snapshot};
