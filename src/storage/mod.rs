//! Durable history storage
//!
//! The history log is the single source of truth across restarts: one
//! delimited text line per record, append-only, never rewritten. The
//! in-memory registry and alert log are rebuilt from nothing on restart
//! and the log is not replayed into them.

pub mod error;
pub mod history;
pub mod schema;

pub use error::{StorageError, StorageResult};
pub use history::{HistoryStore, STATS_WINDOW, statistics};
pub use schema::{HistoryRecord, StatsSummary};
