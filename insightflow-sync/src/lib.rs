//! Cross-context snapshot synchronization
//!
//! Another execution context working against the same data directory
//! persists full snapshots per key. This crate watches the directory and
//! reconciles the local in-memory store: forms, responses and analyses are
//! replaced wholesale (last-writer-wins, no merge), and an externally
//! removed session snapshot forces the local session to log out. The
//! context's own writes are excluded via the durable store's own-write
//! ledger.

pub mod error;
pub mod watcher;

pub use error::{SyncError, SyncResult};
pub use watcher::{StoreWatcher, SyncEvent};
