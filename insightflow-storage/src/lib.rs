//! Durable snapshot storage and in-memory application state
//!
//! The durable store persists each logical collection (institutions,
//! departments, forms, responses, analyses, current session) as its own
//! JSON snapshot file. `AppStore` owns the in-memory collections behind a
//! single lock, persists the affected collection on every mutation, and
//! exposes the repository surface the rest of the system works through.

pub mod adapter;
pub mod error;
pub mod keys;
pub mod seed;
pub mod state;
pub mod store;

pub use adapter::DurableStore;
pub use error::{StorageError, StorageResult};
pub use keys::StoreKey;
pub use state::AppState;
pub use store::AppStore;
