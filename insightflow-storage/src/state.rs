//! In-memory application state
//!
//! One value per logical collection plus the current session. Collections
//! keep newest-first order (mutators prepend); departments are the one
//! append-ordered collection.

use insightflow_core::{AnalysisRecord, Department, FormResponse, FormTemplate, Institution, User};
use tracing::info;

use crate::adapter::DurableStore;
use crate::keys::StoreKey;
use crate::seed;

/// The full in-memory state of one execution context
#[derive(Debug, Default)]
pub struct AppState {
    pub institutions: Vec<Institution>,
    pub departments: Vec<Department>,
    pub forms: Vec<FormTemplate>,
    pub responses: Vec<FormResponse>,
    pub analyses: Vec<AnalysisRecord>,
    pub session: Option<User>,
}

impl AppState {
    /// Hydrate state from the durable store, seeding collections that have
    /// never been persisted. Corrupt snapshots fall back to the same
    /// defaults (logged inside the adapter).
    pub fn hydrate(durable: &DurableStore) -> Self {
        let institutions =
            durable.load_or_default(StoreKey::Institutions, seed::default_institutions());
        let departments = durable.load_or_default(StoreKey::Departments, Vec::new());
        let forms = durable.load_or_default(StoreKey::Forms, seed::default_forms());
        let responses = durable.load_or_default(StoreKey::Responses, Vec::new());
        let analyses = durable.load_or_default(StoreKey::Analyses, Vec::new());

        let session = match durable.try_load::<User>(StoreKey::Session) {
            Ok(session) => session,
            Err(e) => {
                // A corrupt session snapshot just means anonymous
                tracing::warn!("Discarding unreadable session snapshot: {}", e);
                None
            }
        };

        info!(
            "Hydrated state: {} institutions, {} departments, {} forms, {} responses, {} analyses",
            institutions.len(),
            departments.len(),
            forms.len(),
            responses.len(),
            analyses.len()
        );

        Self {
            institutions,
            departments,
            forms,
            responses,
            analyses,
            session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hydrate_seeds_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let durable = DurableStore::open(dir.path()).unwrap();
        let state = AppState::hydrate(&durable);

        assert_eq!(state.institutions.len(), 1);
        assert_eq!(state.forms.len(), 1);
        assert!(state.departments.is_empty());
        assert!(state.responses.is_empty());
        assert!(state.session.is_none());
    }

    #[test]
    fn test_hydrate_prefers_persisted_collections() {
        let dir = tempfile::tempdir().unwrap();
        let durable = DurableStore::open(dir.path()).unwrap();
        durable
            .save(StoreKey::Forms, &Vec::<FormTemplate>::new())
            .unwrap();

        let state = AppState::hydrate(&durable);
        // an explicitly persisted empty list is not re-seeded
        assert!(state.forms.is_empty());
    }

    #[test]
    fn test_hydrate_survives_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("responses.json"), b"###").unwrap();
        let durable = DurableStore::open(dir.path()).unwrap();

        let state = AppState::hydrate(&durable);
        assert!(state.responses.is_empty());
    }
}
