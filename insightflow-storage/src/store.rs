//! Application store: repositories over the in-memory state
//!
//! Single owner of `AppState` behind one `RwLock`, so mutations within a
//! context are atomic with respect to each other. Every mutator persists
//! the affected collection before returning; queries are recomputed over
//! current state on each access. Concurrency across contexts goes through
//! the durable snapshots and the sync watcher, never through this lock.

use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

use insightflow_core::validation::{validate_form, validate_submission};
use insightflow_core::{
    fresh_id, now_iso, AnalysisRecord, AnswerValue, Department, FormResponse, FormTemplate,
    Institution, InstitutionUpdate, User,
};

use crate::adapter::DurableStore;
use crate::error::{StorageError, StorageResult};
use crate::keys::StoreKey;
use crate::state::AppState;

/// The stateful core of an InsightFlow context
pub struct AppStore {
    state: RwLock<AppState>,
    durable: DurableStore,
}

impl AppStore {
    /// Hydrate a store from its durable snapshots
    pub fn open(durable: DurableStore) -> Self {
        let state = AppState::hydrate(&durable);
        Self {
            state: RwLock::new(state),
            durable,
        }
    }

    /// Handle to the underlying durable store (shared own-write ledger)
    pub fn durable(&self) -> &DurableStore {
        &self.durable
    }

    // --- institutions ---

    /// Prepend a new institution and persist the collection
    pub async fn add_institution(&self, institution: Institution) -> StorageResult<()> {
        let mut state = self.state.write().await;
        info!("Adding institution '{}' ({})", institution.name, institution.id);
        state.institutions.insert(0, institution);
        self.durable.save(StoreKey::Institutions, &state.institutions)
    }

    /// Merge partial fields into the matching institution. No-op when the
    /// id is unknown.
    pub async fn update_institution(
        &self,
        id: &str,
        update: InstitutionUpdate,
    ) -> StorageResult<()> {
        let mut state = self.state.write().await;
        match state.institutions.iter_mut().find(|i| i.id == id) {
            Some(institution) => {
                update.apply_to(institution);
                self.durable.save(StoreKey::Institutions, &state.institutions)
            }
            None => {
                debug!("update_institution: no institution with id '{}'", id);
                Ok(())
            }
        }
    }

    pub async fn institutions(&self) -> Vec<Institution> {
        self.state.read().await.institutions.clone()
    }

    /// Institution of the current session, if any
    pub async fn get_current_institution(&self) -> Option<Institution> {
        let state = self.state.read().await;
        let institution_id = state.session.as_ref()?.institution_id.as_ref()?;
        state
            .institutions
            .iter()
            .find(|i| &i.id == institution_id)
            .cloned()
    }

    // --- departments ---

    /// Append a new department and persist the collection
    pub async fn add_department(&self, department: Department) -> StorageResult<()> {
        let mut state = self.state.write().await;
        info!(
            "Adding department '{}' to institution '{}'",
            department.name, department.institution_id
        );
        state.departments.push(department);
        self.durable.save(StoreKey::Departments, &state.departments)
    }

    pub async fn departments(&self) -> Vec<Department> {
        self.state.read().await.departments.clone()
    }

    // --- forms ---

    /// Validate and prepend a form. The form's institutionId is rewritten
    /// to the acting session's institution before insertion; tenant
    /// containment cannot be bypassed by the creator.
    pub async fn add_form(&self, mut form: FormTemplate) -> StorageResult<FormTemplate> {
        validate_form(&form)?;

        let mut state = self.state.write().await;
        if let Some(institution_id) = state
            .session
            .as_ref()
            .and_then(|u| u.institution_id.clone())
        {
            form.institution_id = institution_id;
        }
        info!("Adding form '{}' ({})", form.title, form.id);
        state.forms.insert(0, form.clone());
        self.durable.save(StoreKey::Forms, &state.forms)?;
        Ok(form)
    }

    pub async fn get_form(&self, id: &str) -> Option<FormTemplate> {
        self.state
            .read()
            .await
            .forms
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }

    /// Master list, unfiltered by visibility
    pub async fn all_forms(&self) -> Vec<FormTemplate> {
        self.state.read().await.forms.clone()
    }

    // --- responses ---

    /// Public submission path: the form must exist and every required
    /// field must carry a non-empty answer. Rejected submissions leave the
    /// collection untouched. Responses are immutable once appended; there
    /// is no update or delete counterpart.
    pub async fn submit_response(
        &self,
        form_id: &str,
        answers: HashMap<String, AnswerValue>,
    ) -> StorageResult<FormResponse> {
        let mut state = self.state.write().await;
        let form = state
            .forms
            .iter()
            .find(|f| f.id == form_id)
            .ok_or_else(|| StorageError::FormNotFound {
                id: form_id.to_string(),
            })?;
        validate_submission(form, &answers)?;

        let response = FormResponse {
            id: fresh_id("r"),
            form_id: form_id.to_string(),
            answers,
            submitted_at: now_iso(),
        };
        state.responses.insert(0, response.clone());
        self.durable.save(StoreKey::Responses, &state.responses)?;
        Ok(response)
    }

    /// All responses for a form, in current collection order (newest-first)
    pub async fn get_responses_by_form(&self, form_id: &str) -> Vec<FormResponse> {
        self.state
            .read()
            .await
            .responses
            .iter()
            .filter(|r| r.form_id == form_id)
            .cloned()
            .collect()
    }

    pub async fn responses(&self) -> Vec<FormResponse> {
        self.state.read().await.responses.clone()
    }

    // --- analyses ---

    /// Insert an analysis record, replacing any prior record for the same
    /// form (at most one record per formId).
    pub async fn add_analysis(&self, analysis: AnalysisRecord) -> StorageResult<()> {
        let mut state = self.state.write().await;
        state.analyses.retain(|a| a.form_id != analysis.form_id);
        info!("Recording analysis for form '{}'", analysis.form_id);
        state.analyses.insert(0, analysis);
        self.durable.save(StoreKey::Analyses, &state.analyses)
    }

    pub async fn get_analysis_by_form(&self, form_id: &str) -> Option<AnalysisRecord> {
        self.state
            .read()
            .await
            .analyses
            .iter()
            .find(|a| a.form_id == form_id)
            .cloned()
    }

    pub async fn analyses(&self) -> Vec<AnalysisRecord> {
        self.state.read().await.analyses.clone()
    }

    // --- session ---

    /// Install a session user and persist it for continuity
    pub async fn set_session(&self, user: User) -> StorageResult<()> {
        let mut state = self.state.write().await;
        self.durable.save(StoreKey::Session, &user)?;
        state.session = Some(user);
        Ok(())
    }

    /// Clear the session and remove its snapshot; other contexts observe
    /// the removal and log out too
    pub async fn clear_session(&self) -> StorageResult<()> {
        let mut state = self.state.write().await;
        state.session = None;
        self.durable.remove(StoreKey::Session)
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.session.clone()
    }

    // --- cross-context reconciliation (memory only, no persist-back) ---

    /// Replace the forms collection with an externally observed snapshot
    pub async fn replace_forms(&self, forms: Vec<FormTemplate>) {
        debug!("Replacing forms from external snapshot ({} entries)", forms.len());
        self.state.write().await.forms = forms;
    }

    /// Replace the responses collection with an externally observed snapshot
    pub async fn replace_responses(&self, responses: Vec<FormResponse>) {
        debug!(
            "Replacing responses from external snapshot ({} entries)",
            responses.len()
        );
        self.state.write().await.responses = responses;
    }

    /// Replace the analyses collection with an externally observed snapshot
    pub async fn replace_analyses(&self, analyses: Vec<AnalysisRecord>) {
        debug!(
            "Replacing analyses from external snapshot ({} entries)",
            analyses.len()
        );
        self.state.write().await.analyses = analyses;
    }

    /// External logout propagation: drop the in-memory session without
    /// touching the (already removed) snapshot
    pub async fn force_logout(&self) {
        let mut state = self.state.write().await;
        if state.session.take().is_some() {
            info!("Session cleared by another context");
        }
    }
}
