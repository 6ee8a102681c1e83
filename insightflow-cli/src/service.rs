//! Application service facade
//!
//! Owns the store, session manager, and AI client for one execution
//! context. Operations here are exactly the surface the UI layer calls:
//! everything below goes through the store's repositories and the RBAC
//! visibility filter.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use insightflow_ai::{AiClient, HttpAiClient};
use insightflow_config::InsightflowConfig;
use insightflow_core::{
    export::export_responses_csv, fresh_id, now_iso, validation::validate_form, AnalysisRecord,
    AnswerValue, Department, FormResponse, FormTemplate, Institution, InstitutionUpdate, User,
    UserRole,
};
use insightflow_rbac::{visibility, SessionManager};
use insightflow_storage::{AppStore, DurableStore, StorageError};
use insightflow_sync::StoreWatcher;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to the UI layer
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Rbac(#[from] insightflow_rbac::RbacError),

    #[error(transparent)]
    Ai(#[from] insightflow_ai::AiError),

    #[error(transparent)]
    Sync(#[from] insightflow_sync::SyncError),

    #[error(transparent)]
    Core(#[from] insightflow_core::CoreError),

    #[error(transparent)]
    Validation(#[from] insightflow_core::ValidationError),
}

/// One execution context of the InsightFlow core
pub struct AppService {
    config: InsightflowConfig,
    store: Arc<AppStore>,
    sessions: SessionManager,
    ai: Arc<dyn AiClient>,
    watcher: Option<StoreWatcher>,
}

impl AppService {
    /// Initialize from configuration: hydrate the store from the data
    /// directory and build the HTTP AI client.
    pub fn init(config: InsightflowConfig) -> ServiceResult<Self> {
        let ai = Arc::new(HttpAiClient::new(config.ai.clone())?);
        Self::init_with_ai(config, ai)
    }

    /// Initialize with a caller-supplied AI client (tests use the mock)
    pub fn init_with_ai(
        config: InsightflowConfig,
        ai: Arc<dyn AiClient>,
    ) -> ServiceResult<Self> {
        let durable = DurableStore::open(&config.storage.data_dir)?;
        let store = Arc::new(AppStore::open(durable));
        let sessions = SessionManager::new(store.clone());
        Ok(Self {
            config,
            store,
            sessions,
            ai,
            watcher: None,
        })
    }

    /// Start the cross-context sync watcher
    pub fn start_sync(&mut self) -> ServiceResult<()> {
        let mut watcher = StoreWatcher::new(self.store.clone(), self.config.sync.clone());
        watcher.start()?;
        self.watcher = Some(watcher);
        Ok(())
    }

    /// Stop the watcher, if running
    pub async fn shutdown(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.stop().await;
        }
    }

    pub fn store(&self) -> &Arc<AppStore> {
        &self.store
    }

    // --- session ---

    pub async fn login(
        &self,
        email: &str,
        role: Option<UserRole>,
        institution_id: Option<String>,
        department_id: Option<String>,
    ) -> ServiceResult<User> {
        Ok(self
            .sessions
            .login(email, role, institution_id, department_id)
            .await?)
    }

    pub async fn logout(&self) -> ServiceResult<()> {
        Ok(self.sessions.logout().await?)
    }

    pub async fn current_user(&self) -> Option<User> {
        self.sessions.current_user().await
    }

    pub async fn current_institution(&self) -> Option<Institution> {
        self.store.get_current_institution().await
    }

    // --- institutions & departments ---

    pub async fn add_institution(&self, name: String, logo_url: String) -> ServiceResult<Institution> {
        let institution = Institution {
            id: fresh_id("inst"),
            name,
            logo_url,
            primary_color: "#0f766e".to_string(),
            secondary_color: "#f0fdfa".to_string(),
            created_at: now_iso(),
        };
        self.store.add_institution(institution.clone()).await?;
        Ok(institution)
    }

    pub async fn update_institution(
        &self,
        id: &str,
        update: InstitutionUpdate,
    ) -> ServiceResult<()> {
        Ok(self.store.update_institution(id, update).await?)
    }

    pub async fn institutions(&self) -> Vec<Institution> {
        self.store.institutions().await
    }

    pub async fn add_department(&self, name: String, institution_id: String) -> ServiceResult<Department> {
        let department = Department {
            id: fresh_id("dept"),
            name,
            institution_id,
        };
        self.store.add_department(department.clone()).await?;
        Ok(department)
    }

    // --- forms ---

    /// Forms visible to the current session, recomputed on each call
    pub async fn visible_forms(&self) -> Vec<FormTemplate> {
        let session = self.store.current_user().await;
        let forms = self.store.all_forms().await;
        visibility::visible_forms(session.as_ref(), &forms)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn get_form(&self, id: &str) -> Option<FormTemplate> {
        self.store.get_form(id).await
    }

    pub async fn create_form(&self, form: FormTemplate) -> ServiceResult<FormTemplate> {
        Ok(self.store.add_form(form).await?)
    }

    /// Generate a form with AI and commit it to the current tenant. An AI
    /// failure, or a generated shape that fails validation, leaves the
    /// store untouched.
    pub async fn generate_form(&self, goal: &str) -> ServiceResult<FormTemplate> {
        let generated = self.ai.generate_form(goal).await?;

        let institution_id = self
            .store
            .current_user()
            .await
            .and_then(|u| u.institution_id)
            .unwrap_or_else(|| insightflow_rbac::DEFAULT_INSTITUTION_ID.to_string());
        let form = generated.into_template(institution_id, None);
        validate_form(&form)?;

        info!("Committing AI-generated form '{}'", form.title);
        Ok(self.store.add_form(form).await?)
    }

    // --- responses ---

    /// Public submission entry point, addressed purely by form id. No
    /// authentication; required fields must be answered.
    pub async fn submit_response(
        &self,
        form_id: &str,
        answers: HashMap<String, AnswerValue>,
    ) -> ServiceResult<FormResponse> {
        Ok(self.store.submit_response(form_id, answers).await?)
    }

    pub async fn responses_for_form(&self, form_id: &str) -> Vec<FormResponse> {
        self.store.get_responses_by_form(form_id).await
    }

    // --- analyses ---

    /// Run AI analysis over a form's responses and store the record,
    /// replacing any prior record for the form. The answer sets sent to
    /// the collaborator are capped at the configured maximum (most recent
    /// first; the in-memory collection is already newest-first).
    pub async fn analyze_form(&self, form_id: &str) -> ServiceResult<AnalysisRecord> {
        let form = self
            .store
            .get_form(form_id)
            .await
            .ok_or_else(|| StorageError::FormNotFound {
                id: form_id.to_string(),
            })?;

        let answers: Vec<HashMap<String, AnswerValue>> = self
            .store
            .get_responses_by_form(form_id)
            .await
            .into_iter()
            .take(self.config.ai.max_context_responses)
            .map(|r| r.answers)
            .collect();

        let result = self.ai.analyze_feedback(&form, &answers).await?;
        let record = AnalysisRecord {
            form_id: form_id.to_string(),
            result,
            generated_at: now_iso(),
        };
        self.store.add_analysis(record.clone()).await?;
        Ok(record)
    }

    pub async fn analysis_for_form(&self, form_id: &str) -> Option<AnalysisRecord> {
        self.store.get_analysis_by_form(form_id).await
    }

    // --- export ---

    /// CSV projection of a form's responses (one row per response, one
    /// column per field in form order, plus the submission timestamp)
    pub async fn export_form_csv(&self, form_id: &str) -> ServiceResult<String> {
        let form = self
            .store
            .get_form(form_id)
            .await
            .ok_or_else(|| StorageError::FormNotFound {
                id: form_id.to_string(),
            })?;
        let responses = self.store.get_responses_by_form(form_id).await;
        Ok(export_responses_csv(&form, &responses)?)
    }
}
