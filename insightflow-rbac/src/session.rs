//! Session/identity manager
//!
//! A two-state machine per context: anonymous or authenticated. Login
//! derives the user purely from its inputs; logout clears memory and the
//! persisted session snapshot. Re-login while authenticated simply
//! overwrites the session.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use insightflow_core::{User, UserRole};
use insightflow_storage::AppStore;

use crate::error::{RbacError, RbacResult};

/// Email of the distinguished platform operator account
pub const SUPER_ADMIN_EMAIL: &str = "super@insightflow.ai";

/// Tenant assigned when a login supplies none
pub const DEFAULT_INSTITUTION_ID: &str = insightflow_storage::seed::DEFAULT_INSTITUTION_ID;

/// Derive a session user from login inputs.
///
/// The distinguished super-admin email gets a deterministic id and the
/// SUPER_ADMIN role regardless of the supplied role. SUPER_ADMIN sessions
/// carry no institution; everyone else falls back to the default tenant
/// when none is supplied.
pub fn derive_user(
    email: &str,
    role: Option<UserRole>,
    institution_id: Option<String>,
    department_id: Option<String>,
) -> User {
    let is_super_email = email == SUPER_ADMIN_EMAIL;
    let role = if is_super_email {
        UserRole::SuperAdmin
    } else {
        role.unwrap_or(UserRole::InstitutionAdmin)
    };

    let id = if is_super_email {
        "u-admin".to_string()
    } else {
        format!("u-{}", Uuid::new_v4())
    };

    let name = email.split('@').next().unwrap_or(email).to_string();

    let institution_id = match role {
        UserRole::SuperAdmin => None,
        _ => Some(institution_id.unwrap_or_else(|| DEFAULT_INSTITUTION_ID.to_string())),
    };

    User {
        id,
        name,
        email: email.to_string(),
        role,
        institution_id,
        department_id,
        avatar: None,
    }
}

/// Session manager bound to one application store
pub struct SessionManager {
    store: Arc<AppStore>,
}

impl SessionManager {
    /// Create a new session manager
    pub fn new(store: Arc<AppStore>) -> Self {
        Self { store }
    }

    /// Transition anonymous -> authenticated (or overwrite the current
    /// session). No password or credential check is performed.
    pub async fn login(
        &self,
        email: &str,
        role: Option<UserRole>,
        institution_id: Option<String>,
        department_id: Option<String>,
    ) -> RbacResult<User> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(RbacError::invalid_login(format!(
                "'{}' is not an email address",
                email
            )));
        }

        let user = derive_user(email, role, institution_id, department_id);
        info!("Logging in '{}' as {}", user.email, user.role);
        self.store.set_session(user.clone()).await?;
        Ok(user)
    }

    /// Transition authenticated -> anonymous. Removing the persisted
    /// session is what propagates the logout to other contexts.
    pub async fn logout(&self) -> RbacResult<()> {
        info!("Logging out");
        self.store.clear_session().await?;
        Ok(())
    }

    /// Current session user, if authenticated
    pub async fn current_user(&self) -> Option<User> {
        self.store.current_user().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insightflow_storage::DurableStore;

    fn manager() -> (tempfile::TempDir, SessionManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(AppStore::open(DurableStore::open(dir.path()).unwrap()));
        (dir, SessionManager::new(store))
    }

    #[test]
    fn test_super_admin_email_wins_over_supplied_role() {
        let user = derive_user(
            SUPER_ADMIN_EMAIL,
            Some(UserRole::DeptAdmin),
            Some("inst-2".to_string()),
            None,
        );
        assert_eq!(user.role, UserRole::SuperAdmin);
        assert_eq!(user.id, "u-admin");
        assert!(user.institution_id.is_none());
    }

    #[test]
    fn test_default_role_and_tenant() {
        let user = derive_user("alice@example.com", None, None, None);
        assert_eq!(user.role, UserRole::InstitutionAdmin);
        assert_eq!(user.institution_id.as_deref(), Some(DEFAULT_INSTITUTION_ID));
        assert_eq!(user.name, "alice");
        assert!(user.department_id.is_none());
    }

    #[test]
    fn test_dept_admin_keeps_department() {
        let user = derive_user(
            "bob@example.com",
            Some(UserRole::DeptAdmin),
            Some("inst-1".to_string()),
            Some("dept-7".to_string()),
        );
        assert_eq!(user.role, UserRole::DeptAdmin);
        assert_eq!(user.department_id.as_deref(), Some("dept-7"));
    }

    #[test]
    fn test_fresh_ids_differ_between_logins() {
        let a = derive_user("alice@example.com", None, None, None);
        let b = derive_user("alice@example.com", None, None, None);
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_login_logout_state_machine() {
        let (_dir, manager) = manager();
        assert!(manager.current_user().await.is_none());

        let user = manager
            .login("carol@example.com", None, Some("inst-1".to_string()), None)
            .await
            .unwrap();
        assert_eq!(manager.current_user().await.unwrap().id, user.id);

        // re-login overwrites
        let other = manager
            .login("dave@example.com", None, None, None)
            .await
            .unwrap();
        assert_eq!(manager.current_user().await.unwrap().id, other.id);

        manager.logout().await.unwrap();
        assert!(manager.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_login_rejects_non_email() {
        let (_dir, manager) = manager();
        assert!(manager.login("", None, None, None).await.is_err());
        assert!(manager.login("not-an-email", None, None, None).await.is_err());
        assert!(manager.current_user().await.is_none());
    }
}
