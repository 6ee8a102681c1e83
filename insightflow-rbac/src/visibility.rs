//! Role- and tenant-scoped form visibility
//!
//! Pure function over (current session, full form collection). Not cached:
//! session and forms change independently, so callers recompute on every
//! access.

use insightflow_core::{FormTemplate, User, UserRole};

/// Whether one form is visible to the given session.
///
/// Rules evaluated in order, first match wins:
/// 1. No session -> nothing is visible
/// 2. SUPER_ADMIN -> every form across every tenant
/// 3. Institution mismatch -> excluded
/// 4. DEPT_ADMIN sees department-scoped forms only for their own
///    department; institution-wide forms stay visible
pub fn is_visible(session: Option<&User>, form: &FormTemplate) -> bool {
    let user = match session {
        Some(user) => user,
        None => return false,
    };

    if user.role == UserRole::SuperAdmin {
        return true;
    }

    if Some(form.institution_id.as_str()) != user.institution_id.as_deref() {
        return false;
    }

    if user.role == UserRole::DeptAdmin {
        if let Some(form_dept) = form.department_id.as_deref().filter(|d| !d.is_empty()) {
            return Some(form_dept) == user.department_id.as_deref();
        }
    }

    true
}

/// The form list exposed to dashboards for the given session
pub fn visible_forms<'a>(
    session: Option<&User>,
    forms: &'a [FormTemplate],
) -> Vec<&'a FormTemplate> {
    forms.iter().filter(|f| is_visible(session, f)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole, institution: Option<&str>, department: Option<&str>) -> User {
        User {
            id: "u-1".to_string(),
            name: "test".to_string(),
            email: "test@example.com".to_string(),
            role,
            institution_id: institution.map(String::from),
            department_id: department.map(String::from),
            avatar: None,
        }
    }

    fn form(id: &str, institution: &str, department: Option<&str>) -> FormTemplate {
        FormTemplate {
            id: id.to_string(),
            institution_id: institution.to_string(),
            department_id: department.map(String::from),
            title: id.to_string(),
            description: String::new(),
            industry: "Education".to_string(),
            fields: vec![],
            created_at: insightflow_core::now_iso(),
        }
    }

    fn all_forms() -> Vec<FormTemplate> {
        vec![
            form("inst1-wide", "inst-1", None),
            form("inst1-dept-a", "inst-1", Some("dept-a")),
            form("inst1-dept-b", "inst-1", Some("dept-b")),
            form("inst2-wide", "inst-2", None),
        ]
    }

    fn ids(result: Vec<&FormTemplate>) -> Vec<&str> {
        result.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn test_no_session_sees_nothing() {
        assert!(visible_forms(None, &all_forms()).is_empty());
    }

    #[test]
    fn test_super_admin_sees_every_tenant() {
        let admin = user(UserRole::SuperAdmin, None, None);
        assert_eq!(visible_forms(Some(&admin), &all_forms()).len(), 4);
    }

    #[test]
    fn test_institution_admin_is_tenant_scoped() {
        let admin = user(UserRole::InstitutionAdmin, Some("inst-1"), None);
        let forms = all_forms();
        let visible = visible_forms(Some(&admin), &forms);
        assert_eq!(
            ids(visible),
            vec!["inst1-wide", "inst1-dept-a", "inst1-dept-b"]
        );
    }

    #[test]
    fn test_dept_admin_sees_own_department_and_institution_wide() {
        let admin = user(UserRole::DeptAdmin, Some("inst-1"), Some("dept-a"));
        let forms = all_forms();
        let visible = visible_forms(Some(&admin), &forms);
        assert_eq!(ids(visible), vec!["inst1-wide", "inst1-dept-a"]);
    }

    #[test]
    fn test_dept_admin_never_sees_other_departments() {
        let admin = user(UserRole::DeptAdmin, Some("inst-1"), Some("dept-a"));
        let forms = all_forms();
        for f in visible_forms(Some(&admin), &forms) {
            assert_ne!(f.id, "inst1-dept-b");
        }
    }

    #[test]
    fn test_empty_department_id_counts_as_institution_wide() {
        let admin = user(UserRole::DeptAdmin, Some("inst-1"), Some("dept-a"));
        let f = form("weird", "inst-1", Some(""));
        assert!(is_visible(Some(&admin), &f));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let admin = user(UserRole::InstitutionAdmin, Some("inst-1"), None);
        let forms = all_forms();
        let first = ids(visible_forms(Some(&admin), &forms));
        let second = ids(visible_forms(Some(&admin), &forms));
        assert_eq!(first, second);
    }
}
