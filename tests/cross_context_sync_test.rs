//! Cross-context reconciliation: two stores over one data directory,
//! with the watcher pulling one context's writes into the other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use insightflow_config::SyncConfig;
use insightflow_core::{AnswerValue, UserRole};
use insightflow_storage::{AppStore, DurableStore, StoreKey};
use insightflow_sync::StoreWatcher;

fn open_context(dir: &std::path::Path) -> Arc<AppStore> {
    Arc::new(AppStore::open(DurableStore::open(dir).unwrap()))
}

fn watcher_for(store: Arc<AppStore>) -> StoreWatcher {
    StoreWatcher::new(
        store,
        SyncConfig {
            enabled: true,
            debounce_ms: 25,
        },
    )
}

/// Poll until `check` passes or two seconds elapse
async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..40 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_foreign_submission_appears_in_watching_context() {
    let dir = tempfile::tempdir().unwrap();
    let watching = open_context(dir.path());
    let other = open_context(dir.path());

    let mut watcher = watcher_for(watching.clone());
    watcher.start().unwrap();

    // the other context accepts a public submission against the seed form
    let mut answers = HashMap::new();
    answers.insert("cleanliness".to_string(), AnswerValue::Number(5.0));
    answers.insert("staff".to_string(), AnswerValue::Number(4.0));
    answers.insert("checkin".to_string(), AnswerValue::Number(5.0));
    let submitted = other.submit_response("form-1", answers).await.unwrap();

    let applied = eventually(|| {
        let watching = watching.clone();
        let id = submitted.id.clone();
        async move { watching.responses().await.iter().any(|r| r.id == id) }
    })
    .await;
    watcher.stop().await;
    assert!(applied, "submission never reached the watching context");
}

#[tokio::test]
async fn test_logout_in_one_context_logs_out_the_other() {
    let dir = tempfile::tempdir().unwrap();
    let watching = open_context(dir.path());

    // authenticated before the watcher starts
    watching
        .set_session(insightflow_core::User {
            id: "u-1".to_string(),
            name: "manager".to_string(),
            email: "manager@azure.com".to_string(),
            role: UserRole::InstitutionAdmin,
            institution_id: Some("inst-1".to_string()),
            department_id: None,
            avatar: None,
        })
        .await
        .unwrap();

    let mut watcher = watcher_for(watching.clone());
    watcher.start().unwrap();

    // the other context removes the shared session snapshot
    let other = DurableStore::open(dir.path()).unwrap();
    other.remove(StoreKey::Session).unwrap();

    let logged_out = eventually(|| {
        let watching = watching.clone();
        async move { watching.current_user().await.is_none() }
    })
    .await;
    watcher.stop().await;
    assert!(logged_out, "session removal was never propagated");
}

#[tokio::test]
async fn test_foreign_login_leaves_local_session_alone() {
    let dir = tempfile::tempdir().unwrap();
    let watching = open_context(dir.path());

    watching
        .set_session(insightflow_core::User {
            id: "u-local".to_string(),
            name: "local".to_string(),
            email: "local@azure.com".to_string(),
            role: UserRole::InstitutionAdmin,
            institution_id: Some("inst-1".to_string()),
            department_id: None,
            avatar: None,
        })
        .await
        .unwrap();

    let mut watcher = watcher_for(watching.clone());
    watcher.start().unwrap();

    // another context logs in as someone else
    let other = DurableStore::open(dir.path()).unwrap();
    other
        .save(
            StoreKey::Session,
            &insightflow_core::User {
                id: "u-foreign".to_string(),
                name: "foreign".to_string(),
                email: "foreign@azure.com".to_string(),
                role: UserRole::SuperAdmin,
                institution_id: None,
                department_id: None,
                avatar: None,
            },
        )
        .unwrap();

    // give the debounce window time to fire, then confirm the local
    // identity was not replaced
    tokio::time::sleep(Duration::from_millis(300)).await;
    watcher.stop().await;
    assert_eq!(watching.current_user().await.unwrap().id, "u-local");
}

#[tokio::test]
async fn test_last_writer_wins_across_contexts() {
    let dir = tempfile::tempdir().unwrap();
    let watching = open_context(dir.path());
    let other = open_context(dir.path());

    let mut watcher = watcher_for(watching.clone());
    watcher.start().unwrap();

    // two analysis writes for the seed form; the second must be the one
    // the watching context ends up with
    let record = |summary: &str| insightflow_core::AnalysisRecord {
        form_id: "form-1".to_string(),
        generated_at: insightflow_core::now_iso(),
        result: insightflow_core::AiAnalysisResult {
            summary: summary.to_string(),
            sentiment_score: 60.0,
            sentiment_trend: insightflow_core::SentimentTrend::Neutral,
            key_themes: vec![],
            recommendations: vec![],
        },
    };
    other.add_analysis(record("first")).await.unwrap();
    other.add_analysis(record("winning")).await.unwrap();

    let applied = eventually(|| {
        let watching = watching.clone();
        async move {
            watching
                .get_analysis_by_form("form-1")
                .await
                .map(|a| a.result.summary == "winning")
                .unwrap_or(false)
        }
    })
    .await;
    watcher.stop().await;
    assert!(applied, "latest analysis snapshot was not reconciled");
}
