//! Integration tests for the login flow and profile resolution.

mod helpers;

use insight_auth::context::ClientContext;
use insight_auth::session::SessionHandle;
use insight_core::error::ErrorKind;

use helpers::{Harness, grants, group, membership, report, role};

fn client() -> ClientContext {
    ClientContext::new("203.0.113.7", "portal-tests/1.0")
}

#[tokio::test]
async fn test_login_success_resolves_profile() {
    let h = Harness::new();
    let sales = report("sales", "Sales");
    h.add_user(
        "alice",
        "correct horse",
        vec![grants(role("viewer", &[("reports", &["read"])]), vec![(true, sales)])],
    )
    .await;

    let mut handle = SessionHandle::new();
    let result = h
        .manager
        .login(&mut handle, "alice", "correct horse", &client())
        .await
        .unwrap();

    assert_eq!(result.profile.username, "alice");
    assert_eq!(result.profile.roles, vec!["viewer"]);
    assert!(result.profile.permits("reports", "read"));
    assert!(result.profile.can_view_report("sales"));
}

#[tokio::test]
async fn test_login_persists_session_row() {
    let h = Harness::new();
    let id = h.add_user("alice", "pw-alice", vec![]).await;

    let mut handle = SessionHandle::new();
    h.manager
        .login(&mut handle, "alice", "pw-alice", &client())
        .await
        .unwrap();

    let row = h.backend.get(&handle.token).await.unwrap();
    assert!(row.active);
    assert_eq!(row.account_id, Some(id));
    assert_eq!(row.data["username"], "alice");
    assert_eq!(row.client_ip.as_deref(), Some("203.0.113.7"));
}

#[tokio::test]
async fn test_login_rotates_session_token() {
    let h = Harness::new();
    h.add_user("alice", "pw-alice", vec![]).await;

    let mut handle = SessionHandle::new();
    let pre_login_token = handle.token.clone();
    h.manager
        .login(&mut handle, "alice", "pw-alice", &client())
        .await
        .unwrap();

    assert_ne!(handle.token, pre_login_token);
    assert!(h.backend.get(&pre_login_token).await.is_none());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let h = Harness::new();
    let id = h.add_user("alice", "pw-alice", vec![]).await;

    let mut handle = SessionHandle::new();
    let err = h
        .manager
        .login(&mut handle, "alice", "wrong", &client())
        .await
        .unwrap_err();

    assert!(err.is_kind(ErrorKind::InvalidCredentials));
    assert_eq!(h.directory.recorded_failures().await, vec![id]);
    assert!(h.directory.recorded_successes().await.is_empty());

    // The failure lands in the audit log with the account attached.
    let entries = h.audit.entries().await;
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].success);
    assert_eq!(entries[0].action, "login");
    assert_eq!(entries[0].account_id, Some(id));
    assert_eq!(entries[0].error.as_deref(), Some("invalid password"));
}

#[tokio::test]
async fn test_login_unknown_user() {
    let h = Harness::new();

    let mut handle = SessionHandle::new();
    let err = h
        .manager
        .login(&mut handle, "nobody", "pw", &client())
        .await
        .unwrap_err();

    assert!(err.is_kind(ErrorKind::InvalidCredentials));
}

#[tokio::test]
async fn test_login_inactive_user() {
    let h = Harness::new();
    h.add_user_graph("bob", "pw-bob", false, vec![], vec![]).await;

    let mut handle = SessionHandle::new();
    let err = h
        .manager
        .login(&mut handle, "bob", "pw-bob", &client())
        .await
        .unwrap_err();

    // Same error as a wrong password; the audit log keeps the reason.
    assert!(err.is_kind(ErrorKind::InvalidCredentials));
    let entries = h.audit.entries().await;
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].success);
    assert_eq!(entries[0].error.as_deref(), Some("inactive or missing user"));
}

#[tokio::test]
async fn test_login_records_success_and_audit() {
    let h = Harness::new();
    let id = h.add_user("alice", "pw-alice", vec![]).await;

    let mut handle = SessionHandle::new();
    h.manager
        .login(&mut handle, "alice", "pw-alice", &client())
        .await
        .unwrap();

    assert_eq!(h.directory.recorded_successes().await, vec![id]);
    let entries = h.audit.entries().await;
    assert_eq!(entries.len(), 1);
    assert!(entries[0].success);
    assert_eq!(entries[0].action, "login");
    assert_eq!(entries[0].username.as_deref(), Some("alice"));
    assert_eq!(entries[0].client_ip.as_deref(), Some("203.0.113.7"));
}

#[tokio::test]
async fn test_group_conferred_roles_reach_profile() {
    let h = Harness::new();
    let ops = report("ops", "Operations");
    h.add_user_graph(
        "alice",
        "pw-alice",
        true,
        vec![],
        vec![membership(
            group("analysts"),
            vec![grants(
                role("analyst", &[("reports", &["read", "export"])]),
                vec![(true, ops)],
            )],
        )],
    )
    .await;

    let mut handle = SessionHandle::new();
    let result = h
        .manager
        .login(&mut handle, "alice", "pw-alice", &client())
        .await
        .unwrap();

    assert_eq!(result.profile.groups, vec!["analysts"]);
    assert_eq!(result.profile.roles, vec!["analyst"]);
    assert!(result.profile.permits("reports", "export"));
    assert!(result.profile.can_view_report("ops"));
}

#[tokio::test]
async fn test_all_reports_capability_sees_whole_catalog() {
    let h = Harness::new();
    h.directory.add_report(report("sales", "Sales")).await;
    h.directory.add_report(report("ops", "Operations")).await;
    let mut inactive = report("legacy", "Legacy");
    inactive.active = false;
    h.directory.add_report(inactive).await;

    let mut admin = role("admin", &[("*", &["manage"])]);
    admin.grants_all_reports = true;
    h.add_user("root", "pw-root", vec![grants(admin, vec![])]).await;

    let mut handle = SessionHandle::new();
    let result = h
        .manager
        .login(&mut handle, "root", "pw-root", &client())
        .await
        .unwrap();

    let codes: Vec<_> = result.profile.reports.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["ops", "sales"]);
    assert!(result.profile.permits("anything", "manage"));
}

#[tokio::test]
async fn test_profile_cached_in_session_survives_reload() {
    let h = Harness::new();
    let sales = report("sales", "Sales");
    h.add_user(
        "alice",
        "pw-alice",
        vec![grants(role("viewer", &[("reports", &["read"])]), vec![(true, sales)])],
    )
    .await;

    let mut handle = SessionHandle::new();
    let result = h
        .manager
        .login(&mut handle, "alice", "pw-alice", &client())
        .await
        .unwrap();

    let reopened = h
        .manager
        .open_session(Some(&handle.token), &client())
        .await
        .unwrap();
    assert!(!reopened.is_new);
    let cached = insight_auth::resolver::AuthProfile::from_session_data(
        &serde_json::Value::Object(reopened.data.clone()),
    )
    .unwrap();
    assert_eq!(cached, result.profile);
}
