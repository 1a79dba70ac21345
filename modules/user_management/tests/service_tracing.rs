//! Tests to verify that the service layer emits expected tracing spans

mod common;

use common::{new_user, seeded_services};
use tracing_test::traced_test;
use user_management::contract::model::{LogAction, NewLog};

#[traced_test]
#[tokio::test]
async fn add_user_emits_spans() {
    let (users, _) = seeded_services();

    let result = users
        .add_user(new_user("Ann", "Lee", "ann@example.com"))
        .await;

    assert!(result.is_ok());
    assert!(logs_contain("user_management.users.add_user"));
    assert!(logs_contain("User added"));
}

#[traced_test]
#[tokio::test]
async fn failed_update_still_runs_inside_span() {
    let (users, _) = seeded_services();
    let mut ghost = users.filter_by_id(1).await.unwrap().unwrap();
    ghost.id = 4040;
    ghost.email = "ghost@example.com".into();

    let result = users.update_user(ghost).await;

    assert!(result.is_err());
    assert!(logs_contain("user_management.users.update_user"));
    assert!(logs_contain("user_id=4040"));
}

#[traced_test]
#[tokio::test]
async fn add_log_emits_spans() {
    let (_, logs) = seeded_services();

    let result = logs
        .add_log(NewLog::new(2, "Admin", LogAction::View, "N/A"))
        .await;

    assert!(result.is_ok());
    assert!(logs_contain("user_management.logs.add_log"));
    assert!(logs_contain("Log appended"));
}
