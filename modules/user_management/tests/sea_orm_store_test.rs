//! The service-level guarantees hold against SQLite as well.

mod common;

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use common::new_user;
use user_management::config::UserManagementConfig;
use user_management::contract::model::{LogAction, NewLog, User};
use user_management::domain::{ErrorKind, LogService, RecordStore, StoreError, UserService};
use user_management::infra::seed;
use user_management::infra::SeaOrmStore;
use user_management::UserManagement;

async fn fresh_store() -> Arc<SeaOrmStore> {
    let store = SeaOrmStore::connect("sqlite::memory:", None).await.unwrap();
    store.migrate().await.unwrap();
    Arc::new(store)
}

#[tokio::test]
async fn crud_round_trip_through_services() {
    let store = fresh_store().await;
    let users = UserService::new(store.clone());

    let ann = users
        .add_user(new_user("Ann", "Lee", "ann@example.com"))
        .await
        .unwrap();
    assert_eq!(users.filter_by_id(ann.id).await.unwrap(), Some(ann.clone()));

    let mut changed = ann.clone();
    changed.surname = "Leigh".into();
    changed.is_active = false;
    users.update_user(changed.clone()).await.unwrap();
    assert_eq!(users.filter_by_id(ann.id).await.unwrap(), Some(changed));

    assert!(users.delete_user(ann.id).await.unwrap());
    assert!(users.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn unique_index_rejects_duplicate_email_at_store_level() {
    let store = fresh_store().await;
    let users: Arc<dyn RecordStore<User>> = store;

    let first = new_user("Ann", "Lee", "same@example.com");
    let record = User {
        id: 0,
        forename: first.forename,
        surname: first.surname,
        email: first.email,
        is_active: first.is_active,
        date_of_birth: first.date_of_birth,
    };
    users.create(record.clone()).await.unwrap();

    let err = users.create(record).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::UniqueViolation { kind: "User", field: "email" }
    ));
}

#[tokio::test]
async fn duplicate_email_through_service() {
    let store = fresh_store().await;
    let users = UserService::new(store);
    users
        .add_user(new_user("Ann", "Lee", "dup@example.com"))
        .await
        .unwrap();
    let err = users
        .add_user(new_user("Bob", "Ray", "dup@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
}

#[tokio::test]
async fn update_of_missing_row_is_not_found() {
    let store = fresh_store().await;
    let users = UserService::new(store);
    let ghost = User {
        id: 77,
        forename: "Ghost".into(),
        surname: "Writer".into(),
        email: "ghost@example.com".into(),
        is_active: true,
        date_of_birth: chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
    };
    let err = users.update_user(ghost).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn paging_and_timestamps_survive_sqlite() {
    let store = fresh_store().await;
    let logs = LogService::new(store);
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for i in 0..50 {
        logs.add_log(
            NewLog::new(1, "Admin", LogAction::Edit, format!("entry {i}"))
                .at(base + Duration::seconds(i)),
        )
        .await
        .unwrap();
    }

    let page = logs.get_paged(2, 20).await.unwrap();
    assert_eq!(page.len(), 20);
    assert_eq!(page[0].change, "entry 29");
    assert_eq!(page[19].change, "entry 10");
    assert_eq!(page[0].timestamp, base + Duration::seconds(29));
}

#[tokio::test]
async fn seeding_runs_once_and_ids_continue() {
    let store = fresh_store().await;
    store
        .seed_if_empty(seed::demo_users(), seed::demo_logs())
        .await
        .unwrap();
    store
        .seed_if_empty(seed::demo_users(), seed::demo_logs())
        .await
        .unwrap();

    let users = UserService::new(store.clone());
    let logs = LogService::new(store);
    assert_eq!(users.get_all().await.unwrap().len(), 11);
    assert_eq!(logs.filter_all_by_action("Add").await.unwrap().len(), 11);

    let created = users
        .add_user(new_user("Ann", "Lee", "ann@example.com"))
        .await
        .unwrap();
    assert_eq!(created.id, 12);
}

#[tokio::test]
async fn module_wires_seeded_database() {
    let module = UserManagement::sea_orm("sqlite::memory:", None, UserManagementConfig::default())
        .await
        .unwrap();
    assert_eq!(module.users().get_all().await.unwrap().len(), 11);
    assert_eq!(module.logs().count().await.unwrap(), 11);
}
