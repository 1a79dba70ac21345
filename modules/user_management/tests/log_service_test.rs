mod common;

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use common::{empty_services, seeded_services};
use proptest::prelude::*;
use user_management::contract::model::{Log, LogAction, NewLog};
use user_management::domain::{ErrorKind, LogService};
use user_management::infra::InMemoryStore;

/// `count` logs one second apart; the newest has the highest id.
async fn service_with_logs(count: usize) -> LogService {
    let logs = LogService::new(Arc::new(InMemoryStore::<Log>::new()));
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for i in 0..count {
        logs.add_log(
            NewLog::new(1, "Admin", LogAction::View, format!("entry {i}"))
                .at(base + Duration::seconds(i as i64)),
        )
        .await
        .unwrap();
    }
    logs
}

#[tokio::test]
async fn seeded_store_has_eleven_add_logs() {
    let (_, logs) = seeded_services();
    let adds = logs.filter_all_by_action("Add").await.unwrap();
    assert_eq!(adds.len(), 11);
    assert!(adds.iter().all(|l| l.action == "Add"));
}

#[tokio::test]
async fn action_filter_is_exact_and_newest_first() {
    let (_, logs) = empty_services();
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    for (action, offset) in [("Edit", 0), ("Edit", 10), ("edit", 20), ("Delete", 5)] {
        logs.add_log(NewLog::new(2, "Admin", action, "x").at(t0 + Duration::minutes(offset)))
            .await
            .unwrap();
    }

    let edits = logs.filter_all_by_action("Edit").await.unwrap();
    assert_eq!(edits.len(), 2);
    assert!(edits[0].timestamp > edits[1].timestamp);
}

#[tokio::test]
async fn blank_action_is_an_invalid_argument() {
    let (_, logs) = seeded_services();
    for action in ["", "   "] {
        let err = logs.filter_all_by_action(action).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}

#[tokio::test]
async fn add_log_validates_fields() {
    let (_, logs) = empty_services();

    let err = logs
        .add_log(NewLog::new(0, "Admin", LogAction::Add, "x"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "UserId is required");

    for (owner, action, change, message) in [
        ("", "Add", "x", "Owner is required"),
        ("Admin", " ", "x", "Action is required"),
        ("Admin", "Add", "", "Change is required"),
    ] {
        let err = logs
            .add_log(NewLog::new(1, owner, action, change))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(err.to_string(), message);
    }

    assert!(logs.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn logs_for_unknown_users_are_accepted() {
    let (_, logs) = empty_services();
    let log = logs
        .add_log(NewLog::new(12345, "Admin", LogAction::Delete, "User Deleted"))
        .await
        .unwrap();
    assert_eq!(logs.filter_all_by_id(log.id).await.unwrap(), Some(log));
    assert_eq!(logs.filter_all_by_user_id(12345).await.unwrap().len(), 1);
}

#[tokio::test]
async fn second_page_of_fifty_holds_ranks_21_to_40() {
    let logs = service_with_logs(50).await;

    let page = logs.get_paged(2, 20).await.unwrap();
    let changes: Vec<String> = page.into_iter().map(|l| l.change).collect();
    let expected: Vec<String> = (10..30).rev().map(|i| format!("entry {i}")).collect();
    assert_eq!(changes, expected);

    assert_eq!(logs.get_paged(3, 20).await.unwrap().len(), 10);
    assert!(logs.get_paged(4, 20).await.unwrap().is_empty());
    assert_eq!(logs.count().await.unwrap(), 50);
}

#[tokio::test]
async fn non_positive_paging_is_rejected() {
    let logs = service_with_logs(3).await;
    for (page, size) in [(0, 10), (-1, 10), (1, 0), (1, -5)] {
        let err = logs.get_paged(page, size).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{page}/{size}");
    }
}

#[tokio::test]
async fn seeded_logs_with_equal_timestamps_page_deterministically() {
    let (_, logs) = seeded_services();
    let first: Vec<i64> = logs.get_paged(1, 5).await.unwrap().iter().map(|l| l.id).collect();
    let second: Vec<i64> = logs.get_paged(2, 5).await.unwrap().iter().map(|l| l.id).collect();
    assert_eq!(first, vec![11, 10, 9, 8, 7]);
    assert_eq!(second, vec![6, 5, 4, 3, 2]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pages_are_bounded_disjoint_and_ordered(total in 0usize..60, page_size in 1i64..15) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(async {
            let logs = service_with_logs(total).await;
            let mut seen = Vec::new();
            let mut page = 1;
            loop {
                let items = logs.get_paged(page, page_size).await.unwrap();
                prop_assert!((items.len() as i64) <= page_size);
                if items.is_empty() {
                    break;
                }
                seen.extend(items);
                page += 1;
            }

            prop_assert_eq!(seen.len(), total);
            prop_assert!(seen.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
            Ok(())
        })?;
    }
}
