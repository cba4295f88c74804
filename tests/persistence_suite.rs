mod common;

use std::fs;
use std::sync::Arc;

use common::{day, expense, local, setup_test_env};
use expense_core::{
    config::{Config, ConfigManager},
    core::{repository::ExpenseRepository, services::SeedService, utils::expenses_file_in},
    domain::ExpenseCategory,
    storage::{ExpenseStore, JsonExpenseStore},
    ExpenseError,
};

#[tokio::test]
async fn reopened_store_sees_committed_writes() {
    let env = setup_test_env();
    env.repository
        .upsert_all(vec![
            expense("a", "Dosa", 12_000, ExpenseCategory::Food, local(2024, 8, 15, 9, 0)),
            expense("b", "Metro", 4_500, ExpenseCategory::Travel, local(2024, 8, 15, 10, 0)),
        ])
        .await
        .unwrap();
    env.repository.mark_synced(vec!["a".into()]).await.unwrap();

    let reopened = JsonExpenseStore::new(expenses_file_in(&env.base)).unwrap();
    let rows = reopened.get_all().unwrap();
    assert_eq!(rows.len(), 2);
    let a = rows.iter().find(|e| e.id == "a").unwrap();
    let b = rows.iter().find(|e| e.id == "b").unwrap();
    assert!(!a.is_pending_sync);
    assert!(b.is_pending_sync);
}

#[tokio::test]
async fn upsert_replaces_by_id() {
    let env = setup_test_env();
    let at = local(2024, 8, 15, 9, 0);
    env.repository
        .add(expense("a", "Dosa", 12_000, ExpenseCategory::Food, at))
        .await
        .unwrap();
    env.repository
        .add(expense("a", "Masala dosa", 14_000, ExpenseCategory::Food, at))
        .await
        .unwrap();
    let snapshot = env.repository.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].title, "Masala dosa");
    assert_eq!(snapshot[0].amount_minor, 14_000);
}

#[tokio::test]
async fn invalid_batch_is_rejected_whole() {
    let env = setup_test_env();
    let at = local(2024, 8, 15, 9, 0);
    let err = env
        .repository
        .upsert_all(vec![
            expense("ok", "Tea", 2_000, ExpenseCategory::Food, at),
            expense("bad", "  ", 2_000, ExpenseCategory::Food, at),
        ])
        .await
        .expect_err("blank title");
    assert!(matches!(err, ExpenseError::EmptyTitle));
    assert!(env.store.get_all().unwrap().is_empty());
}

#[tokio::test]
async fn time_range_is_inclusive_and_newest_first() {
    let env = setup_test_env();
    env.repository
        .upsert_all(vec![
            expense("early", "A", 100, ExpenseCategory::Other, local(2024, 8, 15, 8, 0)),
            expense("mid", "B", 100, ExpenseCategory::Other, local(2024, 8, 15, 12, 0)),
            expense("late", "C", 100, ExpenseCategory::Other, local(2024, 8, 15, 18, 0)),
        ])
        .await
        .unwrap();
    let hits = env
        .repository
        .get_by_time_range(local(2024, 8, 15, 8, 0), local(2024, 8, 15, 12, 0))
        .unwrap();
    let ids: Vec<&str> = hits.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["mid", "early"]);
}

#[tokio::test]
async fn seed_then_clear_round_trip() {
    let env = setup_test_env();
    let seeded = SeedService::seed(&env.repository, day(2024, 8, 15)).await.unwrap();
    let stored = env.store.get_all().unwrap();
    assert_eq!(stored.len(), seeded.len());
    assert_eq!(
        stored.iter().map(|e| e.amount_minor).sum::<i64>(),
        seeded.iter().map(|e| e.amount_minor).sum::<i64>()
    );

    env.repository.clear().await.unwrap();
    assert!(env.store.get_all().unwrap().is_empty());
    assert!(env.repository.snapshot().is_empty());
}

#[test]
fn corrupt_rows_degrade_instead_of_failing() {
    let env = setup_test_env();
    fs::write(
        env.store.path(),
        r#"{"schema_version":1,"expenses":[{"id":"x","title":"Old","amount_in_paise":500,"category":"Groceries","timestamp_epoch_millis":1723708800000}]}"#,
    )
    .unwrap();
    let repository = ExpenseRepository::new(Arc::new(
        JsonExpenseStore::new(env.store.path().to_path_buf()).unwrap(),
    ))
    .unwrap();
    let snapshot = repository.snapshot();
    assert_eq!(snapshot[0].category, ExpenseCategory::Utility);
    assert!(!snapshot[0].is_pending_sync);
}

#[test]
fn truncated_file_surfaces_a_parse_error() {
    let env = setup_test_env();
    fs::write(env.store.path(), "{\"schema_version\":1,\"expe").unwrap();
    assert!(matches!(env.store.get_all(), Err(ExpenseError::Serde(_))));
}

#[test]
fn config_round_trips_through_base_dir() {
    let env = setup_test_env();
    let config = Config {
        duplicate_window_secs: 60,
        ..Config::default()
    };
    env.config.save(&config).unwrap();
    let other = ConfigManager::with_base_dir(env.base.clone()).unwrap();
    assert_eq!(other.load().unwrap().duplicate_window_secs, 60);
}
