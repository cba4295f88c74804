#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::{Asia::Kolkata, Tz};
use expense_core::{
    config::ConfigManager,
    core::{repository::ExpenseRepository, utils::expenses_file_in},
    domain::{Expense, ExpenseCategory},
    storage::JsonExpenseStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const ZONE: Tz = Kolkata;

pub struct TestEnv {
    pub base: PathBuf,
    pub store: Arc<JsonExpenseStore>,
    pub repository: Arc<ExpenseRepository>,
    pub config: ConfigManager,
}

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// JSON-backed repository and config manager rooted in a fresh directory.
pub fn setup_test_env() -> TestEnv {
    let base = temp_base();
    let store = Arc::new(
        JsonExpenseStore::new(expenses_file_in(&base)).expect("create json expense store"),
    );
    let repository = Arc::new(
        ExpenseRepository::new(store.clone()).expect("open repository over json store"),
    );
    let config = ConfigManager::with_base_dir(base.clone()).expect("create config manager");
    TestEnv {
        base,
        store,
        repository,
        config,
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Instant at local wall-clock time in Kolkata.
pub fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    ZONE.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("unambiguous local time")
        .with_timezone(&Utc)
}

pub fn expense(id: &str, title: &str, amount: i64, category: ExpenseCategory, at: DateTime<Utc>) -> Expense {
    Expense::new(title, amount, category, at).with_id(id)
}
