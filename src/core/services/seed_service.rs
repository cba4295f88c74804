//! Deterministic demo data.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::core::repository::ExpenseRepository;
use crate::domain::{Expense, ExpenseCategory};
use crate::errors::Result;

pub const SEED_DAYS: i64 = 7;

const MIN_SEED_AMOUNT: i64 = 1_000;
const SEED_AMOUNT_SPAN: i64 = 14_001;

pub struct SeedService;

impl SeedService {
    /// Builds between two and four synced expenses for each of the last seven days,
    /// ending at `today`. Amounts fall between ₹10.00 and ₹150.00.
    pub fn demo_expenses(today: NaiveDate) -> Vec<Expense> {
        let mut expenses = Vec::new();
        let mut counter = 0usize;
        for day in 0..SEED_DAYS {
            let date = today - Duration::days(day);
            let count = 2 + counter % 3;
            counter += 1;
            for idx in 0..count {
                let category = ExpenseCategory::ALL[(idx + day as usize) % ExpenseCategory::ALL.len()];
                let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
                let timestamp = start + Duration::hours(idx as i64);
                expenses.push(
                    Expense::new(
                        format!("{category} Expense {}", idx + 1),
                        Self::amount_for(day, idx as i64),
                        category,
                        timestamp,
                    )
                    .with_id(format!("seed-{day}-{idx}"))
                    .synced(),
                );
            }
        }
        expenses
    }

    /// Upserts the demo set. Seeding twice on the same day replaces rather than duplicates.
    pub async fn seed(repository: &ExpenseRepository, today: NaiveDate) -> Result<Vec<Expense>> {
        let expenses = Self::demo_expenses(today);
        tracing::info!(count = expenses.len(), %today, "seeding demo expenses");
        repository.upsert_all(expenses.clone()).await?;
        Ok(expenses)
    }

    fn amount_for(day: i64, idx: i64) -> i64 {
        MIN_SEED_AMOUNT + (day * 3_701 + idx * 5_303 + 417) % SEED_AMOUNT_SPAN
    }
}
