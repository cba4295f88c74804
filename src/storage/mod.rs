pub mod json_backend;
pub mod memory;

use chrono::{DateTime, Utc};

use crate::domain::{Expense, ExpenseRecord};
use crate::errors::ExpenseError;

pub type Result<T> = std::result::Result<T, ExpenseError>;

/// Abstraction over persistence backends holding expense rows.
///
/// Every write replaces rows by id; there are no partial field updates.
pub trait ExpenseStore: Send + Sync {
    fn get_all(&self) -> Result<Vec<Expense>>;

    /// Expenses with `start <= timestamp <= end`, most recent first.
    fn get_by_time_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Expense>> {
        let mut matching: Vec<Expense> = self
            .get_all()?
            .into_iter()
            .filter(|expense| expense.timestamp >= start && expense.timestamp <= end)
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(matching)
    }

    fn upsert(&self, expense: &Expense) -> Result<()> {
        self.upsert_all(std::slice::from_ref(expense))
    }

    fn upsert_all(&self, expenses: &[Expense]) -> Result<()>;

    fn clear(&self) -> Result<()>;

    /// Clears the pending-sync flag on matching rows. Unknown ids are ignored.
    fn mark_synced(&self, ids: &[String]) -> Result<()>;
}

/// Applies replace-on-conflict semantics to a row list, keeping first-insert order.
pub(crate) fn merge_records(rows: &mut Vec<ExpenseRecord>, expenses: &[Expense]) -> Result<()> {
    for expense in expenses {
        expense.check_invariants()?;
    }
    for expense in expenses {
        let record = ExpenseRecord::from(expense);
        match rows.iter_mut().find(|row| row.id == record.id) {
            Some(existing) => *existing = record,
            None => rows.push(record),
        }
    }
    Ok(())
}

/// Returns how many rows changed.
pub(crate) fn clear_pending(rows: &mut [ExpenseRecord], ids: &[String]) -> usize {
    let mut changed = 0;
    for row in rows.iter_mut() {
        if row.is_pending_sync && ids.iter().any(|id| id == &row.id) {
            row.is_pending_sync = false;
            changed += 1;
        }
    }
    changed
}

pub use json_backend::JsonExpenseStore;
pub use memory::MemoryExpenseStore;
