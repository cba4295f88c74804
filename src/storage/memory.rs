use std::sync::RwLock;

use crate::domain::{Expense, ExpenseRecord};
use crate::errors::ExpenseError;

use super::{clear_pending, merge_records, ExpenseStore, Result};

/// Volatile store used by tests and demos.
#[derive(Debug, Default)]
pub struct MemoryExpenseStore {
    rows: RwLock<Vec<ExpenseRecord>>,
}

impl MemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds raw rows, bypassing validation, to model data already on disk.
    pub fn with_records(records: Vec<ExpenseRecord>) -> Self {
        Self {
            rows: RwLock::new(records),
        }
    }
}

fn poisoned<T>(_: T) -> ExpenseError {
    ExpenseError::Storage("expense store lock poisoned".into())
}

impl ExpenseStore for MemoryExpenseStore {
    fn get_all(&self) -> Result<Vec<Expense>> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.iter().cloned().map(Expense::from).collect())
    }

    fn upsert_all(&self, expenses: &[Expense]) -> Result<()> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        merge_records(&mut rows, expenses)
    }

    fn clear(&self) -> Result<()> {
        self.rows.write().map_err(poisoned)?.clear();
        Ok(())
    }

    fn mark_synced(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut rows = self.rows.write().map_err(poisoned)?;
        clear_pending(&mut rows, ids);
        Ok(())
    }
}
