use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{
    core::utils::{ensure_dir, expenses_file, write_json_atomic},
    domain::{Expense, ExpenseRecord},
    errors::ExpenseError,
};

use super::{clear_pending, merge_records, ExpenseStore, Result};

pub const EXPENSES_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ExpensesFile {
    schema_version: u32,
    #[serde(default)]
    expenses: Vec<ExpenseRecord>,
}

/// File-backed store keeping every row in one JSON document.
///
/// Each write stages the full document to a temporary file and renames it over
/// the previous one, so readers never see a half-written file.
pub struct JsonExpenseStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonExpenseStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Store at the default location under the application data directory.
    pub fn new_default() -> Result<Self> {
        Self::new(expenses_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<ExpensesFile> {
        if !self.path.exists() {
            return Ok(ExpensesFile {
                schema_version: EXPENSES_SCHEMA_VERSION,
                expenses: Vec::new(),
            });
        }
        let data = fs::read_to_string(&self.path)?;
        let file: ExpensesFile = serde_json::from_str(&data)?;
        if file.schema_version > EXPENSES_SCHEMA_VERSION {
            return Err(ExpenseError::Storage(format!(
                "expense file `{}` is from a newer schema version",
                self.path.display()
            )));
        }
        Ok(file)
    }

    fn write_file(&self, file: &ExpensesFile) -> Result<()> {
        let json = serde_json::to_string_pretty(file)?;
        write_json_atomic(&self.path, &json)
    }

    fn modify<F>(&self, mutator: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<ExpenseRecord>) -> Result<bool>,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| ExpenseError::Storage("expense file lock poisoned".into()))?;
        let mut file = self.read_file()?;
        if mutator(&mut file.expenses)? {
            file.schema_version = EXPENSES_SCHEMA_VERSION;
            self.write_file(&file)?;
            tracing::debug!(path = %self.path.display(), rows = file.expenses.len(), "expense file written");
        }
        Ok(())
    }
}

impl ExpenseStore for JsonExpenseStore {
    fn get_all(&self) -> Result<Vec<Expense>> {
        Ok(self
            .read_file()?
            .expenses
            .into_iter()
            .map(Expense::from)
            .collect())
    }

    fn upsert_all(&self, expenses: &[Expense]) -> Result<()> {
        if expenses.is_empty() {
            return Ok(());
        }
        self.modify(|rows| merge_records(rows, expenses).map(|_| true))
    }

    fn clear(&self) -> Result<()> {
        self.modify(|rows| {
            rows.clear();
            Ok(true)
        })
    }

    fn mark_synced(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        self.modify(|rows| Ok(clear_pending(rows, ids) > 0))
    }
}
