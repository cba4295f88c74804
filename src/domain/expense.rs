//! The expense record and its persisted shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::{format_minor_units, MAX_AMOUNT_MINOR};
use crate::domain::{
    category::ExpenseCategory,
    common::{Amounted, Displayable, Identifiable},
};
use crate::errors::{ExpenseError, Result};

/// Notes entered on the form are cut to this many characters.
pub const NOTES_MAX_CHARS: usize = 100;

/// A single immutable expense entry. Money is held in paise, never as a float.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount_minor: i64,
    pub category: ExpenseCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_uri: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub is_pending_sync: bool,
}

impl Expense {
    /// Creates a pending-sync expense with a fresh identifier.
    pub fn new(
        title: impl Into<String>,
        amount_minor: i64,
        category: ExpenseCategory,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            amount_minor,
            category,
            notes: None,
            receipt_uri: None,
            timestamp,
            is_pending_sync: true,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_receipt(mut self, receipt_uri: Option<String>) -> Self {
        self.receipt_uri = receipt_uri;
        self
    }

    pub fn synced(mut self) -> Self {
        self.is_pending_sync = false;
        self
    }

    /// Rejects values that must never reach the store.
    pub fn check_invariants(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ExpenseError::EmptyTitle);
        }
        if !(1..=MAX_AMOUNT_MINOR).contains(&self.amount_minor) {
            return Err(ExpenseError::InvalidAmount);
        }
        if self.id.is_empty() {
            return Err(ExpenseError::Storage("expense id cannot be empty".into()));
        }
        Ok(())
    }
}

impl Identifiable for Expense {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Expense {
    fn amount_minor(&self) -> i64 {
        self.amount_minor
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!(
            "{} · {} ({})",
            self.title,
            format_minor_units(self.amount_minor),
            self.category
        )
    }
}

/// Row shape written by the stores. The category is kept as free text so a
/// corrupt or retired value still loads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub id: String,
    pub title: String,
    pub amount_in_paise: i64,
    pub category: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub receipt_uri: Option<String>,
    pub timestamp_epoch_millis: i64,
    #[serde(default)]
    pub is_pending_sync: bool,
}

impl From<&Expense> for ExpenseRecord {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id.clone(),
            title: expense.title.clone(),
            amount_in_paise: expense.amount_minor,
            category: expense.category.as_str().to_string(),
            notes: expense.notes.clone(),
            receipt_uri: expense.receipt_uri.clone(),
            timestamp_epoch_millis: expense.timestamp.timestamp_millis(),
            is_pending_sync: expense.is_pending_sync,
        }
    }
}

impl From<ExpenseRecord> for Expense {
    fn from(record: ExpenseRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            amount_minor: record.amount_in_paise,
            category: ExpenseCategory::resolve(&record.category),
            notes: record.notes,
            receipt_uri: record.receipt_uri,
            timestamp: DateTime::from_timestamp_millis(record.timestamp_epoch_millis)
                .unwrap_or_default(),
            is_pending_sync: record.is_pending_sync,
        }
    }
}

/// Cuts `notes` to [`NOTES_MAX_CHARS`] characters (not bytes).
pub fn truncate_notes(notes: &str) -> String {
    notes.chars().take(NOTES_MAX_CHARS).collect()
}
