//! Derived, non-persisted report values.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{category::ExpenseCategory, common::Amounted};

/// Sum of expense amounts on one local calendar day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_minor: i64,
}

impl Amounted for DailyTotal {
    fn amount_minor(&self) -> i64 {
        self.total_minor
    }
}

/// Per-category sums. Categories without expenses are absent, never zero.
pub type CategoryTotals = BTreeMap<ExpenseCategory, i64>;

/// Ordering applied to an expense listing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum GroupBy {
    /// Most recent first.
    #[default]
    Time,
    /// Category name ascending, then most recent first.
    Category,
}

