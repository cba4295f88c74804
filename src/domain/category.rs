//! Fixed set of expense categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Categorises expenses for grouping and reporting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpenseCategory {
    Food,
    Travel,
    Utility,
    Shopping,
    Entertainment,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Food,
        ExpenseCategory::Travel,
        ExpenseCategory::Utility,
        ExpenseCategory::Shopping,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Utility => "Utility",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Other => "Other",
        }
    }

    /// Resolves a persisted name, degrading unknown values to the default category.
    pub fn resolve(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl Default for ExpenseCategory {
    fn default() -> Self {
        ExpenseCategory::Utility
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category `{}`", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for ExpenseCategory {
    type Err = UnknownCategory;

    /// Exact match on the variant name, as written by the store.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ExpenseCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| UnknownCategory(value.to_string()))
    }
}
