pub mod category;
pub mod common;
pub mod expense;
pub mod report;

pub use category::ExpenseCategory;
pub use common::{Amounted, Displayable, Identifiable};
pub use expense::{truncate_notes, Expense, ExpenseRecord, NOTES_MAX_CHARS};
pub use report::{CategoryTotals, DailyTotal, GroupBy};

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use chrono_tz;
pub use uuid;
