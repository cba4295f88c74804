pub mod repository;
pub mod services;
pub mod time;
pub mod utils;

pub use repository::{ExpenseRepository, Snapshot};
pub use time::{Clock, FixedClock, SystemClock};
