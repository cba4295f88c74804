#![doc(test(attr(deny(warnings))))]

//! Expense Core records personal expenses in paise, aggregates them into daily
//! and per-category reports, and exports CSV and single-page summaries.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod export;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use errors::{ExpenseError, Result};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
