//! Filtering, grouping and windowed aggregation over in-memory expenses.
//!
//! All functions are pure: they read the slice they are given and allocate
//! their output. Sums are `i64` additions of paise; each amount is capped at
//! [`MAX_AMOUNT_MINOR`], and a sum that would still overflow saturates.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::currency::{format_minor_units, local_date, MAX_AMOUNT_MINOR};
use crate::domain::{Amounted, CategoryTotals, DailyTotal, Expense, GroupBy};

/// Trailing report window in calendar days.
pub const DEFAULT_REPORT_WINDOW_DAYS: u32 = 7;
/// Longest window the CLI and config accept.
pub const MAX_REPORT_WINDOW_DAYS: u32 = 366;

fn sum_minor(amounts: impl IntoIterator<Item = i64>) -> i64 {
    amounts.into_iter().fold(0i64, i64::saturating_add)
}

/// The list screen's derived state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub selected_date: Option<NaiveDate>,
    pub group_by: GroupBy,
    pub items: Vec<Expense>,
    pub total_count: usize,
    pub total_minor: i64,
}

/// Daily and per-category totals over a trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeeklyReport {
    pub window_days: u32,
    pub reference_date: NaiveDate,
    pub daily: Vec<DailyTotal>,
    pub categories: CategoryTotals,
    pub total_minor: i64,
}

impl WeeklyReport {
    pub fn heading(&self) -> String {
        format!("{}-Day Report", self.window_days)
    }

    /// Text rows used by the document export: heading, blank line, one row per category.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![self.heading(), String::new()];
        lines.extend(self.categories.iter().map(|(category, total)| {
            format!("{}: {}", category, format_minor_units(*total))
        }));
        lines
    }
}

/// One bar of the daily chart, scaled against the tallest day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: String,
    pub fraction: f64,
}

pub struct ReportService;

impl ReportService {
    /// `None` keeps every expense; otherwise only those dated `date` in `zone`.
    pub fn filter_by_date(expenses: &[Expense], date: Option<NaiveDate>, zone: Tz) -> Vec<Expense> {
        match date {
            None => expenses.to_vec(),
            Some(day) => expenses
                .iter()
                .filter(|expense| local_date(expense.timestamp, zone) == day)
                .cloned()
                .collect(),
        }
    }

    pub fn group_and_sort(mut expenses: Vec<Expense>, group_by: GroupBy) -> Vec<Expense> {
        match group_by {
            GroupBy::Time => expenses.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            GroupBy::Category => expenses.sort_by(|a, b| {
                a.category
                    .as_str()
                    .cmp(b.category.as_str())
                    .then_with(|| b.timestamp.cmp(&a.timestamp))
            }),
        }
        expenses
    }

    /// `(count, sum)` of the given items.
    pub fn totals<T: Amounted>(items: &[T]) -> (usize, i64) {
        (items.len(), sum_minor(items.iter().map(Amounted::amount_minor)))
    }

    /// First day of a window of `window_days` ending at `reference` inclusive,
    /// clamped to the earliest representable date.
    pub fn window_start(reference: NaiveDate, window_days: u32) -> NaiveDate {
        reference
            .checked_sub_days(Days::new(u64::from(window_days.saturating_sub(1))))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Exactly `window_days` entries, oldest first, zero for days without expenses.
    /// Fewer when the window would reach before the earliest representable date.
    pub fn daily_totals(
        expenses: &[Expense],
        zone: Tz,
        window_days: u32,
        reference: NaiveDate,
    ) -> Vec<DailyTotal> {
        if window_days == 0 {
            return Vec::new();
        }
        let start = Self::window_start(reference, window_days);
        let mut per_day: HashMap<NaiveDate, i64> = HashMap::new();
        for expense in expenses {
            let day = local_date(expense.timestamp, zone);
            if day >= start && day <= reference {
                let total = per_day.entry(day).or_default();
                *total = total.saturating_add(expense.amount_minor);
            }
        }
        start
            .iter_days()
            .take_while(|date| *date <= reference)
            .map(|date| DailyTotal {
                date,
                total_minor: per_day.get(&date).copied().unwrap_or(0),
            })
            .collect()
    }

    /// Per-category sums over the same window as [`ReportService::daily_totals`].
    pub fn category_totals(
        expenses: &[Expense],
        zone: Tz,
        window_days: u32,
        reference: NaiveDate,
    ) -> CategoryTotals {
        let mut totals = CategoryTotals::new();
        if window_days == 0 {
            return totals;
        }
        let start = Self::window_start(reference, window_days);
        for expense in expenses {
            let day = local_date(expense.timestamp, zone);
            if day >= start && day <= reference {
                let total = totals.entry(expense.category).or_default();
                *total = total.saturating_add(expense.amount_minor);
            }
        }
        totals
    }

    /// Sum for a single local day.
    pub fn day_total(expenses: &[Expense], zone: Tz, day: NaiveDate) -> i64 {
        sum_minor(
            expenses
                .iter()
                .filter(|expense| local_date(expense.timestamp, zone) == day)
                .map(|expense| expense.amount_minor),
        )
    }

    pub fn list_view(
        expenses: &[Expense],
        selected_date: Option<NaiveDate>,
        group_by: GroupBy,
        zone: Tz,
    ) -> ListView {
        let filtered = Self::filter_by_date(expenses, selected_date, zone);
        let (total_count, total_minor) = Self::totals(&filtered);
        ListView {
            selected_date,
            group_by,
            items: Self::group_and_sort(filtered, group_by),
            total_count,
            total_minor,
        }
    }

    pub fn weekly_report(
        expenses: &[Expense],
        zone: Tz,
        window_days: u32,
        reference: NaiveDate,
    ) -> WeeklyReport {
        let daily = Self::daily_totals(expenses, zone, window_days, reference);
        let categories = Self::category_totals(expenses, zone, window_days, reference);
        let (_, total_minor) = Self::totals(&daily);
        WeeklyReport {
            window_days,
            reference_date: reference,
            daily,
            categories,
            total_minor,
        }
    }

    /// Bars labelled with the weekday abbreviation; an all-zero week yields zero-height bars.
    pub fn chart_bars(daily: &[DailyTotal]) -> Vec<ChartBar> {
        let max = daily
            .iter()
            .map(|day| day.total_minor)
            .max()
            .unwrap_or(0)
            .max(1);
        daily
            .iter()
            .map(|day| ChartBar {
                label: day.date.weekday().to_string().to_uppercase(),
                fraction: day.total_minor as f64 / max as f64,
            })
            .collect()
    }
}
