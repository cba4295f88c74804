mod common;

use common::{day, expense, local, ZONE};
use expense_core::{
    core::services::{ReportService, SeedService},
    domain::{Expense, ExpenseCategory, GroupBy},
};

fn sample() -> Vec<Expense> {
    vec![
        expense("a", "Dosa", 12_000, ExpenseCategory::Food, local(2024, 8, 15, 9, 0)),
        expense("b", "Metro", 4_500, ExpenseCategory::Travel, local(2024, 8, 15, 18, 30)),
        expense("c", "Power bill", 180_000, ExpenseCategory::Utility, local(2024, 8, 12, 11, 0)),
        expense("d", "Shoes", 250_000, ExpenseCategory::Shopping, local(2024, 8, 9, 16, 0)),
        // Outside the window ending on the 15th.
        expense("e", "Concert", 300_000, ExpenseCategory::Entertainment, local(2024, 8, 8, 20, 0)),
        // After the reference date.
        expense("f", "Cab", 35_000, ExpenseCategory::Travel, local(2024, 8, 16, 0, 10)),
        // Just after local midnight: the 11th in Kolkata, still the 10th in UTC.
        expense("g", "Late snack", 9_000, ExpenseCategory::Food, local(2024, 8, 11, 0, 15)),
    ]
}

#[test]
fn daily_totals_cover_exactly_the_window() {
    let expenses = sample();
    let reference = day(2024, 8, 15);
    let daily = ReportService::daily_totals(&expenses, ZONE, 7, reference);

    assert_eq!(daily.len(), 7);
    assert_eq!(daily.first().map(|d| d.date), Some(day(2024, 8, 9)));
    assert_eq!(daily.last().map(|d| d.date), Some(reference));
    assert!(daily.windows(2).all(|pair| pair[0].date < pair[1].date));

    let by_day = |d: u32| daily.iter().find(|t| t.date == day(2024, 8, d)).map(|t| t.total_minor);
    assert_eq!(by_day(15), Some(16_500));
    assert_eq!(by_day(11), Some(9_000));
    assert_eq!(by_day(10), Some(0));

    let window_sum: i64 = daily.iter().map(|d| d.total_minor).sum();
    let direct: i64 = expenses
        .iter()
        .filter(|e| {
            let d = e.timestamp.with_timezone(&ZONE).date_naive();
            d >= day(2024, 8, 9) && d <= reference
        })
        .map(|e| e.amount_minor)
        .sum();
    assert_eq!(window_sum, direct);
}

#[test]
fn category_totals_agree_with_daily_totals() {
    let expenses = sample();
    let reference = day(2024, 8, 15);
    let daily: i64 = ReportService::daily_totals(&expenses, ZONE, 7, reference)
        .iter()
        .map(|d| d.total_minor)
        .sum();
    let categories = ReportService::category_totals(&expenses, ZONE, 7, reference);
    assert_eq!(categories.values().sum::<i64>(), daily);
    assert!(!categories.contains_key(&ExpenseCategory::Entertainment));
    assert!(!categories.contains_key(&ExpenseCategory::Other));
    assert_eq!(categories.get(&ExpenseCategory::Travel), Some(&4_500));
}

#[test]
fn zero_window_is_empty() {
    let expenses = sample();
    assert!(ReportService::daily_totals(&expenses, ZONE, 0, day(2024, 8, 15)).is_empty());
    assert!(ReportService::category_totals(&expenses, ZONE, 0, day(2024, 8, 15)).is_empty());
}

#[test]
fn category_grouping_orders_by_name_then_newest() {
    let sorted = ReportService::group_and_sort(sample(), GroupBy::Category);
    for pair in sorted.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.category.as_str() <= b.category.as_str());
        if a.category == b.category {
            assert!(a.timestamp >= b.timestamp);
        }
    }
}

#[test]
fn time_grouping_is_newest_first() {
    let sorted = ReportService::group_and_sort(sample(), GroupBy::Time);
    assert_eq!(sorted.first().map(|e| e.id.as_str()), Some("f"));
    assert!(sorted.windows(2).all(|p| p[0].timestamp >= p[1].timestamp));
}

#[test]
fn list_view_filters_and_totals_one_day() {
    let view = ReportService::list_view(&sample(), Some(day(2024, 8, 15)), GroupBy::Time, ZONE);
    assert_eq!(view.total_count, 2);
    assert_eq!(view.total_minor, 16_500);
    assert_eq!(view.items[0].id, "b");

    let all = ReportService::list_view(&sample(), None, GroupBy::Time, ZONE);
    assert_eq!(all.total_count, 7);
}

#[test]
fn seeded_week_matches_report_totals() {
    let today = day(2024, 8, 15);
    let seeded = SeedService::demo_expenses(today);
    let expected: i64 = seeded.iter().map(|e| e.amount_minor).sum();
    // Seed timestamps are midnight UTC plus a few hours, which stays on the same
    // calendar day in UTC.
    let report = ReportService::weekly_report(&seeded, chrono_tz::Tz::UTC, 7, today);
    assert_eq!(report.total_minor, expected);
    assert_eq!(report.categories.values().sum::<i64>(), expected);
    assert_eq!(report.report_lines()[0], "7-Day Report");
    assert_eq!(report.report_lines()[1], "");
}
