use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use expense_core::core::services::{ReportService, SeedService};
use expense_core::domain::{Expense, GroupBy};

fn year_of_demo_data() -> Vec<Expense> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap_or_default();
    (0..52)
        .flat_map(|week| SeedService::demo_expenses(start + Duration::weeks(week)))
        .collect()
}

fn bench_reports(c: &mut Criterion) {
    let expenses = year_of_demo_data();
    let reference = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default();
    let zone = chrono_tz::Asia::Kolkata;

    c.bench_function("weekly_report", |b| {
        b.iter(|| ReportService::weekly_report(black_box(&expenses), zone, 7, reference))
    });
    c.bench_function("group_by_category", |b| {
        b.iter(|| ReportService::group_and_sort(black_box(expenses.clone()), GroupBy::Category))
    });
}

criterion_group!(benches, bench_reports);
criterion_main!(benches);
