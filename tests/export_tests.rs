mod common;

use chrono::{TimeZone, Utc};
use common::{day, expense, local, temp_base, ZONE};
use expense_core::{
    core::services::ReportService,
    domain::ExpenseCategory,
    export::{expenses_csv, write_expenses_csv, ReportDocument, REPORT_TITLE},
};

#[test]
fn csv_file_matches_rendered_rows() {
    let expenses = vec![
        expense("a", "Dinner, drinks", 345_600, ExpenseCategory::Food, local(2024, 8, 15, 21, 0))
            .with_notes(Some("team, farewell".into())),
        expense("b", "Auto", 8_000, ExpenseCategory::Travel, local(2024, 8, 14, 8, 30)),
    ];
    let dir = temp_base().join("exports");
    let now = Utc.with_ymd_and_hms(2024, 8, 15, 16, 0, 0).unwrap();
    let path = write_expenses_csv(&dir, &expenses, ZONE, now).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, expenses_csv(&expenses, ZONE).unwrap());

    let mut reader = csv::Reader::from_reader(written.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), ["date", "title", "amount", "category", "notes"]);
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "15 Aug 2024");
    assert_eq!(&rows[0][1], "Dinner; drinks");
    assert_eq!(&rows[0][2], "₹3,456.00");
    assert_eq!(&rows[0][4], "team; farewell");
    assert_eq!(&rows[1][3], "Travel");
    assert_eq!(&rows[1][4], "");
}

#[test]
fn report_document_lists_category_lines() {
    let expenses = vec![
        expense("a", "Dosa", 12_000, ExpenseCategory::Food, local(2024, 8, 15, 9, 0)),
        expense("b", "Metro", 4_500, ExpenseCategory::Travel, local(2024, 8, 13, 9, 0)),
    ];
    let report = ReportService::weekly_report(&expenses, ZONE, 7, day(2024, 8, 15));
    let document = ReportDocument::layout(REPORT_TITLE, &report.report_lines());
    assert_eq!(
        document.render_text(),
        "Smart Expense Report\n7-Day Report\n\nFood: ₹120.00\nTravel: ₹45.00\n"
    );
    assert_eq!(document.width, 595.0);
    assert_eq!(document.height, 842.0);
}
