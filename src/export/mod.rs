//! CSV and single-page report rendering.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use csv::Writer;

use crate::core::utils::ensure_dir;
use crate::currency::{format_date, format_minor_units, local_date};
use crate::domain::Expense;
use crate::errors::{ExpenseError, Result};

/// Title drawn above the report rows.
pub const REPORT_TITLE: &str = "Smart Expense Report";

pub const CSV_HEADER: [&str; 5] = ["date", "title", "amount", "category", "notes"];

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const LEFT_MARGIN: f32 = 40.0;
pub const TITLE_Y: f32 = 40.0;
pub const TITLE_GAP: f32 = 24.0;
pub const LINE_HEIGHT: f32 = 18.0;
/// Rows placed below this baseline are dropped.
pub const LAST_BASELINE: f32 = 800.0;

/// Renders one CSV row per expense, in the order given.
pub fn expenses_csv(expenses: &[Expense], zone: Tz) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for expense in expenses {
        let notes = expense.notes.as_deref().map(strip_commas).unwrap_or_default();
        writer.write_record([
            format_date(local_date(expense.timestamp, zone)),
            strip_commas(&expense.title),
            format_minor_units(expense.amount_minor),
            expense.category.to_string(),
            notes,
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ExpenseError::Storage(format!("csv buffer flush failed: {err}")))?;
    String::from_utf8(bytes).map_err(|err| ExpenseError::Storage(format!("csv is not utf-8: {err}")))
}

/// Writes `expenses-<millis>.csv` into `dir` and returns its path.
pub fn write_expenses_csv(
    dir: &Path,
    expenses: &[Expense],
    zone: Tz,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let body = expenses_csv(expenses, zone)?;
    let path = export_path(dir, "expenses", now, "csv")?;
    fs::write(&path, body)?;
    tracing::info!(path = %path.display(), rows = expenses.len(), "csv export written");
    Ok(path)
}

fn strip_commas(text: &str) -> String {
    text.replace(',', ";")
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// A fixed A4-sized page: a title and as many rows as fit. No pagination.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub width: f32,
    pub height: f32,
    pub lines: Vec<PlacedLine>,
    pub dropped: usize,
}

impl ReportDocument {
    pub fn layout(title: &str, rows: &[String]) -> Self {
        let mut lines = vec![PlacedLine {
            x: LEFT_MARGIN,
            y: TITLE_Y,
            text: title.to_string(),
        }];
        let mut y = TITLE_Y + TITLE_GAP;
        let mut dropped = 0;
        for row in rows {
            if y > LAST_BASELINE {
                dropped += 1;
                continue;
            }
            lines.push(PlacedLine {
                x: LEFT_MARGIN,
                y,
                text: row.clone(),
            });
            y += LINE_HEIGHT;
        }
        if dropped > 0 {
            tracing::debug!(dropped, "report rows did not fit on the page");
        }
        Self {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            lines,
            dropped,
        }
    }

    pub fn title(&self) -> &str {
        self.lines.first().map(|line| line.text.as_str()).unwrap_or("")
    }

    /// Placed rows, excluding the title.
    pub fn rows(&self) -> &[PlacedLine] {
        self.lines.get(1..).unwrap_or(&[])
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }

    /// Writes the rendered page as `report-<millis>.txt` into `dir`.
    pub fn write_to(&self, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
        let path = export_path(dir, "report", now, "txt")?;
        fs::write(&path, self.render_text())?;
        tracing::info!(path = %path.display(), rows = self.rows().len(), "report export written");
        Ok(path)
    }
}

fn export_path(dir: &Path, stem: &str, now: DateTime<Utc>, ext: &str) -> Result<PathBuf> {
    ensure_dir(dir)?;
    Ok(dir.join(format!("{stem}-{}.{ext}", now.timestamp_millis())))
}
