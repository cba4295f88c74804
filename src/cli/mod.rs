//! `expense_cli` front-end: one command per invocation over the JSON store.

pub mod args;
pub mod output;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use thiserror::Error;

use crate::config::{Config, ConfigManager, ThemeMode, ThemePreferences};
use crate::core::repository::ExpenseRepository;
use crate::core::services::{
    EntryFlow, EntryOutcome, EntryService, ReportService, SeedService, SyncOutcome, SyncService,
};
use crate::core::time::{Clock, SystemClock};
use crate::core::utils::{app_data_dir, expenses_file_in, exports_dir_in, settings_file_in};
use crate::currency::{format_date, format_minor_units, format_time, local_date, local_time};
use crate::domain::{Displayable, Expense, GroupBy};
use crate::errors::ExpenseError;
use crate::export::{write_expenses_csv, ReportDocument, REPORT_TITLE};
use crate::storage::JsonExpenseStore;
use crate::utils::build_info;

pub use args::{parse, AddArgs, Command, DateFilter, Invocation, USAGE};

const BAR_WIDTH: f64 = 24.0;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Expense(#[from] ExpenseError),
}

/// Parses `args`, runs the command and returns the process exit code.
pub async fn run_cli<I>(args: I) -> i32
where
    I: IntoIterator<Item = String>,
{
    let invocation = match parse(args) {
        Ok(invocation) => invocation,
        Err(err) => {
            output::error(&err);
            eprintln!("{USAGE}");
            return 2;
        }
    };
    output::set_plain(invocation.plain);
    match run(invocation.command).await {
        Ok(()) => 0,
        Err(CliError::Usage(message)) => {
            output::error(message);
            2
        }
        Err(CliError::Expense(err)) => {
            tracing::debug!(error = %err, "command failed");
            output::error(err);
            1
        }
    }
}

pub async fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Help => print_help(),
        Command::Version => print_version(),
        Command::Theme(mode) => theme(mode),
        other => App::open()?.dispatch(other).await,
    }
}

fn print_help() -> Result<(), CliError> {
    println!("{USAGE}");
    Ok(())
}

fn print_version() -> Result<(), CliError> {
    output::line(build_info::current().summary());
    Ok(())
}

fn theme(mode: Option<ThemeMode>) -> Result<(), CliError> {
    let prefs = ThemePreferences::open(settings_file_in(&app_data_dir()))?;
    match mode {
        Some(mode) => {
            prefs.set_mode(mode)?;
            output::success(format!("Theme set to {mode}"));
        }
        None => output::info(format!("Theme: {}", prefs.mode())),
    }
    Ok(())
}

struct App {
    base: PathBuf,
    config: Config,
    zone: Tz,
    repository: Arc<ExpenseRepository>,
    clock: Arc<dyn Clock>,
}

impl App {
    fn open() -> Result<Self, CliError> {
        let base = app_data_dir();
        let config = ConfigManager::with_base_dir(base.clone())?.load()?;
        let zone = config.zone()?;
        let store = JsonExpenseStore::new(expenses_file_in(&base))?;
        let repository = Arc::new(ExpenseRepository::new(Arc::new(store))?);
        Ok(Self {
            base,
            config,
            zone,
            repository,
            clock: Arc::new(SystemClock),
        })
    }

    fn today(&self) -> NaiveDate {
        self.clock.today_in(self.zone)
    }

    fn selected_date(&self, filter: &DateFilter) -> Option<NaiveDate> {
        match filter {
            DateFilter::All => None,
            DateFilter::Today => Some(self.today()),
            DateFilter::On(date) => Some(*date),
        }
    }

    async fn dispatch(&self, command: Command) -> Result<(), CliError> {
        match command {
            Command::Add(args) => self.add(args).await,
            Command::List { date, group_by } => {
                self.list(&date, group_by);
                Ok(())
            }
            Command::Report { days } => self.report(days),
            Command::ExportCsv { out, date } => self.export_csv(out, &date),
            Command::ExportPdf { out, days } => self.export_pdf(out, days),
            Command::Sync => self.sync().await,
            Command::Seed => {
                let seeded = SeedService::seed(&self.repository, self.today()).await?;
                output::success(format!("Seeded {} demo expenses", seeded.len()));
                Ok(())
            }
            Command::Clear => {
                self.repository.clear().await?;
                output::success("All expenses deleted");
                Ok(())
            }
            Command::Help => print_help(),
            Command::Version => print_version(),
            Command::Theme(mode) => theme(mode),
        }
    }

    async fn add(&self, args: AddArgs) -> Result<(), CliError> {
        let flow = EntryFlow::new(self.zone).with_duplicate_window(self.config.duplicate_window());
        let service = EntryService::new(Arc::clone(&self.repository), Arc::clone(&self.clock), flow);
        let mut form = service.new_form();
        form.set_title(args.title);
        form.set_amount_text(args.amount);
        form.set_category(args.category);
        if let Some(notes) = &args.notes {
            form.set_notes(notes);
        }
        if let Some(date) = args.date {
            form.set_date(date);
        }

        let mut outcome = service.submit(&mut form).await?;
        if outcome == EntryOutcome::DuplicateConfirm && args.confirm_duplicate {
            outcome = service.submit(&mut form).await?;
        }
        match outcome {
            EntryOutcome::Accepted(expense) => {
                output::success(format!("Saved {}", expense.display_label()));
                output::info(format!("Total today: {}", service.today_total_formatted()));
                Ok(())
            }
            EntryOutcome::DuplicateConfirm => {
                output::warning(
                    "Possible duplicate of a recent expense. Re-run with --yes to save anyway.",
                );
                Ok(())
            }
            EntryOutcome::Rejected(reason) => Err(ExpenseError::from(reason).into()),
        }
    }

    fn list(&self, date: &DateFilter, group_by: GroupBy) {
        let selected = self.selected_date(date);
        let view =
            ReportService::list_view(&self.repository.snapshot(), selected, group_by, self.zone);
        output::section(match selected {
            Some(day) => format!("Expenses on {}", format_date(day)),
            None => "All expenses".to_string(),
        });
        for expense in &view.items {
            output::line(self.expense_row(expense));
        }
        output::info(format!(
            "{} expenses, total {}",
            view.total_count,
            format_minor_units(view.total_minor)
        ));
    }

    fn expense_row(&self, expense: &Expense) -> String {
        format!(
            "{} {}  {:<24} {:>14}  {:<13}{}",
            format_date(local_date(expense.timestamp, self.zone)),
            format_time(local_time(expense.timestamp, self.zone)),
            expense.title,
            format_minor_units(expense.amount_minor),
            expense.category,
            if expense.is_pending_sync { " (pending)" } else { "" }
        )
    }

    fn report(&self, days: Option<u32>) -> Result<(), CliError> {
        let days = days.map_or_else(|| self.config.report_window(), Ok)?;
        let report =
            ReportService::weekly_report(&self.repository.snapshot(), self.zone, days, self.today());
        output::section(report.heading());
        let bars = ReportService::chart_bars(&report.daily);
        for (day, bar) in report.daily.iter().zip(bars) {
            let width = (bar.fraction * BAR_WIDTH).round() as usize;
            output::line(format!(
                "{:<3} {}  {:>14}  {}",
                bar.label,
                format_date(day.date),
                format_minor_units(day.total_minor),
                "#".repeat(width)
            ));
        }
        output::section("By category");
        if report.categories.is_empty() {
            output::info("No expenses in this window");
        }
        for (category, total) in &report.categories {
            output::line(format!("{category}: {}", format_minor_units(*total)));
        }
        output::info(format!("Total: {}", format_minor_units(report.total_minor)));
        Ok(())
    }

    fn export_csv(&self, out: Option<PathBuf>, date: &DateFilter) -> Result<(), CliError> {
        let selected = self.selected_date(date);
        let expenses = ReportService::group_and_sort(
            ReportService::filter_by_date(&self.repository.snapshot(), selected, self.zone),
            GroupBy::Time,
        );
        let dir = out.unwrap_or_else(|| exports_dir_in(&self.base));
        let path = write_expenses_csv(&dir, &expenses, self.zone, self.clock.now())?;
        output::success(format!("Exported {} expenses to {}", expenses.len(), path.display()));
        Ok(())
    }

    fn export_pdf(&self, out: Option<PathBuf>, days: Option<u32>) -> Result<(), CliError> {
        let days = days.map_or_else(|| self.config.report_window(), Ok)?;
        let report =
            ReportService::weekly_report(&self.repository.snapshot(), self.zone, days, self.today());
        let document = ReportDocument::layout(REPORT_TITLE, &report.report_lines());
        let dir = out.unwrap_or_else(|| exports_dir_in(&self.base));
        let path = document.write_to(&dir, self.clock.now())?;
        output::success(format!("Report written to {}", path.display()));
        Ok(())
    }

    async fn sync(&self) -> Result<(), CliError> {
        let service = SyncService::with_delay(Arc::clone(&self.repository), self.config.sync_delay());
        let Some(handle) = service.sync_pending() else {
            output::warning("A sync is already running");
            return Ok(());
        };
        output::info("Syncing...");
        match handle.wait().await? {
            SyncOutcome::Synced(count) => output::success(format!("Synced {count} expenses")),
            SyncOutcome::Cancelled => output::warning("Sync cancelled"),
        }
        Ok(())
    }
}
