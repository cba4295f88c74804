//! Hand-rolled argument parsing for `expense_cli`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::config::ThemeMode;
use crate::core::services::MAX_REPORT_WINDOW_DAYS;
use crate::domain::{ExpenseCategory, GroupBy};

use super::CliError;

const SWITCHES: [&str; 2] = ["--yes", "--plain"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFilter {
    All,
    Today,
    On(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    pub title: String,
    pub amount: String,
    pub category: ExpenseCategory,
    pub notes: Option<String>,
    pub date: Option<NaiveDate>,
    /// Save even when the entry looks like a duplicate.
    pub confirm_duplicate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(AddArgs),
    List { date: DateFilter, group_by: GroupBy },
    Report { days: Option<u32> },
    ExportCsv { out: Option<PathBuf>, date: DateFilter },
    ExportPdf { out: Option<PathBuf>, days: Option<u32> },
    Sync,
    Seed,
    Clear,
    Theme(Option<ThemeMode>),
    Version,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub plain: bool,
}

#[derive(Default)]
struct Flags {
    positional: Vec<String>,
    options: BTreeMap<String, String>,
    switches: Vec<String>,
}

impl Flags {
    fn split(args: Vec<String>) -> Result<Self, CliError> {
        let mut flags = Flags::default();
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            if SWITCHES.contains(&arg.as_str()) {
                flags.switches.push(arg);
            } else if let Some(name) = arg.strip_prefix("--") {
                let value = iter
                    .next()
                    .ok_or_else(|| CliError::Usage(format!("`--{name}` needs a value")))?;
                flags.options.insert(name.to_string(), value);
            } else {
                flags.positional.push(arg);
            }
        }
        Ok(flags)
    }

    fn switch(&self, name: &str) -> bool {
        self.switches.iter().any(|s| s == name)
    }

    fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    fn days(&self) -> Result<Option<u32>, CliError> {
        self.option("days")
            .map(|raw| match raw.parse::<u32>() {
                Ok(days) if days <= MAX_REPORT_WINDOW_DAYS => Ok(days),
                Ok(_) => Err(CliError::Usage(format!(
                    "`--days` must be at most {MAX_REPORT_WINDOW_DAYS}"
                ))),
                Err(_) => Err(CliError::Usage(format!("invalid day count `{raw}`"))),
            })
            .transpose()
    }

    fn date_filter(&self) -> Result<DateFilter, CliError> {
        match self.option("date") {
            None | Some("all") => Ok(DateFilter::All),
            Some("today") => Ok(DateFilter::Today),
            Some(raw) => parse_date(raw).map(DateFilter::On),
        }
    }

    fn out(&self) -> Option<PathBuf> {
        self.option("out").map(PathBuf::from)
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CliError::Usage(format!("invalid date `{raw}`, expected YYYY-MM-DD")))
}

pub fn parse<I>(args: I) -> Result<Invocation, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args: Vec<String> = args.into_iter().collect();
    if args.is_empty() {
        return Ok(Invocation {
            command: Command::Help,
            plain: false,
        });
    }
    let name = args.remove(0);
    let flags = Flags::split(args)?;
    let plain = flags.switch("--plain");

    let command = match name.as_str() {
        "add" => {
            let mut positional = flags.positional.iter();
            let (Some(title), Some(amount)) = (positional.next(), positional.next()) else {
                return Err(CliError::Usage(
                    "usage: add <title> <amount> [--category C] [--notes N] [--date YYYY-MM-DD] [--yes]".into(),
                ));
            };
            let category = match flags.option("category") {
                Some(raw) => ExpenseCategory::ALL
                    .into_iter()
                    .find(|category| category.as_str().eq_ignore_ascii_case(raw))
                    .ok_or_else(|| CliError::Usage(format!("unknown category `{raw}`")))?,
                None => ExpenseCategory::default(),
            };
            Command::Add(AddArgs {
                title: title.clone(),
                amount: amount.clone(),
                category,
                notes: flags.option("notes").map(String::from),
                date: flags.option("date").map(parse_date).transpose()?,
                confirm_duplicate: flags.switch("--yes"),
            })
        }
        "list" => {
            let group_by = match flags.option("group") {
                None | Some("time") => GroupBy::Time,
                Some("category") => GroupBy::Category,
                Some(other) => {
                    return Err(CliError::Usage(format!(
                        "unknown grouping `{other}`, expected time or category"
                    )))
                }
            };
            Command::List {
                date: flags.date_filter()?,
                group_by,
            }
        }
        "report" => Command::Report { days: flags.days()? },
        "export-csv" => Command::ExportCsv {
            out: flags.out(),
            date: flags.date_filter()?,
        },
        "export-pdf" => Command::ExportPdf {
            out: flags.out(),
            days: flags.days()?,
        },
        "sync" => Command::Sync,
        "seed" => Command::Seed,
        "clear" => Command::Clear,
        "theme" => Command::Theme(
            flags
                .positional
                .first()
                .map(|raw| raw.parse::<ThemeMode>())
                .transpose()
                .map_err(|err| CliError::Usage(err.to_string()))?,
        ),
        "version" | "--version" | "-V" => Command::Version,
        "help" | "--help" | "-h" => Command::Help,
        other => return Err(CliError::Usage(format!("unknown command `{other}`"))),
    };
    Ok(Invocation { command, plain })
}

pub const USAGE: &str = "\
Usage: expense_cli <command> [options]

Commands:
  add <title> <amount>   Record an expense [--category C] [--notes N] [--date YYYY-MM-DD] [--yes]
  list                   List expenses [--date all|today|YYYY-MM-DD] [--group time|category]
  report                 Trailing spending report [--days N]
  export-csv             Write expenses as CSV [--out DIR] [--date ...]
  export-pdf             Write the report page [--out DIR] [--days N]
  sync                   Mark pending expenses as synced
  seed                   Insert a week of demo expenses
  clear                  Delete every expense
  theme [system|light|dark]
  version

Global: --plain disables colours. EXPENSE_CORE_HOME overrides the data directory.";
