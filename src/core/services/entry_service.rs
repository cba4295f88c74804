//! Expense entry: form state, validation and duplicate detection.
//!
//! A submit moves the form from `Editing` through `Validating` to one of
//! `Rejected`, `DuplicateConfirm` or `Accepted`. A suspected duplicate is only
//! reported once; the next submit of the same form goes through.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::core::repository::ExpenseRepository;
use crate::core::time::Clock;
use crate::currency::{format_minor_units, local_date, local_time, parse_minor_units};
use crate::domain::{truncate_notes, Expense, ExpenseCategory};
use crate::errors::{ExpenseError, Result};

use super::report_service::ReportService;

/// How recent a matching expense must be to count as a probable duplicate.
pub const DEFAULT_DUPLICATE_WINDOW_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Editing,
    Validating,
    Rejected,
    DuplicateConfirm,
    Accepted,
}

/// Result of evaluating a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Rejected(RejectReason),
    DuplicateConfirm,
    Accepted(Expense),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyTitle,
    InvalidAmount,
}

impl From<RejectReason> for ExpenseError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::EmptyTitle => ExpenseError::EmptyTitle,
            RejectReason::InvalidAmount => ExpenseError::InvalidAmount,
        }
    }
}

/// Editable fields of a new expense plus the flow's bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    title: String,
    amount_text: String,
    category: ExpenseCategory,
    notes: String,
    receipt_uri: Option<String>,
    date: NaiveDate,
    duplicate_acknowledged: bool,
    error_message: Option<String>,
    state: EntryState,
}

impl EntryForm {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            title: String::new(),
            amount_text: String::new(),
            category: ExpenseCategory::default(),
            notes: String::new(),
            receipt_uri: None,
            date,
            duplicate_acknowledged: false,
            error_message: None,
            state: EntryState::Editing,
        }
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.title = value.into();
        self.state = EntryState::Editing;
    }

    pub fn set_amount_text(&mut self, value: impl Into<String>) {
        self.amount_text = value.into();
        self.state = EntryState::Editing;
    }

    pub fn set_category(&mut self, category: ExpenseCategory) {
        self.category = category;
    }

    pub fn set_notes(&mut self, value: &str) {
        self.notes = truncate_notes(value);
    }

    pub fn set_receipt_uri(&mut self, uri: Option<String>) {
        self.receipt_uri = uri;
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    /// Dismisses the current message and any pending duplicate acknowledgment.
    pub fn clear_error(&mut self) {
        self.error_message = None;
        self.duplicate_acknowledged = false;
        self.state = EntryState::Editing;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount_text(&self) -> &str {
        &self.amount_text
    }

    pub fn category(&self) -> ExpenseCategory {
        self.category
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn receipt_uri(&self) -> Option<&str> {
        self.receipt_uri.as_deref()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn duplicate_acknowledged(&self) -> bool {
        self.duplicate_acknowledged
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    /// Clears every field except the category, dating the next entry `today`.
    pub fn reset_after_submit(&mut self, today: NaiveDate) {
        let category = self.category;
        *self = EntryForm::new(today);
        self.category = category;
    }

    fn reject(&mut self, error: &ExpenseError) {
        self.error_message = Some(error.user_message());
        self.state = EntryState::Rejected;
    }
}

/// Pure validation and duplicate detection, parameterised by zone and window.
#[derive(Debug, Clone, Copy)]
pub struct EntryFlow {
    zone: Tz,
    duplicate_window: Duration,
}

impl EntryFlow {
    pub fn new(zone: Tz) -> Self {
        Self {
            zone,
            duplicate_window: Duration::seconds(DEFAULT_DUPLICATE_WINDOW_SECS),
        }
    }

    pub fn with_duplicate_window(mut self, window: Duration) -> Self {
        self.duplicate_window = window;
        self
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Validates `form` against `known` expenses at instant `now`.
    ///
    /// Does not reset the form on acceptance; the caller does that once the
    /// expense is stored.
    pub fn evaluate(&self, form: &mut EntryForm, known: &[Expense], now: DateTime<Utc>) -> EntryOutcome {
        form.state = EntryState::Validating;

        let title = form.title.trim().to_string();
        if title.is_empty() {
            form.reject(&ExpenseError::EmptyTitle);
            return EntryOutcome::Rejected(RejectReason::EmptyTitle);
        }
        let Some(amount_minor) = parse_minor_units(&form.amount_text) else {
            form.reject(&ExpenseError::InvalidAmount);
            return EntryOutcome::Rejected(RejectReason::InvalidAmount);
        };

        if !form.duplicate_acknowledged && self.is_probable_duplicate(known, &title, amount_minor, now) {
            tracing::warn!(title = %title, amount = amount_minor, "possible duplicate expense");
            form.duplicate_acknowledged = true;
            form.error_message = Some(ExpenseError::DuplicateSuspected.user_message());
            form.state = EntryState::DuplicateConfirm;
            return EntryOutcome::DuplicateConfirm;
        }

        let notes = match form.notes.trim() {
            "" => None,
            trimmed => Some(trimmed.to_string()),
        };
        let timestamp = self.combine_date_with_now(form.date, now);
        let expense = Expense::new(title, amount_minor, form.category, timestamp)
            .with_notes(notes)
            .with_receipt(form.receipt_uri.clone());

        form.error_message = None;
        form.duplicate_acknowledged = false;
        form.state = EntryState::Accepted;
        EntryOutcome::Accepted(expense)
    }

    /// Same trimmed title (ignoring case), same amount, dated today and at most
    /// `duplicate_window` before `now`.
    pub fn is_probable_duplicate(
        &self,
        known: &[Expense],
        title: &str,
        amount_minor: i64,
        now: DateTime<Utc>,
    ) -> bool {
        let today = local_date(now, self.zone);
        let needle = title.trim().to_lowercase();
        known.iter().any(|expense| {
            expense.amount_minor == amount_minor
                && local_date(expense.timestamp, self.zone) == today
                && now.signed_duration_since(expense.timestamp) <= self.duplicate_window
                && expense.title.trim().to_lowercase() == needle
        })
    }

    /// The chosen calendar day at the current local time of day.
    fn combine_date_with_now(&self, date: NaiveDate, now: DateTime<Utc>) -> DateTime<Utc> {
        let naive = NaiveDateTime::new(date, local_time(now, self.zone));
        self.zone
            .from_local_datetime(&naive)
            .earliest()
            // Inside a DST gap: move forward past it.
            .or_else(|| {
                self.zone
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
            })
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or(now)
    }
}

/// Connects the entry flow to the repository.
pub struct EntryService {
    repository: Arc<ExpenseRepository>,
    clock: Arc<dyn Clock>,
    flow: EntryFlow,
}

impl EntryService {
    pub fn new(repository: Arc<ExpenseRepository>, clock: Arc<dyn Clock>, flow: EntryFlow) -> Self {
        Self {
            repository,
            clock,
            flow,
        }
    }

    /// A blank form dated today.
    pub fn new_form(&self) -> EntryForm {
        EntryForm::new(self.clock.today_in(self.flow.zone))
    }

    /// Validates and, when accepted, stores the expense and resets the form.
    ///
    /// Storage failures leave the form untouched apart from a generic message.
    pub async fn submit(&self, form: &mut EntryForm) -> Result<EntryOutcome> {
        let now = self.clock.now();
        let known = self.repository.snapshot();
        let outcome = self.flow.evaluate(form, &known, now);
        if let EntryOutcome::Accepted(expense) = &outcome {
            if let Err(err) = self.repository.add(expense.clone()).await {
                tracing::error!(error = %err, "failed to store expense");
                form.reject(&err);
                return Err(err);
            }
            tracing::info!(id = %expense.id, "expense recorded");
            form.reset_after_submit(self.clock.today_in(self.flow.zone));
        }
        Ok(outcome)
    }

    /// Sum of today's expenses in minor units.
    pub fn today_total(&self) -> i64 {
        let today = self.clock.today_in(self.flow.zone);
        ReportService::day_total(&self.repository.snapshot(), self.flow.zone, today)
    }

    pub fn today_total_formatted(&self) -> String {
        format_minor_units(self.today_total())
    }
}
