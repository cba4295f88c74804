//! Observable expense collection.
//!
//! The repository is the single writer in front of an [`ExpenseStore`]. Writes
//! are serialized; after each one the full row set is re-read from the store and
//! published as a new snapshot. Subscribers always see the latest complete
//! snapshot and nothing older.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

use crate::domain::Expense;
use crate::errors::{ExpenseError, Result};
use crate::storage::ExpenseStore;

pub type Snapshot = Arc<Vec<Expense>>;

pub struct ExpenseRepository {
    store: Arc<dyn ExpenseStore>,
    write_lock: Mutex<()>,
    snapshot: watch::Sender<Snapshot>,
}

impl ExpenseRepository {
    /// Wraps `store` and publishes its current contents as the first snapshot.
    pub fn new(store: Arc<dyn ExpenseStore>) -> Result<Self> {
        let initial = store.get_all()?;
        tracing::debug!(rows = initial.len(), "expense repository opened");
        let (snapshot, _) = watch::channel(Arc::new(initial));
        Ok(Self {
            store,
            write_lock: Mutex::new(()),
            snapshot,
        })
    }

    /// A receiver that immediately holds the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.snapshot.borrow())
    }

    pub fn get_by_time_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>> {
        self.store.get_by_time_range(start, end)
    }

    pub async fn add(&self, expense: Expense) -> Result<()> {
        tracing::info!(id = %expense.id, amount = expense.amount_minor, "adding expense");
        self.write("add", move |store| store.upsert(&expense)).await
    }

    pub async fn upsert_all(&self, expenses: Vec<Expense>) -> Result<()> {
        tracing::info!(count = expenses.len(), "upserting expenses");
        self.write("upsert_all", move |store| store.upsert_all(&expenses))
            .await
    }

    pub async fn clear(&self) -> Result<()> {
        tracing::info!("clearing all expenses");
        self.write("clear", |store| store.clear()).await
    }

    /// Clears the pending flag for `ids`. An empty list neither writes nor publishes.
    pub async fn mark_synced(&self, ids: Vec<String>) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        tracing::info!(count = ids.len(), "marking expenses synced");
        self.write("mark_synced", move |store| store.mark_synced(&ids))
            .await
    }

    /// As [`ExpenseRepository::mark_synced`], but skipped when `cancel` fires
    /// before the write lock is held. Returns whether the write went ahead.
    pub async fn mark_synced_unless_cancelled(
        &self,
        ids: Vec<String>,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        let guard = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(false),
            guard = self.write_lock.lock() => guard,
        };
        if cancel.is_cancelled() {
            return Ok(false);
        }
        if ids.is_empty() {
            return Ok(true);
        }
        tracing::info!(count = ids.len(), "marking expenses synced");
        self.apply(guard, "mark_synced", move |store| store.mark_synced(&ids))
            .await?;
        Ok(true)
    }

    #[cfg(test)]
    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    async fn write<F>(&self, operation: &'static str, op: F) -> Result<()>
    where
        F: FnOnce(&dyn ExpenseStore) -> Result<()> + Send + 'static,
    {
        let guard = self.write_lock.lock().await;
        self.apply(guard, operation, op).await
    }

    /// Runs `op` while `_guard` keeps other writers out, then publishes.
    async fn apply<F>(&self, _guard: MutexGuard<'_, ()>, operation: &'static str, op: F) -> Result<()>
    where
        F: FnOnce(&dyn ExpenseStore) -> Result<()> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let rows = tokio::task::spawn_blocking(move || {
            op(store.as_ref())?;
            store.get_all()
        })
        .await
        .map_err(|err| ExpenseError::Storage(format!("{operation} task failed: {err}")))?
        .map_err(|err| {
            tracing::warn!(operation, error = %err, "expense store write failed");
            err
        })?;
        self.snapshot.send_replace(Arc::new(rows));
        Ok(())
    }
}
