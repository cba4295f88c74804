//! Local stand-in for a remote sync.
//!
//! No network exchange happens. A sync waits a fixed delay and then clears the
//! pending flag on every expense that was pending at that moment. Cancelling the
//! returned handle, or dropping it, prevents that write.

use std::collections::BTreeSet;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::core::repository::ExpenseRepository;
use crate::domain::Identifiable;
use crate::errors::{ExpenseError, Result};

pub const DEFAULT_SYNC_DELAY_MS: u64 = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Number of expenses whose pending flag was cleared.
    Synced(usize),
    Cancelled,
}

/// In-flight simulated sync.
pub struct SyncHandle {
    token: CancellationToken,
    task: JoinHandle<Result<SyncOutcome>>,
    _guard: DropGuard,
}

impl SyncHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub async fn wait(self) -> Result<SyncOutcome> {
        let SyncHandle { task, _guard, .. } = self;
        let outcome = task
            .await
            .map_err(|err| ExpenseError::Storage(format!("sync task failed: {err}")))?;
        drop(_guard);
        outcome
    }
}

pub struct SyncService {
    repository: Arc<ExpenseRepository>,
    delay: Duration,
    in_flight: Arc<AtomicBool>,
}

impl SyncService {
    pub fn new(repository: Arc<ExpenseRepository>) -> Self {
        Self::with_delay(repository, Duration::from_millis(DEFAULT_SYNC_DELAY_MS))
    }

    pub fn with_delay(repository: Arc<ExpenseRepository>, delay: Duration) -> Self {
        Self {
            repository,
            delay,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Clears the pending flag for `ids`. Duplicates are collapsed; unknown ids are ignored.
    pub async fn mark_synced<I>(&self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let unique: BTreeSet<String> = ids.into_iter().collect();
        self.repository
            .mark_synced(unique.into_iter().collect())
            .await
    }

    /// Starts a simulated sync. Returns `None` while another one is running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn sync_pending(&self) -> Option<SyncHandle> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("sync already in progress");
            return None;
        }

        let token = CancellationToken::new();
        let task_token = token.clone();
        let repository = Arc::clone(&self.repository);
        let in_flight = Arc::clone(&self.in_flight);
        let delay = self.delay;

        let task: JoinHandle<Result<SyncOutcome>> = tokio::spawn(async move {
            let _reset = InFlightReset(in_flight);
            tracing::info!(delay_ms = delay.as_millis() as u64, "sync started");
            tokio::select! {
                _ = task_token.cancelled() => {
                    tracing::info!("sync cancelled");
                    return Ok(SyncOutcome::Cancelled);
                }
                _ = tokio::time::sleep(delay) => {}
            }
            let pending: Vec<String> = repository
                .snapshot()
                .iter()
                .filter(|expense| expense.is_pending_sync)
                .map(|expense| expense.id().to_string())
                .collect();
            let count = pending.len();
            if !repository
                .mark_synced_unless_cancelled(pending, &task_token)
                .await?
            {
                tracing::info!("sync cancelled before writing");
                return Ok(SyncOutcome::Cancelled);
            }
            tracing::info!(count, "sync finished");
            Ok(SyncOutcome::Synced(count))
        });

        Some(SyncHandle {
            _guard: token.clone().drop_guard(),
            token,
            task,
        })
    }
}

struct InFlightReset(Arc<AtomicBool>);

impl Drop for InFlightReset {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Expense, ExpenseCategory};
    use crate::storage::MemoryExpenseStore;
    use chrono::{TimeZone, Utc};

    async fn seeded_repository() -> Arc<ExpenseRepository> {
        let repo = Arc::new(ExpenseRepository::new(Arc::new(MemoryExpenseStore::new())).unwrap());
        let at = Utc.with_ymd_and_hms(2024, 8, 1, 10, 0, 0).unwrap();
        repo.upsert_all(vec![
            Expense::new("Rent", 1_500_000, ExpenseCategory::Utility, at).with_id("rent"),
            Expense::new("Movie", 50_000, ExpenseCategory::Entertainment, at)
                .with_id("movie")
                .synced(),
        ])
        .await
        .unwrap();
        repo
    }

    #[tokio::test]
    async fn sync_clears_pending_flags_after_delay() {
        let repo = seeded_repository().await;
        let service = SyncService::with_delay(Arc::clone(&repo), Duration::from_millis(10));
        let handle = service.sync_pending().expect("sync starts");
        assert!(service.is_syncing());
        assert_eq!(handle.wait().await.unwrap(), SyncOutcome::Synced(1));
        assert!(repo.snapshot().iter().all(|e| !e.is_pending_sync));
        assert!(!service.is_syncing());
    }

    #[tokio::test]
    async fn second_sync_is_refused_while_running() {
        let repo = seeded_repository().await;
        let service = SyncService::with_delay(repo, Duration::from_millis(50));
        let first = service.sync_pending().expect("first sync");
        assert!(service.sync_pending().is_none());
        first.wait().await.unwrap();
        assert!(service.sync_pending().is_some());
    }

    #[tokio::test]
    async fn cancelled_sync_leaves_flags_untouched() {
        let repo = seeded_repository().await;
        let service = SyncService::with_delay(Arc::clone(&repo), Duration::from_millis(50));
        let handle = service.sync_pending().expect("sync starts");
        handle.cancel();
        assert_eq!(handle.wait().await.unwrap(), SyncOutcome::Cancelled);
        let rent = repo.snapshot().iter().find(|e| e.id == "rent").cloned().unwrap();
        assert!(rent.is_pending_sync);
    }

    #[tokio::test]
    async fn dropped_handle_abandons_the_write() {
        let repo = seeded_repository().await;
        let service = SyncService::with_delay(Arc::clone(&repo), Duration::from_millis(20));
        drop(service.sync_pending().expect("sync starts"));
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(repo.snapshot().iter().any(|e| e.is_pending_sync));
        assert!(!service.is_syncing());
    }

    #[tokio::test]
    async fn cancel_while_waiting_for_the_write_lock_skips_the_write() {
        let repo = seeded_repository().await;
        let service = SyncService::with_delay(Arc::clone(&repo), Duration::from_millis(5));
        let writes = repo.lock_writes().await;
        let handle = service.sync_pending().expect("sync starts");
        // Long enough for the delay to elapse; the task is now queued on the lock.
        tokio::time::sleep(Duration::from_millis(40)).await;
        handle.cancel();
        drop(writes);
        assert_eq!(handle.wait().await.unwrap(), SyncOutcome::Cancelled);
        let rent = repo.snapshot().iter().find(|e| e.id == "rent").cloned().unwrap();
        assert!(rent.is_pending_sync);
    }

    #[tokio::test]
    async fn mark_synced_with_no_ids_is_a_no_op() {
        let repo = seeded_repository().await;
        let service = SyncService::new(Arc::clone(&repo));
        service.mark_synced(Vec::new()).await.unwrap();
        service
            .mark_synced(vec!["rent".to_string(), "rent".to_string(), "ghost".to_string()])
            .await
            .unwrap();
        assert!(repo.snapshot().iter().all(|e| !e.is_pending_sync));
    }
}
