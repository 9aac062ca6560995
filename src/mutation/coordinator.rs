//! Optimistic upsert/delete against a cached collection

use crate::error::{SyncacheError, SyncacheResult};
use crate::mutation::draft::{MutationDraft, Record};
use crate::remote::RemoteWriter;
use crate::store::CacheStore;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default prefix for locally generated identifiers
pub const DEFAULT_TEMP_ID_PREFIX: &str = "temp-";

/// Observable state of a coordinator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationState {
    /// True while any call on the coordinator is outstanding
    pub is_pending: bool,

    /// Failure of the most recent failed call, cleared when a call starts
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct Tracker {
    pending: usize,
    error: Option<String>,
}

/// Applies writes to one collection key optimistically
///
/// Every call writes its tentative result into the store first, so
/// subscribers see it before the network completes, then either commits
/// the authoritative result or restores the exact pre-call snapshot.
/// Calls may overlap; overlapping edits of the same record are not
/// serialized and the later restore wins.
pub struct MutationCoordinator<D: MutationDraft, W> {
    store: CacheStore<Vec<D::Record>>,
    key: String,
    remote: W,
    temp_id_prefix: String,
    tracker: Mutex<Tracker>,
    _draft: PhantomData<fn(D)>,
}

impl<D, W> MutationCoordinator<D, W>
where
    D: MutationDraft,
    W: RemoteWriter<D>,
{
    /// Create a coordinator for the collection stored under `key`
    pub fn new(store: CacheStore<Vec<D::Record>>, key: impl Into<String>, remote: W) -> Self {
        Self {
            store,
            key: key.into(),
            remote,
            temp_id_prefix: DEFAULT_TEMP_ID_PREFIX.to_string(),
            tracker: Mutex::new(Tracker::default()),
            _draft: PhantomData,
        }
    }

    /// Use a different prefix for temporary identifiers
    pub fn with_temp_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_id_prefix = prefix.into();
        self
    }

    /// Collection key this coordinator writes to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current pending/error state
    pub fn state(&self) -> MutationState {
        let tracker = self.tracker.lock();
        MutationState {
            is_pending: tracker.pending > 0,
            error: tracker.error.clone(),
        }
    }

    /// True while any call is outstanding
    pub fn is_pending(&self) -> bool {
        self.tracker.lock().pending > 0
    }

    /// Failure description of the last failed call
    pub fn last_error(&self) -> Option<String> {
        self.tracker.lock().error.clone()
    }

    /// Create or update a record
    ///
    /// Updates replace the matching record in place; creates append a
    /// record under a temporary id that is swapped for the authoritative
    /// one on success. On failure the collection is restored exactly and
    /// the failure is returned. The entry reads as loading until the
    /// remote answers.
    pub async fn upsert(&self, draft: D) -> SyncacheResult<D::Record> {
        let optimistic_id = match draft.id() {
            Some(id) => id.to_string(),
            None => self.temp_id(),
        };
        let optimistic = draft.to_optimistic(&optimistic_id, Utc::now());

        let mut is_update = false;
        let pending = self.begin(|current| {
            let mut next = current.cloned().unwrap_or_default();
            match next.iter().position(|record| record.id() == optimistic_id) {
                Some(index) => {
                    next[index] = optimistic;
                    is_update = true;
                }
                None => next.push(optimistic),
            }
            Some(next)
        });
        debug!(
            "Optimistic {} of {} in {}",
            if is_update { "update" } else { "create" },
            optimistic_id,
            self.key
        );

        match self.remote.upsert(&draft).await {
            Ok(saved) => {
                let committed = saved.clone();
                pending.commit(|current| {
                    let mut next = current.cloned().unwrap_or_default();
                    match next.iter().position(|record| record.id() == optimistic_id) {
                        Some(index) => next[index] = committed,
                        None => next.push(committed),
                    }
                    if !is_update {
                        dedupe_by_id(&mut next);
                    }
                    Some(next)
                });

                info!("Committed {} as {} in {}", optimistic_id, saved.id(), self.key);
                Ok(saved)
            }
            Err(err) => {
                let message = err.to_string();
                warn!("Upsert of {} failed, rolled back: {}", optimistic_id, message);
                pending.rollback(message.clone());
                Err(SyncacheError::mutation("upsert", message))
            }
        }
    }

    /// Delete a record by id
    ///
    /// The record disappears immediately and reappears in its original
    /// position if the remote delete fails.
    pub async fn delete(&self, id: &str) -> SyncacheResult<()> {
        let pending = self.begin(|current| {
            Some(
                current
                    .map(|records| {
                        records
                            .iter()
                            .filter(|record| record.id() != id)
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default(),
            )
        });
        debug!("Optimistic delete of {} in {}", id, self.key);

        match self.remote.delete(id).await {
            Ok(()) => {
                pending.commit(|current| current.cloned());
                info!("Deleted {} from {}", id, self.key);
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                warn!("Delete of {} failed, rolled back: {}", id, message);
                pending.rollback(message.clone());
                Err(SyncacheError::mutation("delete", message))
            }
        }
    }

    fn temp_id(&self) -> String {
        format!("{}{}", self.temp_id_prefix, Uuid::new_v4())
    }

    /// Count the call as pending and apply its optimistic write
    fn begin<F>(&self, updater: F) -> PendingWrite<'_, D::Record>
    where
        F: FnOnce(Option<&Vec<D::Record>>) -> Option<Vec<D::Record>>,
    {
        {
            let mut tracker = self.tracker.lock();
            tracker.pending += 1;
            tracker.error = None;
        }
        let snapshot = self.store.begin_write(&self.key, updater);
        PendingWrite {
            store: &self.store,
            key: &self.key,
            tracker: &self.tracker,
            snapshot: Some(snapshot),
        }
    }
}

/// Optimistic write awaiting the remote
///
/// Dropping it unresolved, for example when the call's future is cancelled
/// at the remote `.await`, restores the snapshot and ends the pending call
/// without recording an error.
struct PendingWrite<'a, R: Record> {
    store: &'a CacheStore<Vec<R>>,
    key: &'a str,
    tracker: &'a Mutex<Tracker>,
    /// `Some` until the write is committed or rolled back
    snapshot: Option<Option<Arc<Vec<R>>>>,
}

impl<R: Record> PendingWrite<'_, R> {
    fn commit<F>(mut self, updater: F)
    where
        F: FnOnce(Option<&Vec<R>>) -> Option<Vec<R>>,
    {
        self.snapshot = None;
        self.store.commit_write(self.key, updater);
        self.finish(None);
    }

    fn rollback(mut self, error: String) {
        if let Some(snapshot) = self.snapshot.take() {
            self.store.abort_write(self.key, snapshot);
        }
        self.finish(Some(error));
    }

    fn finish(&self, error: Option<String>) {
        let mut tracker = self.tracker.lock();
        tracker.pending = tracker.pending.saturating_sub(1);
        if error.is_some() {
            tracker.error = error;
        }
    }
}

impl<R: Record> Drop for PendingWrite<'_, R> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            warn!("Mutation of {} cancelled, rolled back", self.key);
            self.store.abort_write(self.key, snapshot);
            self.finish(None);
        }
    }
}

/// Keep the first record for each id
fn dedupe_by_id<R: Record>(records: &mut Vec<R>) {
    let mut seen = HashSet::new();
    records.retain(|record| seen.insert(record.id().to_string()));
}
