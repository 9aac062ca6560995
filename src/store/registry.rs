//! Keyed cache registry with single-flight fetches

use crate::error::SyncacheError;
use crate::remote::Fetcher;
use crate::store::entry::{Entry, EntrySnapshot, InFlight, Settled};
use crate::store::subscription::{Callback, Subscription, SubscriptionId};
use futures_util::FutureExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry mapping keys to cache entries
///
/// Cloning is cheap and every clone refers to the same entries. Construct
/// one per application context and hand clones to consumers.
///
/// Notifications run on the thread that caused the transition, after the
/// lock is released. On a single-threaded runtime every key's subscribers
/// see transitions in the order they happened. On a multi-threaded runtime
/// two transitions of one key racing on different workers may notify in
/// either order, so subscribers should re-read the store rather than
/// assume the order of callbacks.
///
/// Fetches run as spawned tokio tasks, so [`CacheStore::acquire`] and
/// [`CacheStore::refetch`] must be called from within a tokio runtime.
/// Entry state sits behind a short-lived lock that is never held across an
/// `.await` or while subscriber callbacks run, so callbacks may read the
/// store. Updaters passed to [`CacheStore::write`] run under the lock and
/// must not call back into the store.
pub struct CacheStore<V> {
    inner: Arc<StoreInner<V>>,
}

struct StoreInner<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
    next_subscription: AtomicU64,
    next_fetch: AtomicU64,
}

impl<V> Clone for CacheStore<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Send + Sync + 'static> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Send + Sync + 'static> CacheStore<V> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                entries: Mutex::new(HashMap::new()),
                next_subscription: AtomicU64::new(1),
                next_fetch: AtomicU64::new(1),
            }),
        }
    }

    /// Return the entry for `key`, starting a fetch if it has no value
    ///
    /// The first fetcher supplied for a key is kept and reused by
    /// [`CacheStore::refetch`]. When the entry has no value and nothing is
    /// in flight, exactly one fetch starts and the returned snapshot is
    /// already loading. Completion is observed through subscriptions or
    /// [`CacheStore::settled`].
    pub fn acquire<F>(&self, key: &str, fetcher: F) -> EntrySnapshot<V>
    where
        F: Fetcher<V> + 'static,
    {
        let (snapshot, listeners) = {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);

            if entry.fetcher.is_none() {
                entry.fetcher = Some(Arc::new(fetcher));
            }

            if entry.value.is_some() || entry.inflight.is_some() {
                return entry.snapshot();
            }

            self.begin_fetch(key, entry);
            (entry.snapshot(), entry.listeners())
        };

        notify(key, listeners);
        snapshot
    }

    /// Subscribe to `key`, then acquire it
    ///
    /// This is how a consumer attaches to a key: the subscription sees the
    /// loading transition as well as the outcome.
    pub fn watch<F, C>(
        &self,
        key: &str,
        fetcher: F,
        callback: C,
    ) -> (EntrySnapshot<V>, Subscription)
    where
        F: Fetcher<V> + 'static,
        C: Fn() + Send + Sync + 'static,
    {
        let subscription = self.subscribe(key, callback);
        let snapshot = self.acquire(key, fetcher);
        (snapshot, subscription)
    }

    /// Force a fetch even if a value is present
    ///
    /// Joins the in-flight fetch instead of starting another one. Resolves
    /// with the entry state once that fetch has been applied.
    pub async fn refetch(&self, key: &str) -> EntrySnapshot<V> {
        let (settled, listeners) = {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);

            match &entry.inflight {
                Some(inflight) => {
                    debug!("Joining in-flight fetch for {}", key);
                    (inflight.settled.clone(), Vec::new())
                }
                None => {
                    let settled = self.begin_fetch(key, entry);
                    (settled, entry.listeners())
                }
            }
        };

        notify(key, listeners);
        settled.await;
        self.read(key)
    }

    /// Wait for the in-flight fetch of `key`, if any, and return the entry
    pub async fn settled(&self, key: &str) -> EntrySnapshot<V> {
        let settled = {
            let entries = self.inner.entries.lock();
            entries
                .get(key)
                .and_then(|entry| entry.inflight.as_ref())
                .map(|inflight| inflight.settled.clone())
        };

        if let Some(settled) = settled {
            settled.await;
        }
        self.read(key)
    }

    /// Register `callback` for every change to `key`
    pub fn subscribe<C>(&self, key: &str, callback: C) -> Subscription
    where
        C: Fn() + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        {
            let mut entries = self.inner.entries.lock();
            entries
                .entry(key.to_string())
                .or_insert_with(Entry::new)
                .subscribers
                .insert(id, Arc::new(callback));
        }
        debug!("Subscribed {:?} to {}", id, key);

        let inner = Arc::downgrade(&self.inner);
        let owned_key = key.to_string();
        Subscription::new(id, key, move || {
            if let Some(inner) = inner.upgrade() {
                inner.unsubscribe(&owned_key, id);
            }
        })
    }

    /// Current entry state, without fetching
    pub fn read(&self, key: &str) -> EntrySnapshot<V> {
        let entries = self.inner.entries.lock();
        entries
            .get(key)
            .map(Entry::snapshot)
            .unwrap_or_default()
    }

    /// Replace the value with `updater(current)` and notify
    ///
    /// Loading and error state are left untouched. Returns the value that
    /// was replaced, which doubles as a rollback snapshot taken atomically
    /// with the write.
    pub fn write<F>(&self, key: &str, updater: F) -> Option<Arc<V>>
    where
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        let (previous, listeners) = {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);
            let next = updater(entry.value.as_deref()).map(Arc::new);
            let previous = std::mem::replace(&mut entry.value, next);
            (previous, entry.listeners())
        };

        debug!("Wrote value for {}", key);
        notify(key, listeners);
        previous
    }

    /// Put back a value previously returned by [`CacheStore::write`]
    pub fn restore(&self, key: &str, snapshot: Option<Arc<V>>) {
        let listeners = {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);
            entry.value = snapshot;
            entry.listeners()
        };

        debug!("Restored snapshot for {}", key);
        notify(key, listeners);
    }

    /// Apply an optimistic write and mark the entry loading
    ///
    /// Like [`CacheStore::write`], returning the replaced value as the
    /// rollback snapshot. The entry stays loading until a matching
    /// [`CacheStore::commit_write`] or [`CacheStore::abort_write`].
    pub fn begin_write<F>(&self, key: &str, updater: F) -> Option<Arc<V>>
    where
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        let (previous, listeners) = {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);
            let next = updater(entry.value.as_deref()).map(Arc::new);
            let previous = std::mem::replace(&mut entry.value, next);
            entry.writes += 1;
            entry.refresh_loading();
            (previous, entry.listeners())
        };

        debug!("Optimistic write pending for {}", key);
        notify(key, listeners);
        previous
    }

    /// Replace the value with the confirmed result of a pending write
    pub fn commit_write<F>(&self, key: &str, updater: F)
    where
        F: FnOnce(Option<&V>) -> Option<V>,
    {
        let listeners = {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);
            entry.value = updater(entry.value.as_deref()).map(Arc::new);
            entry.writes = entry.writes.saturating_sub(1);
            entry.refresh_loading();
            entry.listeners()
        };

        debug!("Committed write for {}", key);
        notify(key, listeners);
    }

    /// Put back the snapshot taken by [`CacheStore::begin_write`]
    pub fn abort_write(&self, key: &str, snapshot: Option<Arc<V>>) {
        let listeners = {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);
            entry.value = snapshot;
            entry.writes = entry.writes.saturating_sub(1);
            entry.refresh_loading();
            entry.listeners()
        };

        debug!("Aborted write for {}", key);
        notify(key, listeners);
    }

    /// Install a known value without fetching
    pub fn seed(&self, key: &str, value: V) {
        let listeners = {
            let mut entries = self.inner.entries.lock();
            let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);
            entry.value = Some(Arc::new(value));
            entry.is_loading = false;
            entry.error = None;
            entry.listeners()
        };

        debug!("Seeded {}", key);
        notify(key, listeners);
    }

    /// Reset `key` to empty and forget its in-flight fetch
    ///
    /// A fetch that is already running still lands later and is applied.
    pub fn clear(&self, key: &str) {
        let listeners = {
            let mut entries = self.inner.entries.lock();
            let Some(entry) = entries.get_mut(key) else {
                return;
            };
            entry.value = None;
            entry.is_loading = false;
            entry.error = None;
            entry.inflight = None;
            entry.listeners()
        };

        debug!("Cleared {}", key);
        notify(key, listeners);
    }

    /// Number of live subscriptions on `key`
    pub fn subscriber_count(&self, key: &str) -> usize {
        let entries = self.inner.entries.lock();
        entries
            .get(key)
            .map(|entry| entry.subscribers.len())
            .unwrap_or(0)
    }

    /// Mark the entry loading and spawn its fetch
    ///
    /// Called with the entry lock held; the fetcher itself is only invoked
    /// inside the spawned task.
    fn begin_fetch(&self, key: &str, entry: &mut Entry<V>) -> Settled {
        let seq = self.inner.next_fetch.fetch_add(1, Ordering::Relaxed);
        entry.is_loading = true;
        entry.error = None;

        let fetcher = entry.fetcher.clone();
        let inner = Arc::clone(&self.inner);
        let owned_key = key.to_string();

        debug!("Starting fetch #{} for {}", seq, key);
        let task = tokio::spawn(async move {
            let result = match fetcher {
                Some(fetcher) => match AssertUnwindSafe(fetcher.fetch()).catch_unwind().await {
                    Ok(result) => result,
                    Err(_) => Err(SyncacheError::Internal("fetcher panicked".to_string())),
                },
                None => Err(SyncacheError::MissingFetcher(owned_key.clone())),
            };
            inner.settle(&owned_key, seq, result.map_err(|e| e.to_string()));
        });

        let settled = async move {
            if let Err(e) = task.await {
                warn!("Fetch task #{} did not complete: {}", seq, e);
            }
        }
        .boxed()
        .shared();

        entry.inflight = Some(InFlight {
            seq,
            settled: settled.clone(),
        });
        settled
    }
}

impl<V> StoreInner<V> {
    /// Apply a finished fetch to its entry
    ///
    /// Results are applied whether or not the fetch still owns the entry;
    /// only the owner releases the in-flight slot.
    fn settle(&self, key: &str, seq: u64, result: Result<V, String>) {
        let listeners = {
            let mut entries = self.entries.lock();
            let Some(entry) = entries.get_mut(key) else {
                return;
            };

            if entry.inflight.as_ref().is_some_and(|inflight| inflight.seq == seq) {
                entry.inflight = None;
            }

            match result {
                Ok(value) => {
                    entry.value = Some(Arc::new(value));
                    entry.error = None;
                    debug!("Fetch #{} for {} succeeded", seq, key);
                }
                Err(message) => {
                    warn!("Fetch #{} for {} failed: {}", seq, key, message);
                    entry.error = Some(message);
                }
            }

            entry.refresh_loading();
            entry.listeners()
        };

        notify(key, listeners);
    }

    fn unsubscribe(&self, key: &str, id: SubscriptionId) {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get_mut(key) {
            entry.subscribers.remove(&id);
            debug!("Unsubscribed {:?} from {}", id, key);
        }
    }
}

/// Invoke every registered callback for one transition
fn notify(key: &str, listeners: Vec<Callback>) {
    if listeners.is_empty() {
        return;
    }

    debug!("Notifying {} subscriber(s) of {}", listeners.len(), key);
    for callback in listeners {
        callback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncacheResult;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Semaphore;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
    }

    fn item(id: &str) -> Item {
        Item { id: id.to_string() }
    }

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (count, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    /// Fetcher that counts invocations and resolves once `gate` has a permit
    fn gated_fetcher(
        calls: Arc<AtomicUsize>,
        gate: Arc<Semaphore>,
        value: Vec<Item>,
    ) -> impl Fetcher<Vec<Item>> + 'static {
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            let gate = Arc::clone(&gate);
            let value = value.clone();
            async move {
                let _permit = gate.acquire().await;
                Ok::<_, SyncacheError>(value)
            }
        }
    }

    fn failing_fetcher() -> impl Fetcher<Vec<Item>> + 'static {
        || async { Err::<Vec<Item>, _>(SyncacheError::remote("Network request failed")) }
    }

    #[test]
    fn unknown_key_reads_empty() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        let snapshot = store.read("never-seen");
        assert!(snapshot.value.is_none());
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn acquire_is_single_flight() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(0));

        let first = store.acquire(
            "companies",
            gated_fetcher(Arc::clone(&calls), Arc::clone(&gate), vec![item("c1")]),
        );
        let second = store.acquire(
            "companies",
            gated_fetcher(Arc::clone(&calls), Arc::clone(&gate), vec![item("c2")]),
        );
        assert!(first.is_loading);
        assert!(second.is_loading);

        gate.add_permits(1);
        let settled = store.settled("companies").await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(settled.data(), Some(&vec![item("c1")]));
        assert!(!settled.is_loading);
    }

    #[tokio::test]
    async fn acquire_loads_then_notifies() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        let observed = Arc::new(Mutex::new(Vec::new()));

        let reader = store.clone();
        let sink = Arc::clone(&observed);
        let (snapshot, _subscription) = store.watch(
            "companies",
            || async { SyncacheResult::Ok(vec![item("c1")]) },
            move || sink.lock().push(reader.read("companies")),
        );

        assert!(snapshot.value.is_none());
        assert!(snapshot.is_loading);

        store.settled("companies").await;

        let observed = observed.lock();
        assert_eq!(observed.len(), 2);
        assert!(observed[0].is_loading);
        let last = &observed[1];
        assert_eq!(last.data(), Some(&vec![item("c1")]));
        assert!(!last.is_loading);
        assert!(last.error.is_none());
    }

    #[tokio::test]
    async fn failed_refetch_keeps_previous_value() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        store.seed("posts", vec![item("p1")]);

        // A value is present, so acquire only registers the fetcher
        let snapshot = store.acquire("posts", failing_fetcher());
        assert!(!snapshot.is_loading);

        let snapshot = store.refetch("posts").await;
        assert_eq!(snapshot.data(), Some(&vec![item("p1")]));
        assert_eq!(snapshot.error.as_deref(), Some("Network request failed"));
        assert!(!snapshot.is_loading);
    }

    #[tokio::test]
    async fn acquire_retries_after_failure_without_value() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&calls);
        let fetcher = move || {
            let attempt = handle.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(SyncacheError::remote("Network request failed"))
                } else {
                    Ok(vec![item("c1")])
                }
            }
        };

        store.acquire("companies", fetcher);
        let failed = store.settled("companies").await;
        assert!(failed.value.is_none());
        assert!(failed.error.is_some());

        let retry = store.acquire("companies", failing_fetcher());
        assert!(retry.is_loading);
        assert!(retry.error.is_none());

        let settled = store.settled("companies").await;
        assert_eq!(settled.data(), Some(&vec![item("c1")]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn refetch_joins_inflight_fetch() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(0));

        store.acquire(
            "countries",
            gated_fetcher(Arc::clone(&calls), Arc::clone(&gate), vec![item("US")]),
        );

        let (snapshot, ()) = tokio::join!(store.refetch("countries"), async {
            gate.add_permits(1);
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(snapshot.data(), Some(&vec![item("US")]));
    }

    #[tokio::test]
    async fn refetch_without_fetcher_records_failure() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        store.seed("posts", vec![item("p1")]);

        let snapshot = store.refetch("posts").await;
        assert_eq!(snapshot.data(), Some(&vec![item("p1")]));
        let error = snapshot.error.unwrap_or_default();
        assert!(error.contains("not been initialised"));
    }

    #[tokio::test]
    async fn panicking_fetcher_does_not_wedge_entry() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        let fetcher = || async {
            if true {
                panic!("boom");
            }
            Ok::<Vec<Item>, SyncacheError>(Vec::new())
        };

        store.acquire("posts", fetcher);
        let snapshot = store.settled("posts").await;
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.error.as_deref(), Some("Internal error: fetcher panicked"));
    }

    #[test]
    fn subscribers_fan_out_and_unsubscribe_independently() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        let (first_count, first) = counter();
        let (second_count, second) = counter();
        let (third_count, third) = counter();

        let first_sub = store.subscribe("posts", first);
        let _second_sub = store.subscribe("posts", second);
        let _third_sub = store.subscribe("posts", third);
        assert_eq!(store.subscriber_count("posts"), 3);

        store.seed("posts", vec![item("p1")]);
        assert_eq!(first_count.load(Ordering::SeqCst), 1);
        assert_eq!(second_count.load(Ordering::SeqCst), 1);
        assert_eq!(third_count.load(Ordering::SeqCst), 1);

        first_sub.unsubscribe();
        assert_eq!(store.subscriber_count("posts"), 2);

        store.write("posts", |current| {
            let mut next = current.cloned().unwrap_or_default();
            next.push(item("p2"));
            Some(next)
        });
        assert_eq!(first_count.load(Ordering::SeqCst), 1);
        assert_eq!(second_count.load(Ordering::SeqCst), 2);
        assert_eq!(third_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn duplicate_callbacks_are_distinct_registrations() {
        let store: CacheStore<u32> = CacheStore::new();
        let count = Arc::new(AtomicUsize::new(0));
        let make = || {
            let count = Arc::clone(&count);
            move || {
                count.fetch_add(1, Ordering::SeqCst);
            }
        };

        let a = store.subscribe("total", make());
        let b = store.subscribe("total", make());
        assert_ne!(a.id(), b.id());

        drop(a);
        store.seed("total", 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscriptions_are_scoped_per_key() {
        let store: CacheStore<u32> = CacheStore::new();
        let (count, callback) = counter();
        let _sub = store.subscribe("a", callback);

        store.seed("b", 1);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn write_returns_previous_and_keeps_flags() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        store.seed("posts", vec![item("p1")]);

        let previous = store.write("posts", |current| {
            let mut next = current.cloned().unwrap_or_default();
            next.push(item("p2"));
            Some(next)
        });

        assert_eq!(previous.as_deref(), Some(&vec![item("p1")]));
        let snapshot = store.read("posts");
        assert_eq!(snapshot.data(), Some(&vec![item("p1"), item("p2")]));
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_none());

        store.restore("posts", previous);
        assert_eq!(store.read("posts").data(), Some(&vec![item("p1")]));
    }

    #[tokio::test]
    async fn clear_resets_entry() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        let (count, callback) = counter();
        let _sub = store.subscribe("posts", callback);

        store.seed("posts", vec![item("p1")]);
        store.clear("posts");

        assert!(store.read("posts").is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_forgets_inflight_fetch() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Semaphore::new(0));

        store.acquire(
            "posts",
            gated_fetcher(Arc::clone(&calls), Arc::clone(&gate), vec![item("p1")]),
        );
        store.clear("posts");

        let snapshot = store.read("posts");
        assert!(!snapshot.is_loading);

        // Nothing owns the entry any more, so acquire starts a fresh fetch
        let snapshot = store.acquire("posts", failing_fetcher());
        assert!(snapshot.is_loading);

        gate.add_permits(1);
        let settled = store.settled("posts").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(settled.data(), Some(&vec![item("p1")]));
    }

    #[tokio::test]
    async fn fetch_result_applies_after_caller_unsubscribes() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        let (count, callback) = counter();
        let fetcher = || async { SyncacheResult::Ok(vec![item("c1")]) };

        let (_, subscription) = store.watch("companies", fetcher, callback);
        drop(subscription);

        let settled = store.settled("companies").await;
        assert_eq!(settled.data(), Some(&vec![item("c1")]));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn pending_write_keeps_entry_loading() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        store.seed("posts", vec![item("p1")]);

        let first = store.begin_write("posts", |_| Some(vec![item("p1"), item("tmp")]));
        let second = store.begin_write("posts", |_| Some(vec![item("tmp")]));
        assert!(store.read("posts").is_loading);

        store.abort_write("posts", second);
        assert!(store.read("posts").is_loading);
        assert_eq!(
            store.read("posts").data(),
            Some(&vec![item("p1"), item("tmp")])
        );

        store.commit_write("posts", |current| current.cloned());
        assert!(!store.read("posts").is_loading);
        assert_eq!(first.as_deref(), Some(&vec![item("p1")]));
    }

    #[test]
    fn notifications_follow_transition_order() {
        let store: CacheStore<Vec<Item>> = CacheStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let reader = store.clone();
        let _subscription = store.subscribe("posts", move || {
            let snapshot = reader.read("posts");
            let ids: Vec<String> = snapshot
                .data()
                .map(|items| items.iter().map(|i| i.id.clone()).collect())
                .unwrap_or_default();
            log.lock().push((ids, snapshot.is_loading));
        });

        store.seed("posts", vec![item("p1")]);
        let snapshot = store.begin_write("posts", |_| Some(vec![item("p1"), item("p2")]));
        store.abort_write("posts", snapshot);
        store.clear("posts");

        let p1 = vec!["p1".to_string()];
        assert_eq!(
            *seen.lock(),
            vec![
                (p1.clone(), false),
                (vec!["p1".to_string(), "p2".to_string()], true),
                (p1, false),
                (Vec::new(), false),
            ]
        );
    }
}
