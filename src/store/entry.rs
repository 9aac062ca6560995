//! Per-key cache entry state

use crate::remote::Fetcher;
use crate::store::subscription::{Callback, SubscriptionId};
use futures_util::future::{BoxFuture, Shared};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Handle that resolves once a fetch has been applied to its entry
pub type Settled = Shared<BoxFuture<'static, ()>>;

/// Point-in-time view of an entry
///
/// This is what subscribers and readers see: the last known value, whether
/// a fetch is outstanding, and the last fetch failure message.
#[derive(Debug, PartialEq)]
pub struct EntrySnapshot<V> {
    /// Last known value, absent if never fetched or seeded
    pub value: Option<Arc<V>>,

    /// True while a fetch or an optimistic mutation is outstanding
    pub is_loading: bool,

    /// Last fetch failure, cleared by the next successful state
    pub error: Option<String>,
}

impl<V> EntrySnapshot<V> {
    /// Snapshot of an entry that was never accessed
    pub fn empty() -> Self {
        Self {
            value: None,
            is_loading: false,
            error: None,
        }
    }

    /// Borrow the value, if any
    pub fn data(&self) -> Option<&V> {
        self.value.as_deref()
    }

    /// True when the value is absent, nothing is loading and no error is recorded
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && !self.is_loading && self.error.is_none()
    }
}

impl<V> Clone for EntrySnapshot<V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }
}

impl<V> Default for EntrySnapshot<V> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Fetch currently owning an entry's loading state
pub(crate) struct InFlight {
    /// Store-wide fetch sequence number
    pub(crate) seq: u64,
    pub(crate) settled: Settled,
}

/// Mutable state behind one key
pub(crate) struct Entry<V> {
    pub(crate) value: Option<Arc<V>>,
    pub(crate) is_loading: bool,
    pub(crate) error: Option<String>,
    pub(crate) subscribers: BTreeMap<SubscriptionId, Callback>,
    pub(crate) fetcher: Option<Arc<dyn Fetcher<V>>>,
    pub(crate) inflight: Option<InFlight>,
    /// Optimistic mutations awaiting their remote write
    pub(crate) writes: usize,
}

impl<V> Entry<V> {
    pub(crate) fn new() -> Self {
        Self {
            value: None,
            is_loading: false,
            error: None,
            subscribers: BTreeMap::new(),
            fetcher: None,
            inflight: None,
            writes: 0,
        }
    }

    /// Loading while a fetch or a mutation write is outstanding
    pub(crate) fn refresh_loading(&mut self) {
        self.is_loading = self.inflight.is_some() || self.writes > 0;
    }

    pub(crate) fn snapshot(&self) -> EntrySnapshot<V> {
        EntrySnapshot {
            value: self.value.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
        }
    }

    /// Callbacks to invoke once the store lock is released
    pub(crate) fn listeners(&self) -> Vec<Callback> {
        self.subscribers.values().cloned().collect()
    }
}
