//! Subscriber handles

use std::fmt;
use std::sync::Arc;

/// Observer invoked with no arguments whenever an entry changes
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Identity of one registration, unique within a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Registration handle returned by `subscribe`
///
/// Dropping the handle unsubscribes. Two registrations of the same
/// closure are independent; removal is by handle, never by callback.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: SubscriptionId,
    key: String,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriptionId,
        key: &str,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            id,
            key: key.to_string(),
            release: Some(Box::new(release)),
        }
    }

    /// Registration identity
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Key this subscription observes
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Remove the callback from its entry
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("active", &self.release.is_some())
            .finish()
    }
}
