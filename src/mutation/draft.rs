//! Record and draft contracts for optimistic mutations

use chrono::{DateTime, Utc};

/// A record stored in a cached collection, identified by a string id
pub trait Record: Clone + Send + Sync + 'static {
    /// Identifier, unique within its collection
    fn id(&self) -> &str;
}

/// Input payload for a create or update
pub trait MutationDraft: Send + Sync + 'static {
    /// Record type the draft produces
    type Record: Record;

    /// Existing record id for updates, `None` for creates
    fn id(&self) -> Option<&str>;

    /// Build the tentative record shown before the remote write completes
    ///
    /// `now` fills the creation timestamp when the draft carries none.
    fn to_optimistic(&self, id: &str, now: DateTime<Utc>) -> Self::Record;
}
