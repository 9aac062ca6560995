//! Cache store: keyed entries, single-flight fetches, subscriber fan-out
//!
//! # Entry states
//!
//! | value | is_loading | error | Meaning |
//! |-------|------------|-------|---------|
//! | none | false | none | Never fetched, or cleared |
//! | any | true | none | Fetch or optimistic write outstanding |
//! | some | false | none | Fresh |
//! | any | false | some | Last fetch failed, previous value kept |
//!
//! At most one fetch is in flight per key. Every change notifies all
//! subscribers of that key before the triggering call returns.

pub mod entry;
pub mod registry;
pub mod subscription;

pub use entry::{EntrySnapshot, Settled};
pub use registry::CacheStore;
pub use subscription::{Callback, Subscription, SubscriptionId};
