//! Remote collaborator contracts
//!
//! The cache never performs I/O itself. Reads go through a [`Fetcher`]
//! supplied per key, writes go through a [`RemoteWriter`] owned by a
//! mutation coordinator. [`SimulatedBackend`] implements both against an
//! in-memory dataset with artificial latency and random failure.

pub mod simulated;

pub use simulated::{LatencyProfile, SimulatedBackend, NETWORK_FAILURE};

use crate::error::SyncacheResult;
use crate::mutation::MutationDraft;
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::future::Future;

/// Boxed future returned by a [`Fetcher`]
pub type FetchFuture<V> = BoxFuture<'static, SyncacheResult<V>>;

/// Zero-argument asynchronous read of one remote resource
///
/// Any `Fn() -> impl Future<Output = SyncacheResult<V>>` closure is a fetcher.
pub trait Fetcher<V>: Send + Sync {
    /// Start one read of the resource
    fn fetch(&self) -> FetchFuture<V>;
}

impl<V, F, Fut> Fetcher<V> for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = SyncacheResult<V>> + Send + 'static,
{
    fn fetch(&self) -> FetchFuture<V> {
        Box::pin((self)())
    }
}

/// Remote create/update/delete operations for one collection
#[async_trait]
pub trait RemoteWriter<D: MutationDraft>: Send + Sync {
    /// Create or update a record, returning the authoritative version
    async fn upsert(&self, draft: &D) -> SyncacheResult<D::Record>;

    /// Delete a record by id
    async fn delete(&self, id: &str) -> SyncacheResult<()>;
}
