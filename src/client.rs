//! Dashboard client wiring the cache stores to the simulated remote

use crate::config::Config;
use crate::domain::{Company, Country, Post, PostDraft};
use crate::error::{SyncacheError, SyncacheResult};
use crate::mutation::MutationCoordinator;
use crate::remote::{Fetcher, LatencyProfile, SimulatedBackend};
use crate::store::{CacheStore, EntrySnapshot};
use std::sync::Arc;
use tracing::debug;

/// Cache key of the countries collection
pub const COUNTRIES: &str = "countries";
/// Cache key of the companies collection
pub const COMPANIES: &str = "companies";
/// Cache key of the posts collection
pub const POSTS: &str = "posts";

/// Coordinator for optimistic post edits
pub type PostMutations = MutationCoordinator<PostDraft, SimulatedBackend>;

/// One store per collection type, backed by a shared remote
#[derive(Clone)]
pub struct DashboardClient {
    backend: SimulatedBackend,
    countries: CacheStore<Vec<Country>>,
    companies: CacheStore<Vec<Company>>,
    posts: CacheStore<Vec<Post>>,
    temp_id_prefix: String,
}

impl DashboardClient {
    /// Create a client over an existing backend
    pub fn new(backend: SimulatedBackend, config: &Config) -> Self {
        Self {
            backend,
            countries: CacheStore::new(),
            companies: CacheStore::new(),
            posts: CacheStore::new(),
            temp_id_prefix: config.mutation.temp_id_prefix.clone(),
        }
    }

    /// Create a client and backend from configuration
    pub fn from_config(config: &Config) -> Self {
        let profile = LatencyProfile::from_config(&config.remote);
        debug!(
            "Simulated remote: {:?}..{:?} latency, failure rate {}",
            profile.min_latency, profile.max_latency, profile.failure_rate
        );
        Self::new(SimulatedBackend::new(profile), config)
    }

    pub fn backend(&self) -> &SimulatedBackend {
        &self.backend
    }

    pub fn countries(&self) -> &CacheStore<Vec<Country>> {
        &self.countries
    }

    pub fn companies(&self) -> &CacheStore<Vec<Company>> {
        &self.companies
    }

    pub fn posts(&self) -> &CacheStore<Vec<Post>> {
        &self.posts
    }

    pub fn acquire_countries(&self) -> EntrySnapshot<Vec<Country>> {
        self.countries
            .acquire(COUNTRIES, self.backend.countries_fetcher())
    }

    pub fn acquire_companies(&self) -> EntrySnapshot<Vec<Company>> {
        self.companies
            .acquire(COMPANIES, self.backend.companies_fetcher())
    }

    pub fn acquire_posts(&self) -> EntrySnapshot<Vec<Post>> {
        self.posts.acquire(POSTS, self.backend.posts_fetcher())
    }

    /// Acquire countries and wait for the value
    pub async fn load_countries(&self) -> SyncacheResult<Arc<Vec<Country>>> {
        load(&self.countries, COUNTRIES, self.backend.countries_fetcher()).await
    }

    /// Acquire companies and wait for the value
    pub async fn load_companies(&self) -> SyncacheResult<Arc<Vec<Company>>> {
        load(&self.companies, COMPANIES, self.backend.companies_fetcher()).await
    }

    /// Acquire posts and wait for the value
    pub async fn load_posts(&self) -> SyncacheResult<Arc<Vec<Post>>> {
        load(&self.posts, POSTS, self.backend.posts_fetcher()).await
    }

    /// Optimistic mutations against the posts collection
    pub fn post_mutations(&self) -> PostMutations {
        MutationCoordinator::new(self.posts.clone(), POSTS, self.backend.clone())
            .with_temp_id_prefix(self.temp_id_prefix.clone())
    }
}

async fn load<V, F>(store: &CacheStore<V>, key: &str, fetcher: F) -> SyncacheResult<Arc<V>>
where
    V: Send + Sync + 'static,
    F: Fetcher<V> + 'static,
{
    store.acquire(key, fetcher);
    let snapshot = store.settled(key).await;
    match (snapshot.value, snapshot.error) {
        (Some(value), _) => Ok(value),
        (None, Some(message)) => Err(SyncacheError::Fetch {
            key: key.to_string(),
            message,
        }),
        (None, None) => Err(SyncacheError::Internal(format!(
            "{} settled without a value",
            key
        ))),
    }
}
