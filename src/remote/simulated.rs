//! In-memory remote with artificial latency and random failure

use crate::config::RemoteConfig;
use crate::domain::{seed, Company, Country, Post, PostDraft};
use crate::error::{SyncacheError, SyncacheResult};
use crate::remote::{Fetcher, RemoteWriter};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Message of every injected transport failure
pub const NETWORK_FAILURE: &str = "Network request failed";

/// Per-request latency range and failure probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyProfile {
    pub min_latency: Duration,
    pub max_latency: Duration,
    /// Probability in [0, 1] that a request fails
    pub failure_rate: f64,
}

impl LatencyProfile {
    /// No latency, never fails
    pub fn instant() -> Self {
        Self {
            min_latency: Duration::ZERO,
            max_latency: Duration::ZERO,
            failure_rate: 0.0,
        }
    }

    /// No latency, always fails
    pub fn failing() -> Self {
        Self {
            failure_rate: 1.0,
            ..Self::instant()
        }
    }

    /// Build from the `[remote]` config section
    pub fn from_config(config: &RemoteConfig) -> Self {
        Self {
            min_latency: Duration::from_millis(config.min_latency_ms),
            max_latency: Duration::from_millis(config.max_latency_ms.max(config.min_latency_ms)),
            failure_rate: config.failure_rate,
        }
    }

    /// Override the failure probability
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate;
        self
    }

    /// Draw one request's latency and outcome
    fn roll(&self) -> (Duration, bool) {
        let mut rng = rand::thread_rng();
        let latency = if self.max_latency > self.min_latency {
            let min = self.min_latency.as_millis() as u64;
            let max = self.max_latency.as_millis() as u64;
            Duration::from_millis(rng.gen_range(min..=max))
        } else {
            self.min_latency
        };
        let fails = rng.gen_bool(self.failure_rate.clamp(0.0, 1.0));
        (latency, fails)
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self::from_config(&RemoteConfig::default())
    }
}

#[derive(Debug)]
struct Dataset {
    countries: Vec<Country>,
    companies: Vec<Company>,
    posts: Vec<Post>,
}

impl Dataset {
    fn seeded() -> Self {
        Self {
            countries: seed::countries(),
            companies: seed::companies(),
            posts: seed::posts(),
        }
    }
}

/// Simulated remote backing the dashboard collections
///
/// Clones share the same dataset. Writes are applied before the simulated
/// transport runs and reverted if it fails, so a failed call leaves the
/// remote unchanged.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    profile: LatencyProfile,
    data: Arc<Mutex<Dataset>>,
}

impl SimulatedBackend {
    /// Create a backend holding the seed dataset
    pub fn new(profile: LatencyProfile) -> Self {
        Self {
            profile,
            data: Arc::new(Mutex::new(Dataset::seeded())),
        }
    }

    /// Latency profile applied to every request
    pub fn profile(&self) -> LatencyProfile {
        self.profile
    }

    /// Restore the seed dataset
    pub fn reset(&self) {
        *self.data.lock() = Dataset::seeded();
        debug!("Simulated remote reset to seed data");
    }

    /// Wait out the request latency, then fail or succeed
    async fn transport(&self) -> SyncacheResult<()> {
        let (latency, fails) = self.profile.roll();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if fails {
            debug!("Injected failure after {:?}", latency);
            return Err(SyncacheError::remote(NETWORK_FAILURE));
        }
        Ok(())
    }

    pub async fn fetch_countries(&self) -> SyncacheResult<Vec<Country>> {
        self.transport().await?;
        Ok(self.data.lock().countries.clone())
    }

    pub async fn fetch_companies(&self) -> SyncacheResult<Vec<Company>> {
        self.transport().await?;
        Ok(self.data.lock().companies.clone())
    }

    pub async fn fetch_posts(&self) -> SyncacheResult<Vec<Post>> {
        self.transport().await?;
        Ok(self.data.lock().posts.clone())
    }

    /// Create or update a post
    ///
    /// Creates get a `p-<uuid>` id unless the draft names one. An existing
    /// post keeps its `created_at` when the draft carries none.
    pub async fn upsert_post(&self, draft: &PostDraft) -> SyncacheResult<Post> {
        let (saved, previous) = {
            let mut data = self.data.lock();
            let existing = draft
                .id
                .as_deref()
                .and_then(|id| data.posts.iter().position(|post| post.id == id));
            let previous = existing.map(|index| data.posts[index].clone());

            let saved = Post {
                id: draft
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("p-{}", Uuid::new_v4())),
                title: draft.title.clone(),
                resource_uid: draft.resource_uid.clone(),
                date_time: draft.date_time.clone(),
                content: draft.content.clone(),
                author: draft.author.clone(),
                created_at: draft
                    .created_at
                    .or_else(|| previous.as_ref().map(|post| post.created_at))
                    .unwrap_or_else(Utc::now),
            };

            match existing {
                Some(index) => data.posts[index] = saved.clone(),
                None => data.posts.push(saved.clone()),
            }
            (saved, previous)
        };

        if let Err(err) = self.transport().await {
            let mut data = self.data.lock();
            match previous {
                Some(previous) => {
                    if let Some(slot) = data.posts.iter_mut().find(|post| post.id == previous.id) {
                        *slot = previous;
                    }
                }
                None => data.posts.retain(|post| post.id != saved.id),
            }
            return Err(err);
        }

        debug!("Remote saved post {}", saved.id);
        Ok(saved)
    }

    /// Delete a post; deleting an unknown id succeeds
    pub async fn delete_post(&self, id: &str) -> SyncacheResult<()> {
        let snapshot = {
            let mut data = self.data.lock();
            let snapshot = data.posts.clone();
            data.posts.retain(|post| post.id != id);
            snapshot
        };

        if let Err(err) = self.transport().await {
            self.data.lock().posts = snapshot;
            return Err(err);
        }

        debug!("Remote deleted post {}", id);
        Ok(())
    }

    /// Fetcher for the countries collection
    pub fn countries_fetcher(&self) -> impl Fetcher<Vec<Country>> + 'static {
        let backend = self.clone();
        move || {
            let backend = backend.clone();
            async move { backend.fetch_countries().await }
        }
    }

    /// Fetcher for the companies collection
    pub fn companies_fetcher(&self) -> impl Fetcher<Vec<Company>> + 'static {
        let backend = self.clone();
        move || {
            let backend = backend.clone();
            async move { backend.fetch_companies().await }
        }
    }

    /// Fetcher for the posts collection
    pub fn posts_fetcher(&self) -> impl Fetcher<Vec<Post>> + 'static {
        let backend = self.clone();
        move || {
            let backend = backend.clone();
            async move { backend.fetch_posts().await }
        }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(LatencyProfile::default())
    }
}

#[async_trait]
impl RemoteWriter<PostDraft> for SimulatedBackend {
    async fn upsert(&self, draft: &PostDraft) -> SyncacheResult<Post> {
        self.upsert_post(draft).await
    }

    async fn delete(&self, id: &str) -> SyncacheResult<()> {
        self.delete_post(id).await
    }
}
