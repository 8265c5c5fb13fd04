use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::generator::GenerationError;
use crate::metrics::{CACHE_HITS, CACHE_MISSES, CACHE_SIZE};
use crate::models::{StoryRequest, StoryResponse};
use crate::validator::{self, ValidationError};
use crate::worker::GenerationPool;

#[derive(Debug, Error)]
pub enum HandleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Request-handling core: validation, cache lookup, generation, cache
/// insert. Stateless between calls; all state lives in the cache store.
pub struct StoryService {
    cache: CacheStore,
    pool: GenerationPool,
}

impl StoryService {
    pub fn new(cache: CacheStore, pool: GenerationPool) -> Self {
        Self { cache, pool }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Turn a raw request into either a cached or freshly generated
    /// storyline. Invalid requests are rejected before any cache or
    /// generator interaction; failed generations are never cached.
    pub async fn handle(
        &self,
        raw: &StoryRequest,
        now: DateTime<Utc>,
    ) -> Result<StoryResponse, HandleError> {
        let evicted = self.cache.evict_expired(now);
        if evicted > 0 {
            debug!(evicted, "evicted expired cache entries");
        }

        let request = validator::validate(raw)?;
        let key = CacheStore::key_for(request.genre(), request.runtime(), request.character_count());

        if let Some(entry) = self.cache.lookup(&key, now) {
            CACHE_HITS.inc();
            debug!(genre = request.genre(), "cache hit");
            // generated_at reports serve time even on a hit; the stored
            // created_at only drives TTL accounting
            return Ok(StoryResponse {
                storyline: entry.storyline,
                generated_at: now,
                cache_hit: true,
            });
        }

        CACHE_MISSES.inc();
        info!(
            genre = request.genre(),
            runtime = request.runtime(),
            character_count = request.character_count(),
            "generating storyline"
        );

        let storyline = self.pool.generate(request.prompt()).await?;
        self.cache.insert(key, storyline.clone(), now);
        CACHE_SIZE.set(self.cache.len() as f64);

        Ok(StoryResponse {
            storyline,
            generated_at: now,
            cache_hit: false,
        })
    }
}
