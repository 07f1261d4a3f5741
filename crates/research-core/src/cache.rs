//! Prompt-keyed completion cache

use crate::client::{Completer, Completion};
use async_trait::async_trait;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Caching decorator around any [`Completer`]
///
/// Successful completions are memoized by exact prompt text for a fixed
/// lifespan. Sentinel and error results always go back to the inner
/// completer on the next call.
pub struct CachedCompleter<C> {
    inner: C,
    cache: Arc<RwLock<TimedCache<String, Completion>>>,
}

impl<C: Completer> CachedCompleter<C> {
    /// Wrap `inner` with a cache whose entries live for `ttl`
    pub fn new(inner: C, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// The wrapped completer
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Drop the cached entry for a prompt
    pub async fn invalidate(&self, prompt: &str) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(&prompt.to_string());
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<C: Completer> Completer for CachedCompleter<C> {
    async fn complete_detailed(&self, prompt: &str) -> Completion {
        let key = prompt.to_string();

        if let Some(hit) = self.cache.write().await.cache_get(&key).cloned() {
            tracing::debug!(prompt_len = prompt.len(), "Cache hit");
            return hit;
        }

        tracing::debug!(prompt_len = prompt.len(), "Cache miss");
        let completion = self.inner.complete_detailed(prompt).await;

        if completion.is_success() {
            let _ = self.cache.write().await.cache_set(key, completion.clone());
        }
        completion
    }
}

impl<C> Clone for CachedCompleter<C>
where
    C: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            cache: Arc::clone(&self.cache),
        }
    }
}
