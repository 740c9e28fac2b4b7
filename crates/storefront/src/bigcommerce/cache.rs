//! Tagged response cache for public Storefront API reads.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cove_core::ProductId;
use moka::future::Cache;

const MAX_ENTRIES: u64 = 1000;

/// Groups of cached reads a mutation can invalidate together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Cart,
    Wishlists,
    Orders,
    Product(ProductId),
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cart => f.write_str("cart"),
            Self::Wishlists => f.write_str("wishlists"),
            Self::Orders => f.write_str("orders"),
            Self::Product(id) => write!(f, "product:{id}"),
        }
    }
}

#[derive(Debug)]
struct CachedResponse {
    tags: Vec<CacheTag>,
    data: serde_json::Value,
}

/// `data` payloads of GraphQL responses, keyed by operation name and variables.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<String, Arc<CachedResponse>>,
}

impl ResponseCache {
    /// Create a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();
        Self { entries }
    }

    /// Build the cache key for an operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the variables cannot be serialized.
    pub fn key<V: serde::Serialize>(
        operation_name: &str,
        variables: &V,
    ) -> Result<String, serde_json::Error> {
        Ok(format!(
            "{operation_name}:{}",
            serde_json::to_string(variables)?
        ))
    }

    /// Look up a cached payload.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.get(key).await.map(|hit| hit.data.clone())
    }

    /// Store a payload under `key`, tagged for later invalidation.
    pub async fn insert(&self, key: String, tags: Vec<CacheTag>, data: serde_json::Value) {
        self.entries
            .insert(key, Arc::new(CachedResponse { tags, data }))
            .await;
    }

    /// Invalidate every entry carrying `tag`.
    pub fn invalidate(&self, tag: CacheTag) {
        if let Err(e) = self
            .entries
            .invalidate_entries_if(move |_key, cached| cached.tags.contains(&tag))
        {
            tracing::warn!(error = %e, %tag, "Failed to register cache invalidation");
        } else {
            tracing::debug!(%tag, "Invalidated cached responses");
        }
    }

    /// Apply pending invalidations and evictions.
    pub async fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_key_includes_variables() {
        let a = ResponseCache::key("Product", &json!({"entityId": 1})).ok();
        let b = ResponseCache::key("Product", &json!({"entityId": 2})).ok();
        assert_ne!(a, b);
        assert_eq!(a.as_deref(), Some("Product:{\"entityId\":1}"));
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(CacheTag::Product(ProductId::new(77)).to_string(), "product:77");
        assert_eq!(CacheTag::Cart.to_string(), "cart");
    }

    #[tokio::test]
    async fn test_invalidate_by_tag() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache
            .insert("cart:1".into(), vec![CacheTag::Cart], json!({"a": 1}))
            .await;
        cache
            .insert(
                "product:77".into(),
                vec![CacheTag::Product(ProductId::new(77))],
                json!({"b": 2}),
            )
            .await;

        cache.invalidate(CacheTag::Cart);
        cache.run_pending_tasks().await;

        assert!(cache.get("cart:1").await.is_none());
        assert_eq!(cache.get("product:77").await, Some(json!({"b": 2})));
    }

    #[tokio::test]
    async fn test_invalidate_matches_any_of_several_tags() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let tags = vec![
            CacheTag::Product(ProductId::new(1)),
            CacheTag::Product(ProductId::new(2)),
        ];
        cache.insert("options".into(), tags, json!([])).await;

        cache.invalidate(CacheTag::Product(ProductId::new(2)));
        cache.run_pending_tasks().await;

        assert!(cache.get("options").await.is_none());
    }
}
