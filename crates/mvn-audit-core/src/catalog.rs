//! Catalog boundary: search results, the lookup contract, and the per-run
//! read-through cache.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::error::Result;

/// One published coordinate returned by a catalog lookup.
///
/// The lookup is a fuzzy prefix search: results carry no ordering guarantee
/// and may include unrelated artifacts that the matcher must discard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCandidate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl CatalogCandidate {
    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

/// External catalog lookup.
///
/// `query` is a `groupId:artifactId:` prefix; `limit` caps the result count.
/// Implementations may surface transient failures as errors or as an empty
/// candidate list; the audit loop treats both as "no finding possible" for
/// the declaration at hand.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<CatalogCandidate>>;
}

/// Read-through candidate cache keyed by `(groupId, artifactId)`.
///
/// Scoped to a single audit pass: lookups are pure queries, so rerunning an
/// audit with a fresh cache reproduces the same findings. Never persisted
/// across runs.
#[derive(Default)]
pub struct CatalogCache {
    entries: DashMap<(String, String), Arc<Vec<CatalogCandidate>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached candidates for a coordinate, querying the catalog
    /// on first use.
    pub async fn get_or_fetch<C>(
        &self,
        catalog: &C,
        group_id: &str,
        artifact_id: &str,
        limit: usize,
    ) -> Result<Arc<Vec<CatalogCandidate>>>
    where
        C: CatalogSearch + ?Sized,
    {
        let key = (group_id.to_string(), artifact_id.to_string());
        if let Some(hit) = self.entries.get(&key) {
            debug!(group_id, artifact_id, "catalog cache hit");
            return Ok(Arc::clone(&hit));
        }

        let query = format!("{group_id}:{artifact_id}:");
        let candidates = Arc::new(catalog.search(&query, limit).await?);
        self.entries.insert(key, Arc::clone(&candidates));
        Ok(candidates)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingCatalog {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CatalogSearch for CountingCatalog {
        async fn search(&self, query: &str, _limit: usize) -> Result<Vec<CatalogCandidate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(query.ends_with(':'));
            Ok(vec![CatalogCandidate {
                group_id: "junit".into(),
                artifact_id: "junit".into(),
                version: "4.13.2".into(),
            }])
        }
    }

    #[tokio::test]
    async fn test_read_through_caches_per_coordinate() {
        let catalog = CountingCatalog {
            calls: AtomicUsize::new(0),
        };
        let cache = CatalogCache::new();

        let first = cache
            .get_or_fetch(&catalog, "junit", "junit", 1000)
            .await
            .unwrap();
        let second = cache
            .get_or_fetch(&catalog, "junit", "junit", 1000)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_distinct_coordinates_query_separately() {
        let catalog = CountingCatalog {
            calls: AtomicUsize::new(0),
        };
        let cache = CatalogCache::new();

        cache
            .get_or_fetch(&catalog, "junit", "junit", 1000)
            .await
            .unwrap();
        cache
            .get_or_fetch(&catalog, "org.slf4j", "slf4j-api", 1000)
            .await
            .unwrap();

        assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_candidate_coordinate() {
        let c = CatalogCandidate {
            group_id: "com.google.guava".into(),
            artifact_id: "guava".into(),
            version: "33.0.0-jre".into(),
        };
        assert_eq!(c.coordinate(), "com.google.guava:guava");
    }
}
