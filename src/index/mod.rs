pub mod document;
pub mod fanout;
pub mod router;
pub mod schema;
pub mod shard;

use crate::config::{IndexConfig, SearchConfig};
use crate::error::{Result, ShardwiseError};
use crate::query::executor::Window;
use crate::query::merge::{merge_results, paginate};
use crate::query::{QueryBuilder, SearchContext};
use crate::tokenizer::AnalyzerRegistry;
use crate::types::{Document, DocumentId, SearchResult};
use indexmap::IndexMap;
use shard::Shard;
use std::sync::Arc;
use std::time::Instant;

/// A logical index partitioned across a fixed number of shards.
///
/// Writes are routed by `xxhash64(id) % shard_count`; searches run on every
/// shard concurrently and are merged into a single ranking. Multi-shard
/// writes are atomic per shard only: if one shard fails, the others keep
/// what they wrote and the first error is returned.
///
/// # Examples
///
/// ```rust,no_run
/// use shardwise::{Document, Index, IndexConfig, SearchConfig};
/// use serde_json::json;
///
/// # async fn run() -> shardwise::Result<()> {
/// let index = Index::open(IndexConfig {
///     shard_count: 4,
///     store_fields: vec!["name".to_string()],
///     ..IndexConfig::default()
/// })?;
/// index
///     .insert(vec![Document::from_json(&json!({"id": "1", "name": "Red lamp"}))?])
///     .await?;
///
/// let config = SearchConfig {
///     limit: 10,
///     return_fields: vec!["name".to_string()],
///     ..SearchConfig::default()
/// };
/// let result = index.search("lamp", &config).await?;
/// assert_eq!(result.hits[0].id, "1");
/// # Ok(())
/// # }
/// ```
pub struct Index {
    config: IndexConfig,
    shards: Vec<Arc<Shard>>,
    registry: AnalyzerRegistry,
}

impl Index {
    /// Validate `config` and open (or create) every shard.
    pub fn open(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        let shards = (0..config.shard_count)
            .map(|id| Shard::open(id, &config).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        let registry = AnalyzerRegistry::new(&config.analyzer_config);
        tracing::info!(
            "Opened index with {} shards (id field {:?})",
            shards.len(),
            config.id_field
        );
        Ok(Index {
            config,
            shards,
            registry,
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    pub fn shards(&self) -> &[Arc<Shard>] {
        &self.shards
    }

    /// Total documents across all shards.
    pub fn doc_count(&self) -> u64 {
        self.shards.iter().map(|s| s.num_docs()).sum()
    }

    /// Resolve ids up front and drop duplicates, keeping the last occurrence
    /// of an id at the position of its first.
    fn dedupe(&self, docs: Vec<Document>) -> Result<Vec<(DocumentId, Document)>> {
        let mut unique: IndexMap<DocumentId, Document> = IndexMap::with_capacity(docs.len());
        for (i, doc) in docs.into_iter().enumerate() {
            let id = doc
                .id(&self.config.id_field)
                .map_err(|e| ShardwiseError::at_index(i, e))?;
            unique.insert(id, doc);
        }
        Ok(unique.into_iter().collect())
    }

    /// Insert or replace documents.
    ///
    /// A document without a usable id fails the whole call before any shard
    /// is written.
    pub async fn insert(&self, docs: Vec<Document>) -> Result<()> {
        let start = Instant::now();
        let total = docs.len();
        let unique = self.dedupe(docs)?;
        let buckets = router::partition(self.shards.len(), unique, |(id, _)| id.as_str());

        let tasks = self
            .shards
            .iter()
            .zip(buckets)
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(shard, bucket)| {
                let shard = Arc::clone(shard);
                let docs: Vec<Document> = bucket.into_iter().map(|(_, doc)| doc).collect();
                move || shard.batch_insert(&docs)
            });
        fanout::join_all(tasks).await?;

        tracing::debug!("Inserted {} documents in {:?}", total, start.elapsed());
        Ok(())
    }

    /// Replace an existing document. Fails with [`ShardwiseError::NotFound`]
    /// if its id is not indexed.
    pub async fn update(&self, doc: Document) -> Result<()> {
        let id = doc.id(&self.config.id_field)?;
        let shard = Arc::clone(&self.shards[router::shard_of(self.shards.len(), &id)]);
        tokio::task::spawn_blocking(move || shard.update(&id, &doc)).await?
    }

    /// Update each document, inserting the ones that do not exist yet.
    ///
    /// Not atomic: updates that succeeded stay applied if a later step fails.
    /// The first non-`NotFound` update error is returned after the inserts
    /// have run.
    pub async fn upsert(&self, docs: Vec<Document>) -> Result<()> {
        let mut missing = Vec::new();
        let mut first_error = None;
        for (i, doc) in docs.into_iter().enumerate() {
            match self.update(doc.clone()).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => missing.push(doc),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(ShardwiseError::at_index(i, e));
                    }
                }
            }
        }

        if !missing.is_empty() {
            tracing::debug!("Upsert inserting {} new documents", missing.len());
            self.insert(missing).await?;
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Delete documents by id. Unknown ids are ignored.
    pub async fn delete(&self, ids: Vec<String>) -> Result<()> {
        let total = ids.len();
        let buckets = router::partition(self.shards.len(), ids, |id| id.as_str());
        let tasks = self
            .shards
            .iter()
            .zip(buckets)
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(shard, bucket)| {
                let shard = Arc::clone(shard);
                move || shard.batch_delete(&bucket)
            });
        fanout::join_all(tasks).await?;
        tracing::debug!("Deleted {} ids", total);
        Ok(())
    }

    pub async fn search(&self, query: &str, config: &SearchConfig) -> Result<SearchResult> {
        self.search_with_context(query, config, SearchContext::default())
            .await
    }

    /// Search every shard concurrently and merge the results.
    ///
    /// Each shard returns its top `from + limit` matches after applying the
    /// score thresholds against its own best score; the merged ranking is
    /// then cut to the requested page. Any shard failure, including
    /// cancellation through `context`, fails the whole search.
    pub async fn search_with_context(
        &self,
        query: &str,
        config: &SearchConfig,
        context: SearchContext,
    ) -> Result<SearchResult> {
        let start = Instant::now();
        config.validate()?;

        let tree = if config.analyzer_config.is_empty() {
            QueryBuilder::new(config, &self.registry).build(query)
        } else {
            let registry = AnalyzerRegistry::new(&config.analyzer_config);
            QueryBuilder::new(config, &registry).build(query)
        };
        let tree = Arc::new(tree);
        let shared_config = Arc::new(config.clone());
        let window = Window::prefix_of(config);

        let tasks = self.shards.iter().map(|shard| {
            let shard = Arc::clone(shard);
            let tree = Arc::clone(&tree);
            let config = Arc::clone(&shared_config);
            let context = context.clone();
            let query = query.to_string();
            move || shard.search_tree(&query, &tree, &config, &context, window)
        });
        let results = fanout::join_all(tasks).await?;

        let mut merged = merge_results(query, results);
        paginate(&mut merged, config.from, config.limit);
        merged.duration = start.elapsed();
        tracing::debug!(
            "Search {:?}: {} matches across {} shards in {:?}",
            query,
            merged.hit_number,
            self.shards.len(),
            merged.duration
        );
        Ok(merged)
    }

    /// Close every shard and delete its storage. Failures are logged and the
    /// remaining shards are still purged.
    pub fn purge(self) {
        for shard in self.shards {
            let id = shard.id();
            match Arc::try_unwrap(shard) {
                Ok(shard) => {
                    if let Err(e) = shard.purge() {
                        tracing::warn!("Failed to purge shard {}: {}", id, e);
                    }
                }
                Err(_) => {
                    tracing::warn!("Failed to purge shard {}: still in use", id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        Document::from_json(&value).unwrap()
    }

    fn index(shards: usize) -> Index {
        Index::open(IndexConfig {
            shard_count: shards,
            store_fields: vec!["*".to_string()],
            ..IndexConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn rejects_zero_shards() {
        let result = Index::open(IndexConfig {
            shard_count: 0,
            ..IndexConfig::default()
        });
        assert!(matches!(result, Err(ShardwiseError::Config(_))));
    }

    #[tokio::test]
    async fn dedupe_keeps_last_value() {
        let index = index(3);
        index
            .insert(vec![
                doc(json!({"id": "a", "name": "first"})),
                doc(json!({"id": "b", "name": "other"})),
                doc(json!({"id": "a", "name": "second"})),
            ])
            .await
            .unwrap();

        assert_eq!(index.doc_count(), 2);
        let result = index.search("second", &SearchConfig::default()).await.unwrap();
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.hits[0].id, "a");
        assert_eq!(index.search("first", &SearchConfig::default()).await.unwrap().hit_number, 0);
    }

    #[tokio::test]
    async fn missing_id_writes_nothing() {
        let index = index(2);
        let err = index
            .insert(vec![doc(json!({"id": "a"})), doc(json!({"name": "x"}))])
            .await
            .unwrap_err();
        assert!(matches!(err, ShardwiseError::BatchItem { index: 1, .. }));
        assert_eq!(index.doc_count(), 0);
    }

    #[tokio::test]
    async fn documents_land_on_routed_shard() {
        let index = index(4);
        let ids: Vec<String> = (0..40).map(|i| format!("id-{}", i)).collect();
        index
            .insert(ids.iter().map(|id| doc(json!({"id": id}))).collect())
            .await
            .unwrap();
        for id in &ids {
            let owner = router::shard_of(4, id);
            for shard in index.shards() {
                assert_eq!(shard.contains(id).unwrap(), shard.id() == owner);
            }
        }
    }
}
