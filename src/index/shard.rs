use crate::config::{IndexConfig, SearchConfig, ShardLocation};
use crate::error::{Result, ShardwiseError};
use crate::index::document::{DocumentConverter, ProjectedDocument, Projector};
use crate::index::schema::ShardSchema;
use crate::query::executor::{QueryExecutor, Window};
use crate::query::{fuzzy, QueryBuilder, QueryTree, SearchContext};
use crate::tokenizer::AnalyzerRegistry;
use crate::types::{Document, SearchResult};
use std::sync::{Mutex, MutexGuard};
use tantivy::collector::Count;
use tantivy::directory::MmapDirectory;
use tantivy::query::TermQuery;
use tantivy::schema::IndexRecordOption;
use tantivy::{IndexReader, IndexWriter, ReloadPolicy, Term};

/// One independently stored partition of the document collection.
///
/// Writes are serialized through the shard's single writer; every write
/// commits before returning and the reader is reloaded under the same lock,
/// so a search issued after a write returns sees it.
pub struct Shard {
    id: usize,
    location: ShardLocation,
    index: tantivy::Index,
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    projector: Projector,
    converter: DocumentConverter,
}

impl Shard {
    /// Open shard `id` of the index described by `config`, creating its
    /// storage if needed.
    pub fn open(id: usize, config: &IndexConfig) -> Result<Self> {
        let schema = ShardSchema::new(AnalyzerRegistry::new(&config.analyzer_config));
        let location = config.shard_location(id);

        let index = match &location {
            ShardLocation::InMemory => tantivy::Index::create_in_ram(schema.tantivy_schema()),
            ShardLocation::Directory(path) => {
                std::fs::create_dir_all(path)?;
                let dir = MmapDirectory::open(path)?;
                tantivy::Index::open_or_create(dir, schema.tantivy_schema())?
            }
        };
        schema.register_tokenizers(&index);

        let writer: IndexWriter = index.writer_with_num_threads(1, config.writer_buffer_bytes)?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        let shard = Shard {
            id,
            location,
            index,
            reader,
            writer: Mutex::new(writer),
            projector: Projector::new(&config.id_field, &config.store_fields),
            converter: DocumentConverter::new(schema, &config.id_field),
        };
        tracing::info!(
            "Opened shard {} ({:?}) with {} documents",
            id,
            shard.location,
            shard.num_docs()
        );
        Ok(shard)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn location(&self) -> &ShardLocation {
        &self.location
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    fn lock_writer(&self) -> Result<MutexGuard<'_, IndexWriter>> {
        self.writer
            .lock()
            .map_err(|_| ShardwiseError::Internal(format!("shard {} writer lock poisoned", self.id)))
    }

    fn id_term(&self, id: &str) -> Term {
        Term::from_field_text(self.converter.schema().id_field(), id)
    }

    /// Stage the projected documents as insert-or-replace and commit. On an
    /// engine failure the uncommitted batch is rolled back.
    fn write_batch(&self, writer: &mut IndexWriter, docs: &[ProjectedDocument]) -> Result<()> {
        let staged: Result<()> = docs.iter().try_for_each(|doc| {
            writer.delete_term(self.id_term(&doc.id));
            writer.add_document(self.converter.to_tantivy(doc))?;
            Ok(())
        });
        let committed = staged.and_then(|_| writer.commit().map(|_| ()).map_err(Into::into));
        if let Err(e) = committed {
            if let Err(rollback_err) = writer.rollback() {
                tracing::warn!("Shard {} rollback failed: {}", self.id, rollback_err);
            }
            return Err(e);
        }
        self.reader.reload()?;
        Ok(())
    }

    /// Insert or replace a batch of documents.
    ///
    /// Every document is projected before anything is written, so a bad item
    /// (reported as [`ShardwiseError::BatchItem`]) leaves the shard unchanged.
    pub fn batch_insert(&self, docs: &[Document]) -> Result<()> {
        let projected = docs
            .iter()
            .enumerate()
            .map(|(i, doc)| {
                self.projector
                    .project(doc)
                    .map_err(|e| ShardwiseError::at_index(i, e))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut writer = self.lock_writer()?;
        self.write_batch(&mut writer, &projected)?;
        tracing::debug!("Shard {} inserted {} documents", self.id, projected.len());
        Ok(())
    }

    /// Replace the document stored under `id`.
    ///
    /// Fails with [`ShardwiseError::NotFound`] if `id` is not present and with
    /// [`ShardwiseError::InvalidDocument`] if `doc` carries a different id.
    pub fn update(&self, id: &str, doc: &Document) -> Result<()> {
        let projected = self.projector.project(doc)?;
        if projected.id != id {
            return Err(ShardwiseError::InvalidDocument(format!(
                "document id {:?} does not match {:?}",
                projected.id, id
            )));
        }

        let mut writer = self.lock_writer()?;
        if !self.contains(id)? {
            return Err(ShardwiseError::NotFound(id.to_string()));
        }
        self.write_batch(&mut writer, std::slice::from_ref(&projected))?;
        tracing::debug!("Shard {} updated {}", self.id, id);
        Ok(())
    }

    /// Delete documents by id. Unknown ids are ignored.
    pub fn batch_delete(&self, ids: &[String]) -> Result<()> {
        let mut writer = self.lock_writer()?;
        for id in ids {
            writer.delete_term(self.id_term(id));
        }
        if let Err(e) = writer.commit() {
            if let Err(rollback_err) = writer.rollback() {
                tracing::warn!("Shard {} rollback failed: {}", self.id, rollback_err);
            }
            return Err(e.into());
        }
        self.reader.reload()?;
        tracing::debug!("Shard {} deleted {} ids", self.id, ids.len());
        Ok(())
    }

    pub fn contains(&self, id: &str) -> Result<bool> {
        let query = TermQuery::new(self.id_term(id), IndexRecordOption::Basic);
        Ok(self.reader.searcher().search(&query, &Count)? > 0)
    }

    /// Search this shard alone, paginated by `config.from` / `config.limit`.
    pub fn search(&self, query: &str, config: &SearchConfig) -> Result<SearchResult> {
        self.search_with_context(
            query,
            config,
            &SearchContext::default(),
            Window::new(config.from, config.limit),
        )
    }

    pub fn search_with_context(
        &self,
        query: &str,
        config: &SearchConfig,
        context: &SearchContext,
        window: Window,
    ) -> Result<SearchResult> {
        let tree = if config.analyzer_config.is_empty() {
            QueryBuilder::new(config, self.converter.schema().registry()).build(query)
        } else {
            let registry = AnalyzerRegistry::new(&config.analyzer_config);
            QueryBuilder::new(config, &registry).build(query)
        };
        self.search_tree(query, &tree, config, context, window)
    }

    /// Execute an already built query tree against the latest committed state.
    pub fn search_tree(
        &self,
        query: &str,
        tree: &QueryTree,
        config: &SearchConfig,
        context: &SearchContext,
        window: Window,
    ) -> Result<SearchResult> {
        let compiled = fuzzy::compile(tree, self.converter.schema());
        let searcher = self.reader.searcher();
        let result = QueryExecutor::new(&searcher, &self.converter, config, context)
            .execute(query, compiled.as_ref(), window)?;
        tracing::debug!(
            "Shard {} search {:?}: {} matches, {} hits in {:?}",
            self.id,
            query,
            result.hit_number,
            result.hits.len(),
            result.duration
        );
        Ok(result)
    }

    /// Close the shard and delete its storage.
    pub fn purge(self) -> Result<()> {
        let Shard {
            id,
            location,
            index,
            reader,
            writer,
            ..
        } = self;

        let writer = writer
            .into_inner()
            .map_err(|_| ShardwiseError::Internal(format!("shard {} writer lock poisoned", id)))?;
        writer.wait_merging_threads()?;
        drop(reader);
        drop(index);

        if let ShardLocation::Directory(path) = &location {
            if path.exists() {
                std::fs::remove_dir_all(path)?;
            }
        }
        tracing::debug!("Purged shard {}", id);
        Ok(())
    }
}
