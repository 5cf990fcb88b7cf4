//! # Shardwise
//!
//! An embeddable full-text search library that splits one logical index into
//! a fixed number of shards. Documents are routed to a shard by hashing their
//! id; searches run on all shards concurrently and are merged into a single
//! ranking. Built on [Tantivy](https://github.com/quickwit-oss/tantivy).
//!
//! Text analysis is configurable per field: a character tokenizer followed by
//! a chain of filters (lowercase, compound splitting, normalization,
//! stemming, stop words, dedupe, length, synonyms).
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use shardwise::{AnalyzerConfig, Document, Index, IndexConfig, Language, SearchConfig};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> shardwise::Result<()> {
//! let mut config = IndexConfig::with_defaults(
//!     "products",
//!     "id",
//!     false,
//!     AnalyzerConfig::for_language(Language::English),
//! );
//! config.shard_count = 4;
//! config.store_fields.push("title".to_string());
//! let index = Index::open(config)?;
//!
//! index
//!     .insert(vec![
//!         Document::from_json(&json!({"id": "1", "title": "Stand mixer"}))?,
//!         Document::from_json(&json!({"id": "2", "title": "Hand blender"}))?,
//!     ])
//!     .await?;
//!
//! let search = SearchConfig::with_defaults(None, vec!["title".to_string()]);
//! let result = index.search("mixers", &search).await?;
//! println!("{} matches in {:?}", result.hit_number, result.duration);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! [`Config`] bundles [`IndexConfig`] and [`SearchConfig`] and round-trips
//! through JSON with [`Config::load`] / [`Config::save`]. Index settings can
//! be overridden from the environment with
//! [`IndexConfig::apply_env_overrides`].

pub mod config;
pub mod error;
pub mod index;
pub mod query;
pub mod tokenizer;
pub mod types;

pub use config::{Config, IndexConfig, QueryConfig, SearchConfig, ShardLocation};
pub use error::{Result, ShardwiseError};
pub use index::Index;
pub use query::SearchContext;
pub use tokenizer::{Analyzer, AnalyzerConfig, FilterKind, Language, TokenizerKind};
pub use types::*;
