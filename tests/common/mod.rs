#![allow(dead_code)]

use serde_json::json;
use shardwise::{Document, Index, IndexConfig, SearchResult};
use std::sync::Once;

static INIT: Once = Once::new();

/// Route `tracing` output to the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn doc(value: serde_json::Value) -> Document {
    Document::from_json(&value).unwrap()
}

pub fn named(id: &str, name: &str) -> Document {
    doc(json!({"id": id, "name": name}))
}

/// In-memory index that stores every field.
pub fn memory_index(shard_count: usize) -> Index {
    init_tracing();
    Index::open(IndexConfig {
        shard_count,
        store_fields: vec!["*".to_string()],
        ..IndexConfig::default()
    })
    .unwrap()
}

pub fn ids(result: &SearchResult) -> Vec<String> {
    result.hits.iter().map(|h| h.id.clone()).collect()
}
