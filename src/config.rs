use crate::error::{Result, ShardwiseError};
use crate::tokenizer::{AnalyzerConfig, AnalyzerConfigMap, WILDCARD};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Minimum writer buffer tantivy accepts per indexing thread.
pub const MIN_WRITER_BUFFER_BYTES: usize = 15_000_000;

/// Where a shard keeps its engine data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShardLocation {
    InMemory,
    Directory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    #[serde(alias = "shard_num")]
    pub shard_count: usize,
    /// Path prefix for shard directories; `None` keeps every shard in memory.
    pub shard_path: Option<PathBuf>,
    pub id_field: String,
    /// Field names (flattened or root) whose values are stored; `*` stores all.
    pub store_fields: Vec<String>,
    pub analyzer_config: AnalyzerConfigMap,
    pub writer_buffer_bytes: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            shard_count: 1,
            shard_path: None,
            id_field: "id".to_string(),
            store_fields: Vec::new(),
            analyzer_config: AnalyzerConfigMap::new(),
            writer_buffer_bytes: 20_000_000,
        }
    }
}

impl IndexConfig {
    /// One shard under `./data/<name>/shard` (or in memory), the id field
    /// stored, and `analyzer` for every field.
    pub fn with_defaults(
        name: &str,
        id_field: &str,
        in_memory: bool,
        analyzer: AnalyzerConfig,
    ) -> Self {
        let mut analyzer_config = AnalyzerConfigMap::new();
        analyzer_config.insert(WILDCARD.to_string(), analyzer);
        IndexConfig {
            shard_count: 1,
            shard_path: (!in_memory).then(|| PathBuf::from("./data").join(name).join("shard")),
            id_field: id_field.to_string(),
            store_fields: vec![id_field.to_string()],
            analyzer_config,
            ..IndexConfig::default()
        }
    }

    /// Override settings from `SHARDWISE_SHARD_COUNT`, `SHARDWISE_SHARD_PATH`
    /// and `SHARDWISE_WRITER_BUFFER_BYTES`. Unparseable values are ignored.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Some(count) = std::env::var("SHARDWISE_SHARD_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.shard_count = count;
        }
        if let Ok(path) = std::env::var("SHARDWISE_SHARD_PATH") {
            self.shard_path = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }
        if let Some(bytes) = std::env::var("SHARDWISE_WRITER_BUFFER_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.writer_buffer_bytes = bytes;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.shard_count == 0 {
            return Err(ShardwiseError::Config(
                "shard_count must be greater than 0".to_string(),
            ));
        }
        if self.id_field.is_empty() {
            return Err(ShardwiseError::Config("id_field must not be empty".to_string()));
        }
        if self.writer_buffer_bytes < MIN_WRITER_BUFFER_BYTES {
            return Err(ShardwiseError::Config(format!(
                "writer_buffer_bytes {} is below the minimum of {}",
                self.writer_buffer_bytes, MIN_WRITER_BUFFER_BYTES
            )));
        }
        Ok(())
    }

    /// Storage location of shard `shard_id`: `<shard_path>-<shard_id>`.
    pub fn shard_location(&self, shard_id: usize) -> ShardLocation {
        match &self.shard_path {
            None => ShardLocation::InMemory,
            Some(base) => {
                let mut path = base.clone().into_os_string();
                path.push(format!("-{}", shard_id));
                ShardLocation::Directory(PathBuf::from(path))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Field (or `*`) to whether typo-tolerant matching is enabled.
    pub improve_fuzziness: HashMap<String, bool>,
    pub field_boost: HashMap<String, f32>,
}

impl QueryConfig {
    pub const EXACT: u8 = 1;
    pub const FUZZY: u8 = 2;

    /// Fuzziness level for `field`: [`Self::FUZZY`] when enabled for the field
    /// or for `*`, else [`Self::EXACT`].
    pub fn fuzziness(&self, field: &str) -> u8 {
        let enabled = self.improve_fuzziness.get(field).copied().unwrap_or(false)
            || self.improve_fuzziness.get(WILDCARD).copied().unwrap_or(false);
        if enabled {
            Self::FUZZY
        } else {
            Self::EXACT
        }
    }

    /// Boost configured for exactly this field.
    pub fn boost(&self, field: &str) -> Option<f32> {
        self.field_boost.get(field).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum hits returned; 0 returns all.
    pub limit: usize,
    pub from: usize,
    /// Fields to search; empty searches the composite `_all` field.
    pub search_fields: Vec<String>,
    pub return_fields: Vec<String>,
    pub score_threshold: f32,
    /// Percent (0-100) of the top score a hit must reach.
    pub max_score_percent_threshold: f32,
    pub query_config: QueryConfig,
    /// Query-time analyzers; empty reuses the index-time configuration.
    pub analyzer_config: AnalyzerConfigMap,
}

impl SearchConfig {
    /// Limit 25 with typo tolerance on every field.
    pub fn with_defaults(analyzer: Option<AnalyzerConfig>, return_fields: Vec<String>) -> Self {
        let mut analyzer_config = AnalyzerConfigMap::new();
        if let Some(analyzer) = analyzer {
            analyzer_config.insert(WILDCARD.to_string(), analyzer);
        }
        let mut query_config = QueryConfig::default();
        query_config
            .improve_fuzziness
            .insert(WILDCARD.to_string(), true);
        SearchConfig {
            limit: 25,
            return_fields,
            query_config,
            analyzer_config,
            ..SearchConfig::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.max_score_percent_threshold) {
            return Err(ShardwiseError::Config(format!(
                "max_score_percent_threshold must be within 0..=100, got {}",
                self.max_score_percent_threshold
            )));
        }
        if self.score_threshold < 0.0 {
            return Err(ShardwiseError::Config(
                "score_threshold must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Index and search configuration persisted together as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub search: SearchConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.index.validate()?;
        self.search.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Language;
    use tempfile::TempDir;

    #[test]
    fn shard_locations() {
        let config = IndexConfig {
            shard_path: Some(PathBuf::from("/tmp/products/shard")),
            ..IndexConfig::default()
        };
        assert_eq!(
            config.shard_location(3),
            ShardLocation::Directory(PathBuf::from("/tmp/products/shard-3"))
        );
        assert_eq!(IndexConfig::default().shard_location(0), ShardLocation::InMemory);
    }

    #[test]
    fn index_defaults() {
        let config = IndexConfig::with_defaults(
            "products",
            "sku",
            false,
            AnalyzerConfig::for_language(Language::German),
        );
        assert_eq!(config.shard_count, 1);
        assert_eq!(config.shard_path, Some(PathBuf::from("./data/products/shard")));
        assert_eq!(config.store_fields, vec!["sku"]);
        assert!(config.analyzer_config.contains_key("*"));

        let in_memory = IndexConfig::with_defaults("p", "id", true, AnalyzerConfig::default());
        assert_eq!(in_memory.shard_path, None);
    }

    #[test]
    fn validation() {
        assert!(IndexConfig::default().validate().is_ok());
        let zero = IndexConfig {
            shard_count: 0,
            ..IndexConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ShardwiseError::Config(_))));
        let small = IndexConfig {
            writer_buffer_bytes: 1_000,
            ..IndexConfig::default()
        };
        assert!(small.validate().is_err());

        let search = SearchConfig {
            max_score_percent_threshold: 150.0,
            ..SearchConfig::default()
        };
        assert!(search.validate().is_err());
    }

    #[test]
    fn fuzziness_and_boost() {
        let mut qc = QueryConfig::default();
        assert_eq!(qc.fuzziness("name"), QueryConfig::EXACT);
        qc.improve_fuzziness.insert("name".to_string(), true);
        assert_eq!(qc.fuzziness("name"), QueryConfig::FUZZY);
        assert_eq!(qc.fuzziness("brand"), QueryConfig::EXACT);
        qc.improve_fuzziness.insert("*".to_string(), true);
        assert_eq!(qc.fuzziness("brand"), QueryConfig::FUZZY);

        qc.field_boost.insert("name".to_string(), 2.0);
        qc.field_boost.insert("*".to_string(), 5.0);
        assert_eq!(qc.boost("name"), Some(2.0));
        assert_eq!(qc.boost("brand"), None);
    }

    #[test]
    fn search_defaults() {
        let sc = SearchConfig::with_defaults(None, vec!["name".to_string()]);
        assert_eq!(sc.limit, 25);
        assert_eq!(sc.from, 0);
        assert_eq!(sc.query_config.fuzziness("anything"), QueryConfig::FUZZY);
        assert!(sc.analyzer_config.is_empty());
    }

    #[test]
    fn shard_num_alias() {
        let config: IndexConfig =
            serde_json::from_str(r#"{"shard_num": 4, "id_field": "sku"}"#).unwrap();
        assert_eq!(config.shard_count, 4);
        assert_eq!(config.id_field, "sku");
        assert_eq!(config.writer_buffer_bytes, 20_000_000);
    }

    #[test]
    fn save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        let mut config = Config::default();
        config.index.shard_count = 3;
        config.index.analyzer_config.insert(
            "name".to_string(),
            AnalyzerConfig::for_language(Language::French),
        );
        config.search.limit = 10;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_rejects_invalid() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"index": {"shard_count": 0}}"#).unwrap();
        assert!(matches!(Config::load(&path), Err(ShardwiseError::Config(_))));

        std::fs::write(
            &path,
            r#"{"index": {"analyzer_config": {"*": {"tokenizer": "bogus"}}}}"#,
        )
        .unwrap();
        assert!(matches!(Config::load(&path), Err(ShardwiseError::Json(_))));
    }

    #[test]
    fn env_overrides() {
        std::env::set_var("SHARDWISE_SHARD_COUNT", "7");
        std::env::set_var("SHARDWISE_WRITER_BUFFER_BYTES", "not-a-number");
        let config = IndexConfig::default().apply_env_overrides();
        std::env::remove_var("SHARDWISE_SHARD_COUNT");
        std::env::remove_var("SHARDWISE_WRITER_BUFFER_BYTES");
        assert_eq!(config.shard_count, 7);
        assert_eq!(config.writer_buffer_bytes, 20_000_000);
    }
}
