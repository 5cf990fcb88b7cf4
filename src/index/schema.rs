use crate::tokenizer::{AnalyzerRegistry, ALL_FIELD, WILDCARD};
use std::collections::BTreeMap;
use tantivy::schema::{
    Field, IndexRecordOption, JsonObjectOptions, Schema as TantivySchema, TextFieldIndexing,
    TextOptions, STORED, STRING,
};

pub const ID_FIELD: &str = "_id";
pub const STORED_FIELD: &str = "_stored";
pub const TEXT_FIELD: &str = "_text";

const ALL_TOKENIZER: &str = "shardwise_all";
const TEXT_TOKENIZER: &str = "shardwise_text";

/// Tantivy layout of a shard, derived from the index-time analyzer registry.
///
/// * `_id`: raw, stored; the delete/replace key.
/// * `_all`: composite text of every non-id value.
/// * `_text`: JSON object of fields analyzed by the `*` (or built-in) analyzer.
/// * `_text_<n>`: one JSON object per field-specific analyzer entry, in key order.
/// * `_stored`: stored-only JSON object of the fields selected by `store_fields`.
#[derive(Clone)]
pub struct ShardSchema {
    schema: TantivySchema,
    id_field: Field,
    all_field: Field,
    stored_field: Field,
    text_field: Field,
    /// analyzer key -> (json field, tokenizer name)
    groups: BTreeMap<String, (Field, String)>,
    registry: AnalyzerRegistry,
}

fn json_options(tokenizer: &str) -> JsonObjectOptions {
    let indexing = TextFieldIndexing::default()
        .set_tokenizer(tokenizer)
        .set_index_option(IndexRecordOption::WithFreqs);
    JsonObjectOptions::default()
        .set_indexing_options(indexing)
        .set_expand_dots_enabled()
}

impl ShardSchema {
    pub fn new(registry: AnalyzerRegistry) -> Self {
        let mut builder = TantivySchema::builder();

        let id_field = builder.add_text_field(ID_FIELD, STRING | STORED);

        let all_indexing = TextFieldIndexing::default()
            .set_tokenizer(ALL_TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqs);
        let all_field = builder.add_text_field(
            ALL_FIELD,
            TextOptions::default().set_indexing_options(all_indexing),
        );

        let stored_field =
            builder.add_json_field(STORED_FIELD, JsonObjectOptions::default().set_stored());

        let text_field = builder.add_json_field(TEXT_FIELD, json_options(TEXT_TOKENIZER));

        let mut groups = BTreeMap::new();
        for (n, key) in registry.field_keys().enumerate() {
            let tokenizer = format!("{}_{}", TEXT_TOKENIZER, n);
            let field = builder.add_json_field(&format!("{}_{}", TEXT_FIELD, n), json_options(&tokenizer));
            groups.insert(key.to_string(), (field, tokenizer));
        }

        ShardSchema {
            schema: builder.build(),
            id_field,
            all_field,
            stored_field,
            text_field,
            groups,
            registry,
        }
    }

    pub fn tantivy_schema(&self) -> TantivySchema {
        self.schema.clone()
    }

    /// Register one tantivy tokenizer per analyzer group on `index`.
    pub fn register_tokenizers(&self, index: &tantivy::Index) {
        let tokenizers = index.tokenizers();
        tokenizers.register(ALL_TOKENIZER, self.registry.resolve(ALL_FIELD).clone());
        tokenizers.register(TEXT_TOKENIZER, self.registry.resolve(WILDCARD).clone());
        for (key, (_, tokenizer)) in &self.groups {
            tokenizers.register(tokenizer, self.registry.resolve(key).clone());
        }
    }

    pub fn id_field(&self) -> Field {
        self.id_field
    }

    pub fn all_field(&self) -> Field {
        self.all_field
    }

    pub fn stored_field(&self) -> Field {
        self.stored_field
    }

    /// JSON field holding the indexed terms of `field_name`.
    pub fn text_field_for(&self, field_name: &str) -> Field {
        self.registry
            .resolve_key(field_name)
            .and_then(|key| self.groups.get(key))
            .map(|(field, _)| *field)
            .unwrap_or(self.text_field)
    }

    /// Index-time analyzers.
    pub fn registry(&self) -> &AnalyzerRegistry {
        &self.registry
    }
}
