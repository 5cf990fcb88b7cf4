use crate::config::SearchConfig;
use crate::tokenizer::{Analyzer, AnalyzerRegistry, ALL_FIELD};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchField {
    /// The `_all` aggregate of every non-id field.
    Composite,
    Named(String),
}

/// Free text matched against one field.
#[derive(Debug, Clone)]
pub struct MatchQuery {
    pub field: MatchField,
    pub text: String,
    /// Query-time analyzer for the field.
    pub analyzer: Analyzer,
    pub fuzziness: u8,
    pub boost: Option<f32>,
}

/// Engine-independent query description.
#[derive(Debug, Clone)]
pub enum QueryTree {
    MatchAll,
    Match(MatchQuery),
    /// Any of the clauses may match; scores add up.
    Should(Vec<MatchQuery>),
}

pub struct QueryBuilder<'a> {
    config: &'a SearchConfig,
    registry: &'a AnalyzerRegistry,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(config: &'a SearchConfig, registry: &'a AnalyzerRegistry) -> Self {
        QueryBuilder { config, registry }
    }

    pub fn build(&self, query: &str) -> QueryTree {
        if query.trim().is_empty() {
            return QueryTree::MatchAll;
        }
        if self.config.search_fields.is_empty() {
            return QueryTree::Match(self.match_query(MatchField::Composite, ALL_FIELD, query));
        }
        QueryTree::Should(
            self.config
                .search_fields
                .iter()
                .map(|field| self.match_query(MatchField::Named(field.clone()), field, query))
                .collect(),
        )
    }

    fn match_query(&self, field: MatchField, key: &str, query: &str) -> MatchQuery {
        MatchQuery {
            field,
            text: query.to_string(),
            analyzer: self.registry.resolve(key).clone(),
            fuzziness: self.config.query_config.fuzziness(key),
            boost: self.config.query_config.boost(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryConfig;
    use crate::tokenizer::{AnalyzerConfig, AnalyzerConfigMap, TokenizerKind};

    #[test]
    fn blank_query_matches_all() {
        let config = SearchConfig::default();
        let registry = AnalyzerRegistry::default();
        let builder = QueryBuilder::new(&config, &registry);
        assert!(matches!(builder.build(""), QueryTree::MatchAll));
        assert!(matches!(builder.build("   \t"), QueryTree::MatchAll));
    }

    #[test]
    fn no_fields_targets_composite() {
        let config = SearchConfig::default();
        let registry = AnalyzerRegistry::default();
        match QueryBuilder::new(&config, &registry).build("red lamp") {
            QueryTree::Match(m) => {
                assert_eq!(m.field, MatchField::Composite);
                assert_eq!(m.text, "red lamp");
                assert_eq!(m.fuzziness, QueryConfig::EXACT);
                assert_eq!(m.boost, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn per_field_settings() {
        let mut config = SearchConfig {
            search_fields: vec!["name".to_string(), "sku".to_string()],
            ..SearchConfig::default()
        };
        config
            .query_config
            .improve_fuzziness
            .insert("name".to_string(), true);
        config.query_config.field_boost.insert("sku".to_string(), 3.0);
        config.query_config.field_boost.insert("*".to_string(), 9.0);

        let mut analyzers = AnalyzerConfigMap::new();
        analyzers.insert(
            "sku".to_string(),
            AnalyzerConfig::default().with_tokenizer(TokenizerKind::Whitespace),
        );
        let registry = AnalyzerRegistry::new(&analyzers);

        match QueryBuilder::new(&config, &registry).build("AB-1") {
            QueryTree::Should(clauses) => {
                assert_eq!(clauses.len(), 2);
                assert_eq!(clauses[0].field, MatchField::Named("name".to_string()));
                assert_eq!(clauses[0].fuzziness, QueryConfig::FUZZY);
                assert_eq!(clauses[0].boost, None);
                assert_eq!(clauses[1].fuzziness, QueryConfig::EXACT);
                assert_eq!(clauses[1].boost, Some(3.0));
                assert_eq!(clauses[1].analyzer.terms("AB-1"), vec!["AB-1"]);
                assert_eq!(clauses[0].analyzer.terms("AB-1"), vec!["ab", "1"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
