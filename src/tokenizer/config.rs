use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name (or `*` / `_all`) to analyzer configuration.
pub type AnalyzerConfigMap = BTreeMap<String, AnalyzerConfig>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenizerKind {
    Digit,
    #[default]
    Letter,
    AlphaNumeric,
    Whitespace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Lowercase,
    Compound,
    Normalize,
    Stem,
    StopWord,
    Unique,
    Length,
    Synonym,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "fr")]
    French,
}

impl Language {
    pub(crate) fn to_tantivy(self) -> tantivy::tokenizer::Language {
        match self {
            Language::English => tantivy::tokenizer::Language::English,
            Language::German => tantivy::tokenizer::Language::German,
            Language::French => tantivy::tokenizer::Language::French,
        }
    }
}

/// Parameters consumed by individual filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub compound_filter_dictionary: Vec<String>,
    pub length_filter_min: usize,
    pub length_filter_max: usize,
    /// Groups of interchangeable terms.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub synonym_filter_mapping: Vec<Vec<String>>,
    pub language: Language,
}

/// Declarative analyzer description: one tokenizer and an ordered filter list.
///
/// ```json
/// {
///   "tokenizer": "alpha_numeric",
///   "token_filters": ["lowercase", "stem"],
///   "options": { "language": "de" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub tokenizer: TokenizerKind,
    pub token_filters: Vec<FilterKind>,
    pub options: Options,
}

impl AnalyzerConfig {
    /// The full-featured preset for a language: alpha-numeric tokenizer with
    /// lowercase, synonym, normalize, compound, stem, stop word, unique and
    /// length filters. Filters lacking options (synonyms, length bounds, a
    /// compound dictionary outside German) are left out at build time.
    pub fn for_language(language: Language) -> Self {
        AnalyzerConfig {
            tokenizer: TokenizerKind::AlphaNumeric,
            token_filters: vec![
                FilterKind::Lowercase,
                FilterKind::Synonym,
                FilterKind::Normalize,
                FilterKind::Compound,
                FilterKind::Stem,
                FilterKind::StopWord,
                FilterKind::Unique,
                FilterKind::Length,
            ],
            options: Options {
                language,
                ..Options::default()
            },
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.options.language = language;
        self
    }

    pub fn with_synonyms(mut self, groups: Vec<Vec<String>>) -> Self {
        self.options.synonym_filter_mapping = groups;
        self
    }

    pub fn with_compound_dictionary(mut self, words: Vec<String>) -> Self {
        self.options.compound_filter_dictionary = words;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerKind) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_filter(mut self, filter: FilterKind) -> Self {
        self.token_filters.push(filter);
        self
    }

    pub fn with_length(mut self, min: usize, max: usize) -> Self {
        self.options.length_filter_min = min;
        self.options.length_filter_max = max;
        self
    }

    pub fn without_stem(mut self) -> Self {
        if let Some(i) = self.token_filters.iter().position(|f| *f == FilterKind::Stem) {
            self.token_filters.remove(i);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_full_config() {
        let config: AnalyzerConfig = serde_json::from_value(json!({
            "tokenizer": "alpha_numeric",
            "token_filters": ["lowercase", "stop_word", "synonym"],
            "options": {
                "language": "de",
                "synonym_filter_mapping": [["mixer", "handmixer"]]
            }
        }))
        .unwrap();

        assert_eq!(config.tokenizer, TokenizerKind::AlphaNumeric);
        assert_eq!(
            config.token_filters,
            vec![FilterKind::Lowercase, FilterKind::StopWord, FilterKind::Synonym]
        );
        assert_eq!(config.options.language, Language::German);
        assert_eq!(config.options.synonym_filter_mapping.len(), 1);
    }

    #[test]
    fn missing_tokenizer_defaults_to_letter() {
        let config: AnalyzerConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config.tokenizer, TokenizerKind::Letter);
        assert!(config.token_filters.is_empty());
        assert_eq!(config.options.language, Language::English);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(serde_json::from_value::<AnalyzerConfig>(json!({"tokenizer": "ngram"})).is_err());
        assert!(
            serde_json::from_value::<AnalyzerConfig>(json!({"token_filters": ["soundex"]}))
                .is_err()
        );
        assert!(serde_json::from_value::<AnalyzerConfig>(
            json!({"options": {"language": "xx"}})
        )
        .is_err());
    }

    #[test]
    fn preset_and_builders() {
        let config = AnalyzerConfig::for_language(Language::German)
            .with_length(2, 20)
            .without_stem()
            .with_filter(FilterKind::Unique);

        assert_eq!(config.tokenizer, TokenizerKind::AlphaNumeric);
        assert!(!config.token_filters.contains(&FilterKind::Stem));
        assert_eq!(config.token_filters.last(), Some(&FilterKind::Unique));
        assert_eq!(config.options.length_filter_min, 2);
        assert_eq!(config.options.length_filter_max, 20);
        assert_eq!(config.options.language, Language::German);
    }
}
