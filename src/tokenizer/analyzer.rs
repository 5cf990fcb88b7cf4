use super::char_tokenizer::CharTokenizer;
use super::config::{AnalyzerConfig, FilterKind, TokenizerKind};
use super::filters::TokenFilter;
use super::token::Token;
use std::sync::Arc;
use tantivy::tokenizer::{Token as TantivyToken, TokenStream, Tokenizer};

/// An immutable tokenizer + filter pipeline.
///
/// The same `Analyzer` is registered with tantivy for indexing (it implements
/// [`Tokenizer`]) and called directly to turn query text into terms, so a
/// field is analyzed identically on both sides.
#[derive(Debug, Clone)]
pub struct Analyzer {
    tokenizer: CharTokenizer,
    filters: Arc<[TokenFilter]>,
}

impl Analyzer {
    /// Build a pipeline from configuration. Filters whose options leave them
    /// nothing to do, or that fail to construct, are omitted.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        let filters: Vec<TokenFilter> = config
            .token_filters
            .iter()
            .filter_map(|kind| TokenFilter::build(*kind, &config.options))
            .collect();
        Analyzer {
            tokenizer: CharTokenizer::for_kind(config.tokenizer),
            filters: filters.into(),
        }
    }

    /// Alpha-numeric tokenizer with lowercasing. Used when nothing is configured.
    pub fn standard() -> Self {
        Self::from_config(&AnalyzerConfig {
            tokenizer: TokenizerKind::AlphaNumeric,
            token_filters: vec![FilterKind::Lowercase],
            ..AnalyzerConfig::default()
        })
    }

    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let mut tokens = self.tokenizer.tokenize(text);
        for filter in self.filters.iter() {
            if tokens.is_empty() {
                break;
            }
            tokens = filter.apply(tokens);
        }
        tokens
    }

    /// Distinct terms of `text`, in first-seen order.
    pub fn terms(&self, text: &str) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        for token in self.analyze(text) {
            if !terms.contains(&token.term) {
                terms.push(token.term);
            }
        }
        terms
    }

    /// Kinds of the filters that made it into the pipeline, in order.
    pub fn filter_kinds(&self) -> Vec<FilterKind> {
        self.filters.iter().map(TokenFilter::kind).collect()
    }
}

pub struct AnalyzerTokenStream {
    tokens: Vec<TantivyToken>,
    index: usize,
}

impl TokenStream for AnalyzerTokenStream {
    fn advance(&mut self) -> bool {
        if self.index < self.tokens.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn token(&self) -> &TantivyToken {
        &self.tokens[self.index - 1]
    }

    fn token_mut(&mut self) -> &mut TantivyToken {
        &mut self.tokens[self.index - 1]
    }
}

impl Tokenizer for Analyzer {
    type TokenStream<'a> = AnalyzerTokenStream;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        let tokens = self
            .analyze(text)
            .into_iter()
            .filter(|t| !t.term.is_empty())
            .map(|t| TantivyToken {
                offset_from: t.offset_from,
                offset_to: t.offset_to,
                position: t.position,
                text: t.term,
                ..Default::default()
            })
            .collect();
        AnalyzerTokenStream { tokens, index: 0 }
    }
}
