//! Token filters applied after tokenization, in configured order.
//!
//! Each filter consumes the token sequence and returns a new one. Filters that
//! add tokens (synonyms, stems, compound parts) insert them directly after the
//! token they derive from, so pre-existing tokens keep their relative order.

mod compound;
mod normalize;
mod stem;
mod stop_word;
mod synonym;

pub use compound::CompoundFilter;
pub use normalize::NormalizeFilter;
pub use stem::StemFilter;
pub use stop_word::StopWordFilter;
pub use synonym::SynonymFilter;

use super::config::{FilterKind, Options};
use super::token::Token;
use std::collections::HashSet;

/// Keeps tokens whose character count lies in `[min, max]`.
#[derive(Debug, Clone)]
pub struct LengthFilter {
    min: usize,
    max: usize,
}

impl LengthFilter {
    pub fn new(min: usize, max: usize) -> Self {
        LengthFilter { min, max }
    }

    fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .filter(|t| {
                let len = t.term.chars().count();
                len >= self.min && len <= self.max
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum TokenFilter {
    Lowercase,
    Compound(CompoundFilter),
    Normalize(NormalizeFilter),
    Stem(StemFilter),
    StopWord(StopWordFilter),
    Unique,
    Length(LengthFilter),
    Synonym(SynonymFilter),
}

impl TokenFilter {
    /// Build the filter for `kind`, or `None` when the options leave nothing
    /// for it to do or it could not be constructed.
    pub fn build(kind: FilterKind, options: &Options) -> Option<TokenFilter> {
        match kind {
            FilterKind::Lowercase => Some(TokenFilter::Lowercase),
            FilterKind::Compound => {
                if !options.compound_filter_dictionary.is_empty() {
                    Some(TokenFilter::Compound(CompoundFilter::with_language(
                        &options.compound_filter_dictionary,
                        options.language,
                    )))
                } else {
                    CompoundFilter::for_language(options.language).map(TokenFilter::Compound)
                }
            }
            FilterKind::Normalize => Some(TokenFilter::Normalize(NormalizeFilter::for_language(
                options.language,
            ))),
            FilterKind::Stem => match StemFilter::new(options.language) {
                Ok(f) => Some(TokenFilter::Stem(f)),
                Err(e) => {
                    tracing::warn!("Omitting stem filter for {:?}: {}", options.language, e);
                    None
                }
            },
            FilterKind::StopWord => match StopWordFilter::new(options.language) {
                Some(f) => Some(TokenFilter::StopWord(f)),
                None => {
                    tracing::warn!(
                        "Omitting stop word filter: no list for {:?}",
                        options.language
                    );
                    None
                }
            },
            FilterKind::Unique => Some(TokenFilter::Unique),
            FilterKind::Length => {
                let (min, max) = (options.length_filter_min, options.length_filter_max);
                if max < min + 2 {
                    tracing::debug!("Omitting length filter with bounds [{}, {}]", min, max);
                    return None;
                }
                Some(TokenFilter::Length(LengthFilter::new(min, max)))
            }
            FilterKind::Synonym => {
                if options.synonym_filter_mapping.is_empty() {
                    return None;
                }
                Some(TokenFilter::Synonym(SynonymFilter::new(
                    &options.synonym_filter_mapping,
                )))
            }
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            TokenFilter::Lowercase => FilterKind::Lowercase,
            TokenFilter::Compound(_) => FilterKind::Compound,
            TokenFilter::Normalize(_) => FilterKind::Normalize,
            TokenFilter::Stem(_) => FilterKind::Stem,
            TokenFilter::StopWord(_) => FilterKind::StopWord,
            TokenFilter::Unique => FilterKind::Unique,
            TokenFilter::Length(_) => FilterKind::Length,
            TokenFilter::Synonym(_) => FilterKind::Synonym,
        }
    }

    pub fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        match self {
            TokenFilter::Lowercase => tokens
                .into_iter()
                .map(|mut t| {
                    t.term = t.term.to_lowercase();
                    t
                })
                .collect(),
            TokenFilter::Compound(f) => f.apply(tokens),
            TokenFilter::Normalize(f) => f.apply(tokens),
            TokenFilter::Stem(f) => f.apply(tokens),
            TokenFilter::StopWord(f) => f.apply(tokens),
            TokenFilter::Unique => {
                let mut seen = HashSet::new();
                tokens
                    .into_iter()
                    .filter(|t| seen.insert(t.term.clone()))
                    .collect()
            }
            TokenFilter::Length(f) => f.apply(tokens),
            TokenFilter::Synonym(f) => f.apply(tokens),
        }
    }
}

/// Runs a single term through a tantivy analyzer built on `RawTokenizer`.
/// Returns `None` when the analyzer removed the term.
pub(crate) fn run_raw(analyzer: &mut tantivy::tokenizer::TextAnalyzer, term: &str) -> Option<String> {
    let mut stream = analyzer.token_stream(term);
    stream.next().map(|token| token.text.clone())
}
