use super::run_raw;
use crate::error::{Result, ShardwiseError};
use crate::tokenizer::config::Language;
use crate::tokenizer::token::Token;
use tantivy::tokenizer::{RawTokenizer, Stemmer, TextAnalyzer};

/// Adds the stem of every non-keyword token as a variant right after it.
///
/// The original token is kept so exact matches still score.
#[derive(Clone)]
pub struct StemFilter {
    language: Language,
    stemmer: TextAnalyzer,
}

impl StemFilter {
    pub fn new(language: Language) -> Result<Self> {
        let mut stemmer = TextAnalyzer::builder(RawTokenizer::default())
            .filter(Stemmer::new(language.to_tantivy()))
            .build();
        run_raw(&mut stemmer, "running").ok_or_else(|| {
            ShardwiseError::Config(format!("stemmer for {:?} produced no output", language))
        })?;
        Ok(StemFilter { language, stemmer })
    }

    pub fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut stemmer = self.stemmer.clone();
        let mut out = Vec::with_capacity(tokens.len() * 2);
        for token in tokens {
            let stem = if token.keyword {
                None
            } else {
                run_raw(&mut stemmer, &token.term).filter(|s| !s.is_empty() && *s != token.term)
            };
            let variant = stem.map(|s| token.variant(s));
            out.push(token);
            out.extend(variant);
        }
        out
    }
}

impl std::fmt::Debug for StemFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemFilter")
            .field("language", &self.language)
            .finish()
    }
}
