use super::run_raw;
use crate::tokenizer::config::Language;
use crate::tokenizer::token::Token;
use tantivy::tokenizer::{RawTokenizer, TextAnalyzer};

/// Drops tokens found in the language's stop word list.
#[derive(Clone)]
pub struct StopWordFilter {
    language: Language,
    words: TextAnalyzer,
}

impl StopWordFilter {
    /// `None` when tantivy ships no list for the language.
    pub fn new(language: Language) -> Option<Self> {
        let filter = tantivy::tokenizer::StopWordFilter::new(language.to_tantivy())?;
        let words = TextAnalyzer::builder(RawTokenizer::default())
            .filter(filter)
            .build();
        Some(StopWordFilter { language, words })
    }

    pub fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut words = self.words.clone();
        tokens
            .into_iter()
            .filter(|t| run_raw(&mut words, &t.term).is_some())
            .collect()
    }
}

impl std::fmt::Debug for StopWordFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopWordFilter")
            .field("language", &self.language)
            .finish()
    }
}
