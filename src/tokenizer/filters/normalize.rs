use super::run_raw;
use crate::tokenizer::config::Language;
use crate::tokenizer::token::Token;
use tantivy::tokenizer::{AsciiFoldingFilter, RawTokenizer, TextAnalyzer};

/// Transliterates terms to a base character set.
#[derive(Clone)]
pub enum NormalizeFilter {
    German,
    AsciiFolding(TextAnalyzer),
}

impl NormalizeFilter {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::German => NormalizeFilter::German,
            _ => NormalizeFilter::AsciiFolding(
                TextAnalyzer::builder(RawTokenizer::default())
                    .filter(AsciiFoldingFilter)
                    .build(),
            ),
        }
    }

    pub fn apply(&self, mut tokens: Vec<Token>) -> Vec<Token> {
        match self {
            NormalizeFilter::German => {
                for token in tokens.iter_mut() {
                    token.term = normalize_german(&token.term);
                }
            }
            NormalizeFilter::AsciiFolding(analyzer) => {
                let mut analyzer = analyzer.clone();
                for token in tokens.iter_mut() {
                    if let Some(folded) = run_raw(&mut analyzer, &token.term) {
                        token.term = folded;
                    }
                }
            }
        }
        tokens
    }
}

impl std::fmt::Debug for NormalizeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeFilter::German => f.write_str("NormalizeFilter::German"),
            NormalizeFilter::AsciiFolding(_) => f.write_str("NormalizeFilter::AsciiFolding"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    Vowel,
    Umlaut,
}

/// German normalization: umlauts fold to their base vowel, `ß` becomes `ss`,
/// and the `ae`/`oe`/`ue` spellings of umlauts collapse to the base vowel
/// (a `u` directly after another vowel or `q` keeps its `e`).
pub(super) fn normalize_german(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    let mut state = State::None;
    for c in term.chars() {
        match c {
            'a' | 'o' => {
                out.push(c);
                state = State::Umlaut;
            }
            'u' => {
                out.push(c);
                state = if state == State::None {
                    State::Umlaut
                } else {
                    State::Vowel
                };
            }
            'e' => {
                if state != State::Umlaut {
                    out.push(c);
                }
                state = State::Vowel;
            }
            'i' | 'q' | 'y' => {
                out.push(c);
                state = State::Vowel;
            }
            'ä' | 'æ' => {
                out.push('a');
                state = State::Vowel;
            }
            'ö' | 'ø' => {
                out.push('o');
                state = State::Vowel;
            }
            'ü' => {
                out.push('u');
                state = State::Vowel;
            }
            'ß' => {
                out.push_str("ss");
                state = State::None;
            }
            _ => {
                out.push(c);
                state = State::None;
            }
        }
    }
    out
}
